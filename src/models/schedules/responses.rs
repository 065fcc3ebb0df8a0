use super::entities::ScheduleSlot;
use serde::Serialize;
use ts_rs::TS;

// 附带课程名的时段，用于个人课表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub slot: ScheduleSlot,
    pub course_code: String,
    pub course_name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleListResponse {
    pub items: Vec<ScheduleEntry>,
}
