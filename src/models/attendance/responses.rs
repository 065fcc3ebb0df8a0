use super::entities::{AttendanceRecord, AttendanceSession};
use serde::Serialize;
use ts_rs::TS;

// 二维码会话响应，scan_url 直接编码进二维码
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct QrSessionResponse {
    pub session: AttendanceSession,
    pub scan_url: String,
    // 当天已存在会话时为 true
    pub regenerated: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CheckInResponse {
    pub message: String,
    pub already_checked_in: bool,
    pub record: AttendanceRecord,
    pub attendance_rate: f64,
    pub attended_sessions: u64,
    pub total_sessions: u64,
}

// 带学生信息的出勤记录
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RecordWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub record: AttendanceRecord,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionRecordsResponse {
    pub session: AttendanceSession,
    pub items: Vec<RecordWithStudent>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionListResponse {
    pub items: Vec<AttendanceSession>,
}

// 学生在某门课的出勤汇总
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CourseAttendanceSummary {
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub attended_sessions: u64,
    pub total_sessions: u64,
    pub attendance_rate: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MyAttendanceResponse {
    pub items: Vec<CourseAttendanceSummary>,
}
