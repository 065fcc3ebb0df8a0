use super::entities::AttendanceStatus;
use serde::Deserialize;
use ts_rs::TS;

// 生成签到二维码请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct GenerateQrRequest {
    pub course_id: i64,
    // 默认为当天（UTC），格式 YYYY-MM-DD
    pub session_date: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

// 学生扫码签到请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CheckInRequest {
    pub token: String,
    pub latitude: f64,
    pub longitude: f64,
}

// 手动标记出勤
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub student_id: i64,
    pub status: AttendanceStatus,
}
