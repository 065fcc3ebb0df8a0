//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod advertisements;
pub mod announcement_reads;
pub mod announcements;
pub mod assessments;
pub mod attendance_records;
pub mod attendance_sessions;
pub mod course_enrollments;
pub mod courses;
pub mod files;
pub mod grade_change_requests;
pub mod grades;
pub mod schedule_slots;
pub mod users;

use chrono::{DateTime, Utc};

// 数据库中的时间戳统一为 unix 秒
pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}
