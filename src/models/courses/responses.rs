use super::entities::{Course, EnrollmentRole, EnrollmentWithUser};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 课程列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<Course>,
}

// 当前用户所在课程，附带其课程角色
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct MyCourse {
    pub course: Course,
    pub role: EnrollmentRole,
    pub academic_year: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct MyCoursesResponse {
    pub items: Vec<MyCourse>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentWithUser>,
}
