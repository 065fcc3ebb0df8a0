pub mod ads;
pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod files;
pub mod grade_changes;
pub mod grades;
pub mod schedules;
pub mod users;

pub use ads::AdService;
pub use announcements::AnnouncementService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use files::FileService;
pub use grade_changes::GradeChangeService;
pub use grades::GradeService;
pub use schedules::ScheduleService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::courses::entities::{CourseEnrollment, EnrollmentRole};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从 app data 中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not found in app data"))
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

/// 记录错误并返回 500，底层错误细节只写日志
pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        context,
    ))
}

pub(crate) fn course_forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::CoursePermissionDenied,
        "You do not have the required role in this course",
    ))
}

/// 当前用户与某门课程的关系
#[derive(Debug, Clone)]
pub(crate) enum CourseAccess {
    /// 管理员 / 教务处
    Privileged,
    Member(Vec<CourseEnrollment>),
}

impl CourseAccess {
    pub(crate) fn is_staff(&self) -> bool {
        match self {
            CourseAccess::Privileged => true,
            CourseAccess::Member(enrollments) => enrollments.iter().any(|e| e.role.is_staff()),
        }
    }

    pub(crate) fn is_student(&self) -> bool {
        matches!(self, CourseAccess::Member(enrollments)
            if enrollments.iter().any(|e| e.role == EnrollmentRole::Student))
    }

    pub(crate) fn can_view(&self) -> bool {
        match self {
            CourseAccess::Privileged => true,
            CourseAccess::Member(enrollments) => !enrollments.is_empty(),
        }
    }
}

pub(crate) async fn course_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    course_id: i64,
) -> crate::errors::Result<CourseAccess> {
    if user.role.is_privileged() {
        return Ok(CourseAccess::Privileged);
    }
    let enrollments = storage.get_user_course_enrollments(user.id, course_id).await?;
    Ok(CourseAccess::Member(enrollments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(role: EnrollmentRole) -> CourseEnrollment {
        CourseEnrollment {
            id: 1,
            course_id: 7,
            user_id: 3,
            role,
            academic_year: "2024-2025".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn access_flags() {
        assert!(CourseAccess::Privileged.is_staff());
        assert!(!CourseAccess::Privileged.is_student());

        let assistant = CourseAccess::Member(vec![enrollment(EnrollmentRole::Assistant)]);
        assert!(assistant.is_staff());
        assert!(!assistant.is_student());

        let student = CourseAccess::Member(vec![enrollment(EnrollmentRole::Student)]);
        assert!(student.is_student());
        assert!(!student.is_staff());
        assert!(student.can_view());

        assert!(!CourseAccess::Member(vec![]).can_view());
    }

    #[actix_web::test]
    async fn internal_error_keeps_details_in_logs() {
        let resp = internal_error(
            "Failed to record attendance",
            "UNIQUE constraint failed: attendance_records.session_id",
        );
        assert_eq!(resp.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("Failed to record attendance"));
        assert!(!text.contains("attendance_records"));
    }
}
