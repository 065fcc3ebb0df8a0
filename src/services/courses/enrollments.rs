use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::PortalError;
use crate::models::courses::entities::EnrollmentRole;
use crate::models::courses::requests::{AddEnrollmentRequest, EnrollmentQuery};
use crate::models::courses::responses::EnrollmentListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::utils::validate::validate_academic_year;

pub async fn list_enrollments(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    query: EnrollmentQuery,
) -> ActixResult<HttpResponse> {
    if let Some(year) = query.academic_year.as_deref()
        && let Err(msg) = validate_academic_year(year)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request)?;

    match storage.list_course_enrollments(course_id, query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollmentListResponse { items },
            "Enrollments retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list enrollments", e)),
    }
}

pub async fn add_enrollment(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    mut enrollment: AddEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    enrollment.academic_year = enrollment.academic_year.trim().to_string();
    if let Err(msg) = validate_academic_year(&enrollment.academic_year) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request)?;

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get course", e)),
    }

    let user = match storage.get_user_by_id(enrollment.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get user", e)),
    };

    if !enrollment.role.accepts_account(&user.role) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidEnrollmentRole,
            format!(
                "A {} account cannot be enrolled as {}",
                user.role, enrollment.role
            ),
        )));
    }

    // 同一学年只能有一位主讲教授
    if enrollment.role == EnrollmentRole::Professor {
        match storage
            .find_course_professor(course_id, &enrollment.academic_year)
            .await
        {
            Ok(Some(existing)) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::ProfessorAlreadyAssigned,
                    format!(
                        "Course already has a professor (user {}) for {}",
                        existing.user_id, enrollment.academic_year
                    ),
                )));
            }
            Ok(None) => {}
            Err(e) => return Ok(internal_error("Failed to check course professor", e)),
        }
    }

    match storage.get_user_course_enrollments(user.id, course_id).await {
        Ok(existing)
            if existing
                .iter()
                .any(|e| e.academic_year == enrollment.academic_year) =>
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentAlreadyExists,
                "User is already enrolled in this course for the academic year",
            )));
        }
        Ok(_) => {}
        Err(e) => return Ok(internal_error("Failed to check enrollments", e)),
    }

    match storage.add_enrollment(course_id, enrollment).await {
        Ok(created) => {
            tracing::info!(
                "Enrolled user {} in course {} as {} ({})",
                created.user_id,
                course_id,
                created.role,
                created.academic_year
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(created, "Enrollment added")))
        }
        // 并发写入时由存储层兜底
        Err(PortalError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::Conflict,
                "Enrollment conflicts with an existing one for this academic year",
            ),
        )),
        Err(e) => Ok(internal_error("Failed to add enrollment", e)),
    }
}

pub async fn remove_enrollment(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    enrollment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.remove_enrollment(course_id, enrollment_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enrollment removed"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => Ok(internal_error("Failed to remove enrollment", e)),
    }
}
