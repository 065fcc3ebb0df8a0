use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::utils::validate::validate_course_code;

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    mut course_data: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    course_data.code = course_data.code.trim().to_uppercase();
    course_data.name = course_data.name.trim().to_string();

    if let Err(msg) = validate_course_code(&course_data.code) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    if course_data.name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Course name is required",
        )));
    }
    if course_data.credits.is_some_and(|c| c < 0) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Credits cannot be negative",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.get_course_by_code(&course_data.code).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseAlreadyExists,
                format!("Course code {} already exists", course_data.code),
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check course code", e)),
    }

    match storage.create_course(course_data).await {
        Ok(course) => {
            tracing::info!("Created course {} ({})", course.code, course.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created")))
        }
        Err(e) => Ok(internal_error("Course creation failed", e)),
    }
}
