use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnnouncementService;
use crate::middlewares::RequireJWT;
use crate::models::announcements::requests::CreateAnnouncementRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{course_access, course_forbidden, internal_error, unauthorized};

pub async fn create_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    mut body: CreateAnnouncementRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    body.title = body.title.trim().to_string();
    body.content = body.content.trim().to_string();
    if body.title.is_empty() || body.content.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Title and content are required",
        )));
    }
    if body.title.chars().count() > 200 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Title must be at most 200 characters",
        )));
    }

    let storage = service.get_storage(request)?;

    match body.course_id {
        Some(course_id) => {
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
            match course_access(&storage, &user, course_id).await {
                Ok(access) if access.is_staff() => {}
                Ok(_) => return Ok(course_forbidden()),
                Err(e) => return Ok(internal_error("Failed to check course role", e)),
            }
        }
        // 全院公告仅限管理员与教务处
        None if !user.role.is_privileged() => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "Only administrators can publish faculty-wide announcements",
            )));
        }
        None => {}
    }

    match storage.create_announcement(user.id, body).await {
        Ok(announcement) => {
            tracing::info!(
                "Announcement {} published by user {}",
                announcement.id,
                user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                announcement,
                "Announcement published successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to publish announcement", e)),
    }
}
