use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnnouncementService, announcement_not_found};
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, unauthorized};

pub async fn delete_announcement(
    service: &AnnouncementService,
    request: &HttpRequest,
    announcement_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let announcement = match storage.get_announcement_by_id(announcement_id).await {
        Ok(Some(announcement)) => announcement,
        Ok(None) => return Ok(announcement_not_found()),
        Err(e) => return Ok(internal_error("Failed to get announcement", e)),
    };

    if announcement.author_id != user.id && user.role != UserRole::Admin {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the author or an administrator can delete this announcement",
        )));
    }

    match storage.delete_announcement(announcement_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Announcement deleted successfully",
        ))),
        Ok(false) => Ok(announcement_not_found()),
        Err(e) => Ok(internal_error("Failed to delete announcement", e)),
    }
}
