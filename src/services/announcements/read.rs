use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnnouncementService, announcement_not_found, is_visible, visible_courses};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::{internal_error, unauthorized};

pub async fn mark_read(
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

    let visible = match visible_courses(&storage, &user).await {
        Ok(visible) => visible,
        Err(e) => return Ok(internal_error("Failed to resolve visible courses", e)),
    };
    // 不可见的公告按不存在处理
    if !is_visible(announcement.course_id, &visible) {
        return Ok(announcement_not_found());
    }

    match storage.mark_announcement_read(announcement_id, user.id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Announcement marked as read",
        ))),
        Ok(false) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Announcement already read",
        ))),
        Err(e) => Ok(internal_error("Failed to mark announcement as read", e)),
    }
}
