use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AnnouncementService, visible_courses};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::announcements::requests::{AnnouncementListQuery, AnnouncementQueryParams};
use crate::models::announcements::responses::UnreadCountResponse;
use crate::services::{internal_error, unauthorized};

pub async fn list_announcements(
    service: &AnnouncementService,
    request: &HttpRequest,
    query: AnnouncementQueryParams,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let visible = match visible_courses(&storage, &user).await {
        Ok(visible) => visible,
        Err(e) => return Ok(internal_error("Failed to resolve visible courses", e)),
    };

    let list_query = AnnouncementListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        viewer_id: user.id,
        visible_courses: visible,
        course_id: query.course_id,
        unread_only: query.unread_only.unwrap_or(false),
    };

    match storage.list_announcements_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Announcements retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list announcements", e)),
    }
}

pub async fn unread_count(
    service: &AnnouncementService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let visible = match visible_courses(&storage, &user).await {
        Ok(visible) => visible,
        Err(e) => return Ok(internal_error("Failed to resolve visible courses", e)),
    };

    match storage.count_unread_announcements(user.id, visible).await {
        Ok(unread_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse { unread_count },
            "Unread count retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to count unread announcements", e)),
    }
}
