use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AdService, ad_not_found};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::ads::requests::AdListQuery;
use crate::models::ads::responses::AdListResponse;
use crate::models::users::entities::UserRole;
use crate::services::{internal_error, unauthorized};

pub async fn list_ads(
    service: &AdService,
    request: &HttpRequest,
    query: AdListQuery,
) -> ActixResult<HttpResponse> {
    let Some(role) = RequireJWT::extract_user_role(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    // 非管理员只能看到启用中的广告
    let active_only = role != UserRole::Admin || !query.include_inactive.unwrap_or(false);

    match storage.list_ads(active_only).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AdListResponse { items },
            "Advertisements retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list advertisements", e)),
    }
}

pub async fn get_ad(
    service: &AdService,
    request: &HttpRequest,
    ad_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(role) = RequireJWT::extract_user_role(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    match storage.get_ad_by_id(ad_id).await {
        Ok(Some(ad)) if ad.is_active || role == UserRole::Admin => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(ad, "Advertisement retrieved successfully"))),
        Ok(_) => Ok(ad_not_found()),
        Err(e) => Ok(internal_error("Failed to get advertisement", e)),
    }
}
