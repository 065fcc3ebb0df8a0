use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AdService, check_image_token, validate_link_url};
use crate::middlewares::RequireJWT;
use crate::models::ads::requests::CreateAdRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, unauthorized};

pub async fn create_ad(
    service: &AdService,
    request: &HttpRequest,
    mut body: CreateAdRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    body.title = body.title.trim().to_string();
    if body.title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Title is required",
        )));
    }
    if let Some(url) = body.link_url.as_deref()
        && let Err(msg) = validate_link_url(url)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request)?;

    if let Some(token) = body.image_token.as_deref()
        && let Err(resp) = check_image_token(&storage, token).await
    {
        return Ok(resp);
    }

    match storage.create_ad(user_id, body).await {
        Ok(ad) => Ok(HttpResponse::Created().json(ApiResponse::success(
            ad,
            "Advertisement created successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to create advertisement", e)),
    }
}
