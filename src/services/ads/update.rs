use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AdService, ad_not_found, check_image_token, validate_link_url};
use crate::models::ads::requests::UpdateAdRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;

pub async fn update_ad(
    service: &AdService,
    request: &HttpRequest,
    ad_id: i64,
    mut body: UpdateAdRequest,
) -> ActixResult<HttpResponse> {
    if let Some(title) = body.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                "Title cannot be empty",
            )));
        }
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

    match storage.update_ad(ad_id, body).await {
        Ok(Some(ad)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ad,
            "Advertisement updated successfully",
        ))),
        Ok(None) => Ok(ad_not_found()),
        Err(e) => Ok(internal_error("Failed to update advertisement", e)),
    }
}
