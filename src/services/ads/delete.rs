use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AdService, ad_not_found};
use crate::models::ApiResponse;
use crate::services::internal_error;

pub async fn delete_ad(
    service: &AdService,
    request: &HttpRequest,
    ad_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_ad(ad_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Advertisement deleted successfully",
        ))),
        Ok(false) => Ok(ad_not_found()),
        Err(e) => Ok(internal_error("Failed to delete advertisement", e)),
    }
}
