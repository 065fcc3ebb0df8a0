pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ads::requests::{AdListQuery, CreateAdRequest, UpdateAdRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AdService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_ads(
        &self,
        request: &HttpRequest,
        query: AdListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_ads(self, request, query).await
    }

    pub async fn get_ad(&self, request: &HttpRequest, ad_id: i64) -> ActixResult<HttpResponse> {
        list::get_ad(self, request, ad_id).await
    }

    pub async fn create_ad(
        &self,
        request: &HttpRequest,
        body: CreateAdRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_ad(self, request, body).await
    }

    pub async fn update_ad(
        &self,
        request: &HttpRequest,
        ad_id: i64,
        body: UpdateAdRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_ad(self, request, ad_id, body).await
    }

    pub async fn delete_ad(&self, request: &HttpRequest, ad_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_ad(self, request, ad_id).await
    }
}

pub(crate) fn ad_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AdNotFound,
        "Advertisement not found",
    ))
}

/// 链接只允许 http(s)
pub(crate) fn validate_link_url(url: &str) -> Result<(), &'static str> {
    let lower = url.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err("Link must be an absolute http(s) URL"),
    }
}

/// 广告图片必须是已上传的文件
pub(crate) async fn check_image_token(
    storage: &Arc<dyn Storage>,
    token: &str,
) -> Result<(), HttpResponse> {
    match storage.get_file_by_token(token).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "Image file not found, upload it first",
        ))),
        Err(e) => Err(super::internal_error("Failed to check image file", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_urls() {
        assert!(validate_link_url("https://faculty.example.org/events").is_ok());
        assert!(validate_link_url("HTTP://example.org").is_ok());
        assert!(validate_link_url("javascript:alert(1)").is_err());
        assert!(validate_link_url("https://").is_err());
        assert!(validate_link_url("ftp://example.org").is_err());
    }
}
