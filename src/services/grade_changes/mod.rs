pub mod get;
pub mod list;
pub mod review;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grade_changes::requests::{
    GradeChangeQueryParams, ReviewGradeChangeRequest, SubmitGradeChangeRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct GradeChangeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeChangeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 提交成绩修改申请
    pub async fn submit(
        &self,
        request: &HttpRequest,
        submission: SubmitGradeChangeRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_grade_change(self, request, submission).await
    }

    // 申请列表
    pub async fn list(
        &self,
        request: &HttpRequest,
        query: GradeChangeQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_grade_changes(self, request, query).await
    }

    // 申请详情
    pub async fn get(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_grade_change(self, request, id).await
    }

    // 审核申请
    pub async fn review(
        &self,
        request: &HttpRequest,
        id: i64,
        review: ReviewGradeChangeRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_grade_change(self, request, id, review).await
    }
}

pub(crate) fn grade_change_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::GradeChangeNotFound,
        "Grade change request not found",
    ))
}
