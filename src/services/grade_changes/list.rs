use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeChangeService;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::grade_changes::requests::{GradeChangeListQuery, GradeChangeQueryParams};
use crate::services::{internal_error, unauthorized};

/// 教务处与管理员看到全部申请，教学人员只看到自己提交的
pub async fn list_grade_changes(
    service: &GradeChangeService,
    request: &HttpRequest,
    query: GradeChangeQueryParams,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let list_query = GradeChangeListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        status: query.status,
        requested_by: (!user.role.is_privileged()).then_some(user.id),
    };

    match storage.list_grade_changes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grade change requests retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list grade change requests", e)),
    }
}
