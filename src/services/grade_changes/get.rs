use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeChangeService, grade_change_not_found};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, unauthorized};

pub async fn get_grade_change(
    service: &GradeChangeService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let change = match storage.get_grade_change_by_id(id).await {
        Ok(Some(change)) => change,
        Ok(None) => return Ok(grade_change_not_found()),
        Err(e) => return Ok(internal_error("Failed to get grade change request", e)),
    };

    if !user.role.is_privileged() && change.requested_by != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only view your own requests",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        change,
        "Grade change request retrieved successfully",
    )))
}
