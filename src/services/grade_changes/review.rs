use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeChangeService, grade_change_not_found};
use crate::errors::PortalError;
use crate::middlewares::RequireJWT;
use crate::models::assessments::entities::score_within_bounds;
use crate::models::grade_changes::entities::ReviewDecision;
use crate::models::grade_changes::requests::ReviewGradeChangeRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, unauthorized};

fn already_reviewed() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::GradeChangeAlreadyReviewed,
        "Only pending requests can be reviewed",
    ))
}

fn outdated() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::GradeChangeOutdated,
        "The grade changed after this request was submitted",
    ))
}

pub async fn review_grade_change(
    service: &GradeChangeService,
    request: &HttpRequest,
    id: i64,
    review: ReviewGradeChangeRequest,
) -> ActixResult<HttpResponse> {
    let Some(reviewer_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let change = match storage.get_grade_change_by_id(id).await {
        Ok(Some(change)) => change,
        Ok(None) => return Ok(grade_change_not_found()),
        Err(e) => return Ok(internal_error("Failed to get grade change request", e)),
    };

    if !change.status.is_pending() {
        return Ok(already_reviewed());
    }

    // 提交后满分可能被调低，批准前重新校验
    if review.decision == ReviewDecision::Approve {
        let grade = match storage.get_grade_by_id(change.grade_id).await {
            Ok(Some(g)) => g,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::GradeNotFound,
                    "Grade not found",
                )));
            }
            Err(e) => return Ok(internal_error("Failed to get grade", e)),
        };
        if grade.score != change.previous_score {
            return Ok(outdated());
        }
        match storage.get_assessment_by_id(grade.assessment_id).await {
            Ok(Some(a)) if score_within_bounds(change.requested_score, a.max_points) => {}
            Ok(Some(a)) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::GradeExceedsMaxPoints,
                    format!(
                        "Requested score no longer fits the assessment maximum ({})",
                        a.max_points
                    ),
                )));
            }
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::AssessmentNotFound,
                    "Assessment not found",
                )));
            }
            Err(e) => return Ok(internal_error("Failed to get assessment", e)),
        }
    }

    let comment = review
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    match storage
        .review_grade_change(id, reviewer_id, review.decision, comment)
        .await
    {
        Ok(reviewed) => {
            tracing::info!(
                "Grade change {} {} by user {}",
                reviewed.id,
                reviewed.status,
                reviewer_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                reviewed,
                "Grade change request reviewed",
            )))
        }
        // 冲突可能来自并发审核，也可能是成绩在此期间被改动
        Err(PortalError::Conflict(_)) => match storage.get_grade_change_by_id(id).await {
            Ok(Some(current)) if current.status.is_pending() => Ok(outdated()),
            _ => Ok(already_reviewed()),
        },
        Err(PortalError::NotFound(_)) => Ok(grade_change_not_found()),
        Err(e) => Ok(internal_error("Failed to review grade change request", e)),
    }
}
