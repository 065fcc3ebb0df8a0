use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeChangeService;
use crate::errors::PortalError;
use crate::middlewares::RequireJWT;
use crate::models::grade_changes::entities::{SubmissionError, validate_submission};
use crate::models::grade_changes::requests::SubmitGradeChangeRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{course_access, course_forbidden, internal_error, unauthorized};

pub async fn submit_grade_change(
    service: &GradeChangeService,
    request: &HttpRequest,
    mut submission: SubmitGradeChangeRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let grade = match storage.get_grade_by_id(submission.grade_id).await {
        Ok(Some(g)) => g,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GradeNotFound,
                "Grade not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get grade", e)),
    };

    let assessment = match storage.get_assessment_by_id(grade.assessment_id).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssessmentNotFound,
                "Assessment not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get assessment", e)),
    };

    match course_access(&storage, &user, assessment.course_id).await {
        Ok(access) if access.is_staff() => {}
        Ok(_) => return Ok(course_forbidden()),
        Err(e) => return Ok(internal_error("Failed to check course role", e)),
    }

    if let Err(rule) = validate_submission(
        grade.score,
        submission.requested_score,
        assessment.max_points,
        &submission.justification,
    ) {
        let (code, message) = match rule {
            SubmissionError::EmptyJustification => (
                ErrorCode::ValidationFailed,
                "A justification is required".to_string(),
            ),
            SubmissionError::ScoreOutOfBounds => (
                ErrorCode::GradeExceedsMaxPoints,
                format!(
                    "Requested score must be between 0 and {}",
                    assessment.max_points
                ),
            ),
            SubmissionError::ScoreUnchanged => (
                ErrorCode::ValidationFailed,
                "Requested score equals the current score".to_string(),
            ),
        };
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message)));
    }
    submission.justification = submission.justification.trim().to_string();

    // 附件必须是已上传的文件
    if let Some(token) = submission.attachment_token.as_deref() {
        match storage.get_file_by_token(token).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileNotFound,
                    "Attachment not found",
                )));
            }
            Err(e) => return Ok(internal_error("Failed to check attachment", e)),
        }
    }

    match storage.find_pending_grade_change(grade.id).await {
        Ok(Some(pending)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::GradeChangeAlreadyPending,
                format!("Request #{} is already pending for this grade", pending.id),
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check pending requests", e)),
    }

    match storage
        .create_grade_change(submission, user.id, grade.score)
        .await
    {
        Ok(created) => {
            tracing::info!(
                "User {} requested grade {} change {} -> {}",
                user.id,
                created.grade_id,
                created.previous_score,
                created.requested_score
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Grade change request submitted",
            )))
        }
        Err(PortalError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::GradeChangeAlreadyPending,
                "A pending request already exists for this grade",
            ),
        )),
        Err(e) => Ok(internal_error("Failed to submit grade change", e)),
    }
}
