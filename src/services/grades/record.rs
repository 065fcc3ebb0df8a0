use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::middlewares::RequireJWT;
use crate::models::courses::entities::EnrollmentRole;
use crate::models::grades::requests::RecordGradeRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{course_access, course_forbidden, internal_error, unauthorized};

pub async fn record_grade(
    service: &GradeService,
    request: &HttpRequest,
    mut grade: RecordGradeRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

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

    if !assessment.accepts_score(grade.score) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GradeExceedsMaxPoints,
            format!(
                "Score must be between 0 and {} for this assessment",
                assessment.max_points
            ),
        )));
    }

    // 成绩只能录给本课程的选课学生
    match storage
        .get_user_course_enrollments(grade.student_id, assessment.course_id)
        .await
    {
        Ok(enrollments) if enrollments.iter().any(|e| e.role == EnrollmentRole::Student) => {}
        Ok(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidEnrollmentRole,
                "Student is not enrolled in this course",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to check enrollment", e)),
    }

    // 有待审改分申请时不能直接覆盖成绩
    let existing = match storage
        .find_student_grade(grade.assessment_id, grade.student_id)
        .await
    {
        Ok(existing) => existing,
        Err(e) => return Ok(internal_error("Failed to get grade", e)),
    };
    if let Some(existing) = existing {
        match storage.find_pending_grade_change(existing.id).await {
            Ok(Some(_)) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::GradeChangeAlreadyPending,
                    "A grade change request is pending for this grade",
                )));
            }
            Ok(None) => {}
            Err(e) => return Ok(internal_error("Failed to check pending requests", e)),
        }
    }

    grade.comment = grade
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    match storage.upsert_grade(grade, user.id).await {
        Ok(saved) => {
            tracing::info!(
                "User {} recorded {} for student {} on assessment {}",
                user.id,
                saved.score,
                saved.student_id,
                saved.assessment_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Grade recorded")))
        }
        Err(e) => Ok(internal_error("Failed to record grade", e)),
    }
}
