use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::middlewares::RequireJWT;
use crate::models::grades::requests::MyGradesQuery;
use crate::models::grades::responses::{AssessmentGradesResponse, MyGradesResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{course_access, course_forbidden, internal_error, unauthorized};

pub async fn list_assessment_grades(
    service: &GradeService,
    request: &HttpRequest,
    assessment_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let assessment = match storage.get_assessment_by_id(assessment_id).await {
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

    match storage.list_assessment_grades(assessment_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssessmentGradesResponse {
                assessment_id,
                max_points: assessment.max_points,
                items,
            },
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list grades", e)),
    }
}

pub async fn list_my_grades(
    service: &GradeService,
    request: &HttpRequest,
    query: MyGradesQuery,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    match storage.list_student_grades(user_id, query.course_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MyGradesResponse { items },
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list grades", e)),
    }
}
