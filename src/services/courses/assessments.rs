use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::middlewares::RequireJWT;
use crate::models::assessments::entities::{Assessment, validate_scoring};
use crate::models::assessments::requests::{CreateAssessmentRequest, UpdateAssessmentRequest};
use crate::models::assessments::responses::AssessmentListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, unauthorized};
use crate::storage::Storage;

const DEFAULT_WEIGHT: f64 = 1.0;

fn assessment_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AssessmentNotFound,
        "Assessment not found",
    ))
}

// 取出课程下的考核，不属于该课程时视为不存在
async fn load_assessment(
    storage: &dyn Storage,
    course_id: i64,
    assessment_id: i64,
) -> Result<Assessment, HttpResponse> {
    match storage.get_assessment_by_id(assessment_id).await {
        Ok(Some(a)) if a.course_id == course_id => Ok(a),
        Ok(_) => Err(assessment_not_found()),
        Err(e) => Err(internal_error("Failed to get assessment", e)),
    }
}

pub async fn list_assessments(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_course_assessments(course_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssessmentListResponse { items },
            "Assessments retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list assessments", e)),
    }
}

pub async fn create_assessment(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    mut assessment: CreateAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    assessment.title = assessment.title.trim().to_string();
    if assessment.title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Assessment title is required",
        )));
    }
    let weight = *assessment.weight.get_or_insert(DEFAULT_WEIGHT);
    if let Err(msg) = validate_scoring(assessment.max_points, weight) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request)?;

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get course", e)),
    }

    match storage.create_assessment(course_id, user_id, assessment).await {
        Ok(created) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(created, "Assessment created"))),
        Err(e) => Ok(internal_error("Failed to create assessment", e)),
    }
}

pub async fn update_assessment(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    assessment_id: i64,
    update: UpdateAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let current = match load_assessment(storage.as_ref(), course_id, assessment_id).await {
        Ok(a) => a,
        Err(resp) => return Ok(resp),
    };

    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Assessment title cannot be empty",
        )));
    }

    let max_points = update.max_points.unwrap_or(current.max_points);
    let weight = update.weight.unwrap_or(current.weight);
    if let Err(msg) = validate_scoring(max_points, weight) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 降低满分时不能低于已录入的最高分
    if max_points < current.max_points {
        match storage.list_assessment_grades(assessment_id).await {
            Ok(grades) => {
                let top = grades
                    .iter()
                    .map(|g| g.grade.score)
                    .fold(f64::NEG_INFINITY, f64::max);
                if top > max_points {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::GradeExceedsMaxPoints,
                        format!("A recorded grade ({top}) exceeds the new max_points ({max_points})"),
                    )));
                }
            }
            Err(e) => return Ok(internal_error("Failed to check recorded grades", e)),
        }
    }

    match storage.update_assessment(assessment_id, update).await {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            updated,
            "Assessment updated successfully",
        ))),
        Ok(None) => Ok(assessment_not_found()),
        Err(e) => Ok(internal_error("Failed to update assessment", e)),
    }
}

pub async fn delete_assessment(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    assessment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_assessment(storage.as_ref(), course_id, assessment_id).await {
        return Ok(resp);
    }

    match storage.delete_assessment(assessment_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assessment deleted"))),
        Ok(false) => Ok(assessment_not_found()),
        Err(e) => Ok(internal_error("Failed to delete assessment", e)),
    }
}
