use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::middlewares::RequireJWT;
use crate::models::schedules::requests::ScheduleQuery;
use crate::models::schedules::responses::ScheduleListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, unauthorized};
use crate::utils::validate::validate_academic_year;

fn invalid_year(query: &ScheduleQuery) -> Option<HttpResponse> {
    let year = query.academic_year.as_deref()?;
    validate_academic_year(year).err().map(|msg| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg))
    })
}

pub async fn list_slots(
    service: &ScheduleService,
    request: &HttpRequest,
    query: ScheduleQuery,
) -> ActixResult<HttpResponse> {
    if let Some(resp) = invalid_year(&query) {
        return Ok(resp);
    }
    let storage = service.get_storage(request)?;

    match storage
        .list_schedule_slots(query.course_id.map(|id| vec![id]), query.academic_year)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ScheduleListResponse { items },
            "Schedule retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list schedule", e)),
    }
}

/// 当前用户所在课程的课表
pub async fn list_my_slots(
    service: &ScheduleService,
    request: &HttpRequest,
    query: ScheduleQuery,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    if let Some(resp) = invalid_year(&query) {
        return Ok(resp);
    }
    let storage = service.get_storage(request)?;

    let mut course_ids: Vec<i64> = match storage
        .list_user_courses(user_id, query.academic_year.clone())
        .await
    {
        Ok(courses) => courses.into_iter().map(|c| c.course.id).collect(),
        Err(e) => return Ok(internal_error("Failed to list my courses", e)),
    };
    course_ids.sort_unstable();
    course_ids.dedup();

    if course_ids.is_empty() {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            ScheduleListResponse { items: vec![] },
            "Schedule retrieved successfully",
        )));
    }

    match storage
        .list_schedule_slots(Some(course_ids), query.academic_year)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ScheduleListResponse { items },
            "Schedule retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list schedule", e)),
    }
}
