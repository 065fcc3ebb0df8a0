use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::middlewares::RequireJWT;
use crate::models::courses::requests::{CourseListQuery, CourseQueryParams, MyCoursesQuery};
use crate::models::courses::responses::MyCoursesResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, unauthorized};
use crate::utils::validate::validate_academic_year;

pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    query: CourseQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = CourseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
    };

    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list courses", e)),
    }
}

/// 当前用户任教或选修的课程
pub async fn list_my_courses(
    service: &CourseService,
    request: &HttpRequest,
    query: MyCoursesQuery,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Some(year) = query.academic_year.as_deref()
        && let Err(msg) = validate_academic_year(year)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request)?;

    match storage.list_user_courses(user_id, query.academic_year).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MyCoursesResponse { items },
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list my courses", e)),
    }
}
