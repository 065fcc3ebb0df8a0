use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, today};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::attendance::responses::MyAttendanceResponse;
use crate::services::{internal_error, unauthorized};

pub async fn my_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    match storage
        .student_attendance_summaries(student_id, &today())
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MyAttendanceResponse { items },
            "Attendance summary retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to compute attendance summary", e)),
    }
}
