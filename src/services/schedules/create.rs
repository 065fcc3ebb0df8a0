use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ScheduleService, conflict_response, find_conflict};
use crate::models::schedules::entities::validate_slot;
use crate::models::schedules::requests::CreateScheduleRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::utils::validate::validate_academic_year;

pub async fn create_slot(
    service: &ScheduleService,
    request: &HttpRequest,
    mut slot: CreateScheduleRequest,
) -> ActixResult<HttpResponse> {
    slot.room = slot.room.trim().to_string();
    slot.academic_year = slot.academic_year.trim().to_string();

    let window = match validate_slot(slot.day_of_week, &slot.start_time, &slot.end_time) {
        Ok(window) => window,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    };
    if let Err(msg) = validate_academic_year(&slot.academic_year) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    if slot.room.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Room is required",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.get_course_by_id(slot.course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get course", e)),
    }

    match storage
        .list_room_slots(&slot.room, slot.day_of_week, &slot.academic_year, None)
        .await
    {
        Ok(existing) => {
            if let Some(clash) = find_conflict(&existing, window) {
                return Ok(conflict_response(clash));
            }
        }
        Err(e) => return Ok(internal_error("Failed to check room availability", e)),
    }

    match storage.create_schedule_slot(slot).await {
        Ok(created) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(created, "Schedule slot created"))),
        Err(e) => Ok(internal_error("Failed to create schedule slot", e)),
    }
}
