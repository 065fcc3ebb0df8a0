use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ScheduleService, conflict_response, find_conflict, slot_not_found};
use crate::models::schedules::entities::validate_slot;
use crate::models::schedules::requests::UpdateScheduleRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;

pub async fn update_slot(
    service: &ScheduleService,
    request: &HttpRequest,
    slot_id: i64,
    mut update: UpdateScheduleRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let current = match storage.get_schedule_slot_by_id(slot_id).await {
        Ok(Some(slot)) => slot,
        Ok(None) => return Ok(slot_not_found()),
        Err(e) => return Ok(internal_error("Failed to get schedule slot", e)),
    };

    if let Some(room) = update.room.as_mut() {
        *room = room.trim().to_string();
        if room.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                "Room cannot be empty",
            )));
        }
    }

    // 合并后的时段整体校验
    let day = update.day_of_week.unwrap_or(current.day_of_week);
    let start = update.start_time.as_deref().unwrap_or(&current.start_time);
    let end = update.end_time.as_deref().unwrap_or(&current.end_time);
    let room = update.room.as_deref().unwrap_or(&current.room);

    let window = match validate_slot(day, start, end) {
        Ok(window) => window,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    };

    match storage
        .list_room_slots(room, day, &current.academic_year, Some(slot_id))
        .await
    {
        Ok(existing) => {
            if let Some(clash) = find_conflict(&existing, window) {
                return Ok(conflict_response(clash));
            }
        }
        Err(e) => return Ok(internal_error("Failed to check room availability", e)),
    }

    match storage.update_schedule_slot(slot_id, update).await {
        Ok(Some(slot)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            slot,
            "Schedule slot updated",
        ))),
        Ok(None) => Ok(slot_not_found()),
        Err(e) => Ok(internal_error("Failed to update schedule slot", e)),
    }
}
