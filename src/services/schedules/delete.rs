use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ScheduleService, slot_not_found};
use crate::models::ApiResponse;
use crate::services::internal_error;

pub async fn delete_slot(
    service: &ScheduleService,
    request: &HttpRequest,
    slot_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_schedule_slot(slot_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Schedule slot deleted"))),
        Ok(false) => Ok(slot_not_found()),
        Err(e) => Ok(internal_error("Failed to delete schedule slot", e)),
    }
}
