pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::schedules::entities::{ScheduleSlot, overlaps};
use crate::models::schedules::requests::{
    CreateScheduleRequest, ScheduleQuery, UpdateScheduleRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct ScheduleService {
    storage: Option<Arc<dyn Storage>>,
}

impl ScheduleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 课表列表
    pub async fn list_slots(
        &self,
        request: &HttpRequest,
        query: ScheduleQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_slots(self, request, query).await
    }

    // 我的课表
    pub async fn list_my_slots(
        &self,
        request: &HttpRequest,
        query: ScheduleQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_my_slots(self, request, query).await
    }

    // 创建时段
    pub async fn create_slot(
        &self,
        request: &HttpRequest,
        slot: CreateScheduleRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_slot(self, request, slot).await
    }

    // 更新时段
    pub async fn update_slot(
        &self,
        request: &HttpRequest,
        slot_id: i64,
        update: UpdateScheduleRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_slot(self, request, slot_id, update).await
    }

    // 删除时段
    pub async fn delete_slot(&self, request: &HttpRequest, slot_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_slot(self, request, slot_id).await
    }
}

/// 同一教室同一天同一学年中与 `window` 相交的第一个时段
pub(crate) fn find_conflict(existing: &[ScheduleSlot], window: (u32, u32)) -> Option<&ScheduleSlot> {
    existing
        .iter()
        .find(|slot| slot.minutes().is_some_and(|m| overlaps(m, window)))
}

pub(crate) fn conflict_response(slot: &ScheduleSlot) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::ScheduleConflict,
        format!(
            "Room {} is already booked {}-{} (slot #{})",
            slot.room, slot.start_time, slot.end_time, slot.id
        ),
    ))
}

pub(crate) fn slot_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ScheduleNotFound,
        "Schedule slot not found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: i64, start: &str, end: &str) -> ScheduleSlot {
        ScheduleSlot {
            id,
            course_id: 1,
            academic_year: "2025-2026".to_string(),
            day_of_week: 2,
            start_time: start.to_string(),
            end_time: end.to_string(),
            room: "A12".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn finds_overlapping_slot() {
        let existing = vec![slot(1, "08:00", "09:30"), slot(2, "10:00", "11:30")];
        // 09:00-10:30 同时压到两个时段，返回第一个
        assert_eq!(find_conflict(&existing, (540, 630)).map(|s| s.id), Some(1));
        // 09:30-10:00 恰好夹在中间
        assert!(find_conflict(&existing, (570, 600)).is_none());
    }
}
