pub mod check_in;
pub mod generate;
pub mod mine;
pub mod records;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attendance::entities::AttendanceSession;
use crate::models::attendance::requests::{CheckInRequest, GenerateQrRequest, MarkAttendanceRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 生成（或轮换）签到二维码
    pub async fn generate_qr_session(
        &self,
        request: &HttpRequest,
        body: GenerateQrRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_qr_session(self, request, body).await
    }

    // 扫码签到
    pub async fn check_in(
        &self,
        request: &HttpRequest,
        body: CheckInRequest,
    ) -> ActixResult<HttpResponse> {
        check_in::check_in(self, request, body).await
    }

    // 会话的出勤记录
    pub async fn list_session_records(
        &self,
        request: &HttpRequest,
        session_id: i64,
    ) -> ActixResult<HttpResponse> {
        records::list_session_records(self, request, session_id).await
    }

    // 课程的签到会话
    pub async fn list_course_sessions(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        records::list_course_sessions(self, request, course_id).await
    }

    // 手动标记出勤
    pub async fn mark_attendance(
        &self,
        request: &HttpRequest,
        session_id: i64,
        body: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        records::mark_attendance(self, request, session_id, body).await
    }

    // 我的出勤
    pub async fn my_attendance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_attendance(self, request).await
    }
}

pub(crate) fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub(crate) fn invalid_location() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::AttendanceInvalidLocation,
        "Latitude must be within [-90, 90] and longitude within [-180, 180]",
    ))
}

// 按 ID 取出会话
pub(crate) async fn load_session(
    storage: &dyn Storage,
    session_id: i64,
) -> Result<AttendanceSession, HttpResponse> {
    match storage.get_attendance_session_by_id(session_id).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttendanceSessionNotFound,
            "Attendance session not found",
        ))),
        Err(e) => Err(super::internal_error("Failed to get attendance session", e)),
    }
}
