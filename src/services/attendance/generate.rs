use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, invalid_location};
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::attendance::entities::{session_expiry, valid_coordinates};
use crate::models::attendance::requests::GenerateQrRequest;
use crate::models::attendance::responses::QrSessionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{course_access, course_forbidden, internal_error, unauthorized};
use crate::storage::NewAttendanceSession;
use crate::utils::random_code::generate_random_code;
use crate::utils::validate::parse_date;

const TOKEN_LENGTH: usize = 32;

pub async fn generate_qr_session(
    service: &AttendanceService,
    request: &HttpRequest,
    body: GenerateQrRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    if !valid_coordinates(body.latitude, body.longitude) {
        return Ok(invalid_location());
    }

    let today = chrono::Utc::now().date_naive();
    let session_date = match body.session_date.as_deref().map(str::trim) {
        None | Some("") => today,
        Some(raw) => match parse_date(raw) {
            Ok(date) => date,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
            }
        },
    };
    if session_date < today {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Session date cannot be in the past",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.get_course_by_id(body.course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get course", e)),
    }

    match course_access(&storage, &user, body.course_id).await {
        Ok(access) if access.is_staff() => {}
        Ok(_) => return Ok(course_forbidden()),
        Err(e) => return Ok(internal_error("Failed to check course role", e)),
    }

    let new_session = NewAttendanceSession {
        course_id: body.course_id,
        session_date: session_date.format("%Y-%m-%d").to_string(),
        token: generate_random_code(TOKEN_LENGTH),
        latitude: body.latitude,
        longitude: body.longitude,
        created_by: user.id,
        expires_at: session_expiry(session_date).timestamp(),
    };

    match storage.upsert_attendance_session(new_session).await {
        Ok((session, regenerated)) => {
            tracing::info!(
                "User {} {} attendance session {} for course {} on {}",
                user.id,
                if regenerated { "rotated" } else { "opened" },
                session.id,
                session.course_id,
                session.session_date
            );
            let scan_url = AppConfig::get().attendance_scan_url(&session.token);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                QrSessionResponse {
                    session,
                    scan_url,
                    regenerated,
                },
                "Attendance QR code generated",
            )))
        }
        Err(e) => Ok(internal_error("Failed to generate attendance session", e)),
    }
}
