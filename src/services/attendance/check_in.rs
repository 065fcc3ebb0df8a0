use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, invalid_location, today};
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::attendance::entities::{
    AttendanceStatus, CheckInRejection, attendance_rate, evaluate_check_in, valid_coordinates,
};
use crate::models::attendance::requests::CheckInRequest;
use crate::models::attendance::responses::CheckInResponse;
use crate::models::courses::entities::EnrollmentRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{course_forbidden, internal_error, unauthorized};
use crate::storage::AttendanceMark;

fn token_invalid() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AttendanceTokenInvalid,
        "Attendance code is invalid",
    ))
}

pub async fn check_in(
    service: &AttendanceService,
    request: &HttpRequest,
    body: CheckInRequest,
) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    // 1. 坐标
    if !valid_coordinates(body.latitude, body.longitude) {
        return Ok(invalid_location());
    }

    // 2. 令牌
    let token = body.token.trim();
    if token.is_empty() {
        return Ok(token_invalid());
    }
    let storage = service.get_storage(request)?;
    let session = match storage.get_attendance_session_by_token(token).await {
        Ok(Some(session)) => session,
        Ok(None) => return Ok(token_invalid()),
        Err(e) => return Ok(internal_error("Failed to look up attendance code", e)),
    };

    let is_enrolled_student = match storage
        .get_user_course_enrollments(student_id, session.course_id)
        .await
    {
        Ok(enrollments) => enrollments.iter().any(|e| e.role == EnrollmentRole::Student),
        Err(e) => return Ok(internal_error("Failed to check enrollment", e)),
    };

    // 3. 过期、选课、距离
    let radius = AppConfig::get().attendance.geofence_radius_meters;
    let distance_m = match evaluate_check_in(
        &session,
        chrono::Utc::now(),
        body.latitude,
        body.longitude,
        is_enrolled_student,
        radius,
    ) {
        Ok(distance) => distance,
        Err(CheckInRejection::InvalidLocation) => return Ok(invalid_location()),
        Err(CheckInRejection::TokenExpired) => {
            return Ok(HttpResponse::Gone().json(ApiResponse::error_empty(
                ErrorCode::AttendanceTokenExpired,
                "Attendance code has expired",
            )));
        }
        Err(CheckInRejection::NotYetOpen) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::AttendanceSessionNotOpen,
                "Attendance for this session is not open yet",
            )));
        }
        Err(CheckInRejection::NotEnrolled) => return Ok(course_forbidden()),
        Err(CheckInRejection::OutOfRange { distance_m }) => {
            tracing::info!(
                "Student {} out of range for session {}: {:.0} m",
                student_id,
                session.id,
                distance_m
            );
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::AttendanceOutOfRange,
                format!(
                    "You are {distance_m:.0} m away from the classroom (limit {radius:.0} m)"
                ),
            )));
        }
    };

    let mark = AttendanceMark {
        session_id: session.id,
        course_id: session.course_id,
        student_id,
        status: AttendanceStatus::Present,
        latitude: Some(body.latitude),
        longitude: Some(body.longitude),
        distance_m: Some(distance_m),
    };

    let (record, previous) = match storage.upsert_attendance_record(mark).await {
        Ok(result) => result,
        Err(e) => return Ok(internal_error("Failed to record attendance", e)),
    };
    let already_checked_in = previous.is_some_and(|p| p.status == AttendanceStatus::Present);

    let (attended, total) = match storage
        .student_attendance_counts(session.course_id, student_id, &today())
        .await
    {
        Ok(counts) => counts,
        Err(e) => return Ok(internal_error("Failed to compute attendance rate", e)),
    };

    let message = if already_checked_in {
        "Already checked in for this session"
    } else {
        "Check-in successful"
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CheckInResponse {
            message: message.to_string(),
            already_checked_in,
            record,
            attendance_rate: attendance_rate(attended, total),
            attended_sessions: attended,
            total_sessions: total,
        },
        message,
    )))
}
