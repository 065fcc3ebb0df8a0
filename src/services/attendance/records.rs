use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, load_session};
use crate::middlewares::RequireJWT;
use crate::models::attendance::requests::MarkAttendanceRequest;
use crate::models::attendance::responses::{SessionListResponse, SessionRecordsResponse};
use crate::models::courses::entities::EnrollmentRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{course_access, course_forbidden, internal_error, unauthorized};
use crate::storage::AttendanceMark;

pub async fn list_session_records(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let session = match load_session(storage.as_ref(), session_id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    match course_access(&storage, &user, session.course_id).await {
        Ok(access) if access.is_staff() => {}
        Ok(_) => return Ok(course_forbidden()),
        Err(e) => return Ok(internal_error("Failed to check course role", e)),
    }

    match storage.list_session_records(session_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SessionRecordsResponse { session, items },
            "Attendance records retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list attendance records", e)),
    }
}

/// 课程角色已由路由中间件校验
pub async fn list_course_sessions(
    service: &AttendanceService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_course_sessions(course_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SessionListResponse { items },
            "Attendance sessions retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list attendance sessions", e)),
    }
}

pub async fn mark_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
    body: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request)?;

    let session = match load_session(storage.as_ref(), session_id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    match course_access(&storage, &user, session.course_id).await {
        Ok(access) if access.is_staff() => {}
        Ok(_) => return Ok(course_forbidden()),
        Err(e) => return Ok(internal_error("Failed to check course role", e)),
    }

    match storage
        .get_user_course_enrollments(body.student_id, session.course_id)
        .await
    {
        Ok(enrollments) if enrollments.iter().any(|e| e.role == EnrollmentRole::Student) => {}
        Ok(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidEnrollmentRole,
                "Student is not enrolled in this course",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to check enrollment", e)),
    }

    let mark = AttendanceMark {
        session_id,
        course_id: session.course_id,
        student_id: body.student_id,
        status: body.status,
        latitude: None,
        longitude: None,
        distance_m: None,
    };

    match storage.upsert_attendance_record(mark).await {
        Ok((record, _)) => {
            tracing::info!(
                "User {} marked student {} for session {}",
                user.id,
                record.student_id,
                session_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(record, "Attendance updated")))
        }
        Err(e) => Ok(internal_error("Failed to update attendance", e)),
    }
}
