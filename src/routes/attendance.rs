use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    CheckInRequest, GenerateQrRequest, MarkAttendanceRequest,
};
use crate::models::courses::entities::EnrollmentRole;
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::{SafeCourseIdI64, SafeSessionIdI64};

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn generate_qr_session(
    req: HttpRequest,
    body: web::Json<GenerateQrRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .generate_qr_session(&req, body.into_inner())
        .await
}

pub async fn check_in(
    req: HttpRequest,
    body: web::Json<CheckInRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.check_in(&req, body.into_inner()).await
}

pub async fn list_session_records(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_session_records(&req, session_id.0)
        .await
}

pub async fn mark_attendance(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_attendance(&req, session_id.0, body.into_inner())
        .await
}

pub async fn list_course_sessions(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_course_sessions(&req, course_id.0)
        .await
}

pub async fn my_attendance(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.my_attendance(&req).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/sessions")
                    .wrap(middlewares::RateLimit::qr_generate())
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(generate_qr_session)),
            )
            .service(
                // 限流按学生计数，防止批量猜测令牌
                web::resource("/check-in")
                    .wrap(middlewares::RateLimit::check_in())
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
                    .route(web::post().to(check_in)),
            )
            .service(
                web::resource("/sessions/{session_id}/records")
                    .route(web::get().to(list_session_records))
                    .route(web::put().to(mark_attendance)),
            )
            .service(
                web::resource("/courses/{course_id}/sessions")
                    .wrap(middlewares::RequireCourseRole::new_any(
                        EnrollmentRole::staff_roles(),
                    ))
                    .route(web::get().to(list_course_sessions)),
            )
            .service(
                web::resource("/mine")
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
                    .route(web::get().to(my_attendance)),
            ),
    );
}
