use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::schedules::requests::{
    CreateScheduleRequest, ScheduleQuery, UpdateScheduleRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ScheduleService;
use crate::utils::SafeIDI64;

static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn list_slots(
    req: HttpRequest,
    query: web::Query<ScheduleQuery>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.list_slots(&req, query.into_inner()).await
}

pub async fn list_my_slots(
    req: HttpRequest,
    query: web::Query<ScheduleQuery>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.list_my_slots(&req, query.into_inner()).await
}

pub async fn create_slot(
    req: HttpRequest,
    body: web::Json<CreateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.create_slot(&req, body.into_inner()).await
}

pub async fn update_slot(
    req: HttpRequest,
    slot_id: SafeIDI64,
    body: web::Json<UpdateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .update_slot(&req, slot_id.0, body.into_inner())
        .await
}

pub async fn delete_slot(req: HttpRequest, slot_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.delete_slot(&req, slot_id.0).await
}

// 配置路由
pub fn configure_schedules_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schedules")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_slots)).route(
                    web::post()
                        .to(create_slot)
                        .wrap(middlewares::RequireRole::new_any(UserRole::office_roles())),
                ),
            )
            .route("/mine", web::get().to(list_my_slots))
            .service(
                web::resource("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::office_roles()))
                    .route(web::put().to(update_slot))
                    .route(web::delete().to(delete_slot)),
            ),
    );
}
