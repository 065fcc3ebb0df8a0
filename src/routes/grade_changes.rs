use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grade_changes::requests::{
    GradeChangeQueryParams, ReviewGradeChangeRequest, SubmitGradeChangeRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::GradeChangeService;
use crate::utils::SafeIDI64;

static GRADE_CHANGE_SERVICE: Lazy<GradeChangeService> =
    Lazy::new(GradeChangeService::new_lazy);

pub async fn submit(
    req: HttpRequest,
    body: web::Json<SubmitGradeChangeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_CHANGE_SERVICE.submit(&req, body.into_inner()).await
}

pub async fn list(
    req: HttpRequest,
    query: web::Query<GradeChangeQueryParams>,
) -> ActixResult<HttpResponse> {
    GRADE_CHANGE_SERVICE.list(&req, query.into_inner()).await
}

pub async fn get(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADE_CHANGE_SERVICE.get(&req, id.0).await
}

pub async fn review(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ReviewGradeChangeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_CHANGE_SERVICE
        .review(&req, id.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_grade_changes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grade-changes")
            // 学生不参与成绩修改流程；后 wrap 的先执行，RequireJWT 放在最后
            .wrap(middlewares::RequireRole::new_any(&[
                &UserRole::User,
                &UserRole::Admin,
                &UserRole::AcademicOffice,
            ]))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list)).route(
                    web::post()
                        .to(submit)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .route("/{id}", web::get().to(get))
            .service(
                web::resource("/{id}/review")
                    .wrap(middlewares::RequireRole::new_any(UserRole::office_roles()))
                    .route(web::post().to(review)),
            ),
    );
}
