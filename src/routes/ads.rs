use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ads::requests::{AdListQuery, CreateAdRequest, UpdateAdRequest};
use crate::models::users::entities::UserRole;
use crate::services::AdService;
use crate::utils::SafeIDI64;

static AD_SERVICE: Lazy<AdService> = Lazy::new(AdService::new_lazy);

pub async fn list_ads(
    req: HttpRequest,
    query: web::Query<AdListQuery>,
) -> ActixResult<HttpResponse> {
    AD_SERVICE.list_ads(&req, query.into_inner()).await
}

pub async fn get_ad(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    AD_SERVICE.get_ad(&req, id.0).await
}

pub async fn create_ad(
    req: HttpRequest,
    body: web::Json<CreateAdRequest>,
) -> ActixResult<HttpResponse> {
    AD_SERVICE.create_ad(&req, body.into_inner()).await
}

pub async fn update_ad(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateAdRequest>,
) -> ActixResult<HttpResponse> {
    AD_SERVICE.update_ad(&req, id.0, body.into_inner()).await
}

pub async fn delete_ad(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    AD_SERVICE.delete_ad(&req, id.0).await
}

// 配置路由
pub fn configure_ads_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/ads")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_ads)).route(
                    web::post()
                        .to(create_ad)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_ad))
                    .route(
                        web::put()
                            .to(update_ad)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_ad)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
