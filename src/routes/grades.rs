use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::{MyGradesQuery, RecordGradeRequest};
use crate::models::users::entities::UserRole;
use crate::services::GradeService;
use crate::utils::SafeAssessmentIdI64;

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn record_grade(
    req: HttpRequest,
    body: web::Json<RecordGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.record_grade(&req, body.into_inner()).await
}

pub async fn list_assessment_grades(
    req: HttpRequest,
    assessment_id: SafeAssessmentIdI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .list_assessment_grades(&req, assessment_id.0)
        .await
}

pub async fn list_my_grades(
    req: HttpRequest,
    query: web::Query<MyGradesQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_my_grades(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::post()
                        .to(record_grade)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/mine").route(
                    web::get()
                        .to(list_my_grades)
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            )
            // 课程角色在服务层按考核所属课程校验
            .route(
                "/assessments/{assessment_id}",
                web::get().to(list_assessment_grades),
            ),
    );
}
