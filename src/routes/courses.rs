use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assessments::requests::{CreateAssessmentRequest, UpdateAssessmentRequest};
use crate::models::courses::entities::EnrollmentRole;
use crate::models::courses::requests::{
    AddEnrollmentRequest, CourseQueryParams, CreateCourseRequest, EnrollmentQuery,
    MyCoursesQuery, UpdateCourseRequest,
};
use crate::models::pv::requests::PvQuery;
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::{SafeAssessmentIdI64, SafeCourseIdI64, SafeEnrollmentIdI64};

// 懒加载的全局 COURSE_SERVICE 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

// HTTP处理程序
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseQueryParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn list_my_courses(
    req: HttpRequest,
    query: web::Query<MyCoursesQuery>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_my_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(&req, course_data.into_inner())
        .await
}

pub async fn get_course(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(&req, course_id.0, update_data.into_inner())
        .await
}

pub async fn delete_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&req, course_id.0).await
}

pub async fn list_enrollments(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    query: web::Query<EnrollmentQuery>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .list_enrollments(&req, course_id.0, query.into_inner())
        .await
}

pub async fn add_enrollment(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    body: web::Json<AddEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .add_enrollment(&req, course_id.0, body.into_inner())
        .await
}

pub async fn remove_enrollment(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .remove_enrollment(&req, course_id.0, enrollment_id.0)
        .await
}

pub async fn list_assessments(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_assessments(&req, course_id.0).await
}

pub async fn create_assessment(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    body: web::Json<CreateAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_assessment(&req, course_id.0, body.into_inner())
        .await
}

pub async fn update_assessment(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    assessment_id: SafeAssessmentIdI64,
    body: web::Json<UpdateAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_assessment(&req, course_id.0, assessment_id.0, body.into_inner())
        .await
}

pub async fn delete_assessment(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    assessment_id: SafeAssessmentIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .delete_assessment(&req, course_id.0, assessment_id.0)
        .await
}

pub async fn get_pv(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    query: web::Query<PvQuery>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .get_pv(&req, course_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_courses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                // 所有人可浏览课程目录，管理员 / 教务处开课
                web::resource("").route(web::get().to(list_courses)).route(
                    web::post()
                        .to(create_course)
                        .wrap(middlewares::RequireRole::new_any(UserRole::office_roles())),
                ),
            )
            // 必须在 /{course_id} 之前注册
            .route("/mine", web::get().to(list_my_courses))
            .service(
                web::scope("/{course_id}")
                    .service(
                        web::resource("")
                            .route(web::get().to(get_course))
                            .route(
                                web::put().to(update_course).wrap(
                                    middlewares::RequireRole::new_any(UserRole::office_roles()),
                                ),
                            )
                            .route(
                                web::delete().to(delete_course).wrap(
                                    middlewares::RequireRole::new_any(UserRole::office_roles()),
                                ),
                            ),
                    )
                    .service(
                        web::resource("/enrollments")
                            // 任课教师可查看名单，增删由教务处负责
                            .route(web::get().to(list_enrollments).wrap(
                                middlewares::RequireCourseRole::new_any(
                                    EnrollmentRole::staff_roles(),
                                ),
                            ))
                            .route(web::post().to(add_enrollment).wrap(
                                middlewares::RequireRole::new_any(UserRole::office_roles()),
                            )),
                    )
                    .service(
                        web::resource("/enrollments/{enrollment_id}").route(
                            web::delete().to(remove_enrollment).wrap(
                                middlewares::RequireRole::new_any(UserRole::office_roles()),
                            ),
                        ),
                    )
                    .service(
                        web::resource("/assessments")
                            // 选课学生可查看考核项
                            .route(web::get().to(list_assessments).wrap(
                                middlewares::RequireCourseRole::new_any(
                                    EnrollmentRole::all_roles(),
                                ),
                            ))
                            .route(web::post().to(create_assessment).wrap(
                                middlewares::RequireCourseRole::new_any(
                                    EnrollmentRole::staff_roles(),
                                ),
                            )),
                    )
                    .service(
                        web::resource("/assessments/{assessment_id}")
                            .wrap(middlewares::RequireCourseRole::new_any(
                                EnrollmentRole::staff_roles(),
                            ))
                            .route(web::put().to(update_assessment))
                            .route(web::delete().to(delete_assessment)),
                    )
                    .service(
                        web::resource("/pv")
                            .wrap(middlewares::RequireCourseRole::new_any(
                                EnrollmentRole::staff_roles(),
                            ))
                            .route(web::get().to(get_pv)),
                    ),
            ),
    );
}
