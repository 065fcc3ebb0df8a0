/*!
 * 基于课程角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后执行，从路径参数 `course_id` 读取课程。
 * 管理员与教务处直接放行；其他用户需在该课程（任一学年）持有所需的课程角色，
 * 命中的选课记录写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/{course_id}/assessments")
 *     .wrap(RequireCourseRole::new_any(EnrollmentRole::staff_roles()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{
        ErrorCode,
        courses::entities::{CourseEnrollment, EnrollmentRole},
        users::entities::User,
    },
    storage::Storage,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireCourseRole {
    allowed_roles: Vec<EnrollmentRole>,
}

impl RequireCourseRole {
    pub fn new(role: &EnrollmentRole) -> Self {
        Self {
            allowed_roles: vec![role.clone()],
        }
    }

    pub fn new_any(roles: &[&EnrollmentRole]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    /// 在用户的选课记录中找到第一条满足角色要求的
    pub fn matching<'a>(&self, enrollments: &'a [CourseEnrollment]) -> Option<&'a CourseEnrollment> {
        enrollments
            .iter()
            .find(|e| self.allowed_roles.contains(&e.role))
    }

    /// 从请求扩展中取出命中的选课记录，管理员 / 教务处放行时为 None
    pub fn extract_enrollment(req: &actix_web::HttpRequest) -> Option<CourseEnrollment> {
        req.extensions().get::<CourseEnrollment>().cloned()
    }
}

fn reject<B>(
    req: ServiceRequest,
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    Ok(req.into_response(create_error_response(status, code, message).map_into_right_body()))
}

impl<S, B> Transform<S, ServiceRequest> for RequireCourseRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireCourseRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireCourseRoleMiddleware {
            service: Rc::new(service),
            rule: self.clone(),
        }))
    }
}

pub struct RequireCourseRoleMiddleware<S> {
    service: Rc<S>,
    rule: RequireCourseRole,
}

impl<S, B> Service<ServiceRequest> for RequireCourseRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let rule = self.rule.clone();

        Box::pin(async move {
            // 1. 当前用户
            let user = req.extensions().get::<User>().cloned();
            let Some(user) = user else {
                return reject(
                    req,
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Unauthorized: missing user claims",
                );
            };

            // 2. course_id
            let Some(course_id) = req
                .match_info()
                .get("course_id")
                .and_then(|s| s.parse::<i64>().ok())
            else {
                return reject(
                    req,
                    StatusCode::BAD_REQUEST,
                    ErrorCode::BadRequest,
                    "Missing or invalid course_id",
                );
            };

            // 3. 管理员 / 教务处放行
            if user.role.is_privileged() {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            // 4. 查询选课记录
            let Some(storage) = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|d| d.get_ref().clone())
            else {
                error!("Storage not found in app data");
                return reject(
                    req,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Storage unavailable",
                );
            };

            let enrollments = match storage.get_user_course_enrollments(user.id, course_id).await {
                Ok(list) => list,
                Err(e) => {
                    error!("Failed to load enrollments of user {}: {}", user.id, e);
                    return reject(
                        req,
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Failed to check course permission",
                    );
                }
            };

            // 5. 角色判断
            match rule.matching(&enrollments) {
                Some(enrollment) => {
                    debug!(
                        "User {} passes course {} check as {}",
                        user.id, course_id, enrollment.role
                    );
                    req.extensions_mut().insert(enrollment.clone());
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                None => reject(
                    req,
                    StatusCode::FORBIDDEN,
                    ErrorCode::CoursePermissionDenied,
                    "No permission for this course",
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(role: EnrollmentRole, year: &str) -> CourseEnrollment {
        CourseEnrollment {
            id: 1,
            course_id: 3,
            user_id: 9,
            role,
            academic_year: year.to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_staff_rule_matches_assistant() {
        let rule = RequireCourseRole::new_any(EnrollmentRole::staff_roles());
        let list = vec![enrollment(EnrollmentRole::Assistant, "2025-2026")];
        assert!(rule.matching(&list).is_some());
    }

    #[test]
    fn test_staff_rule_rejects_student() {
        let rule = RequireCourseRole::new_any(EnrollmentRole::staff_roles());
        let list = vec![enrollment(EnrollmentRole::Student, "2025-2026")];
        assert!(rule.matching(&list).is_none());
        assert!(rule.matching(&[]).is_none());
    }

    #[test]
    fn test_matching_picks_allowed_year() {
        let rule = RequireCourseRole::new(&EnrollmentRole::Professor);
        let list = vec![
            enrollment(EnrollmentRole::Assistant, "2024-2025"),
            enrollment(EnrollmentRole::Professor, "2025-2026"),
        ];
        assert_eq!(rule.matching(&list).unwrap().academic_year, "2025-2026");
    }
}
