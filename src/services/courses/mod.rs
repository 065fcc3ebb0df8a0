pub mod assessments;
pub mod create;
pub mod delete;
pub mod enrollments;
pub mod get;
pub mod list;
pub mod pv;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assessments::requests::{CreateAssessmentRequest, UpdateAssessmentRequest};
use crate::models::courses::requests::{
    AddEnrollmentRequest, CourseQueryParams, CreateCourseRequest, EnrollmentQuery,
    MyCoursesQuery, UpdateCourseRequest,
};
use crate::models::pv::requests::PvQuery;
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 课程列表
    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        query: CourseQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, request, query).await
    }

    // 我的课程
    pub async fn list_my_courses(
        &self,
        request: &HttpRequest,
        query: MyCoursesQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_my_courses(self, request, query).await
    }

    // 创建课程
    pub async fn create_course(
        &self,
        request: &HttpRequest,
        course_data: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, request, course_data).await
    }

    // 课程详情
    pub async fn get_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        get::get_course(self, request, course_id).await
    }

    // 更新课程
    pub async fn update_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        update_data: UpdateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, request, course_id, update_data).await
    }

    // 删除课程
    pub async fn delete_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, request, course_id).await
    }

    // 课程成员列表
    pub async fn list_enrollments(
        &self,
        request: &HttpRequest,
        course_id: i64,
        query: EnrollmentQuery,
    ) -> ActixResult<HttpResponse> {
        enrollments::list_enrollments(self, request, course_id, query).await
    }

    // 添加课程成员
    pub async fn add_enrollment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        enrollment: AddEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::add_enrollment(self, request, course_id, enrollment).await
    }

    // 移除课程成员
    pub async fn remove_enrollment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        enrollments::remove_enrollment(self, request, course_id, enrollment_id).await
    }

    // 考核列表
    pub async fn list_assessments(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        assessments::list_assessments(self, request, course_id).await
    }

    // 创建考核
    pub async fn create_assessment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        assessment: CreateAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        assessments::create_assessment(self, request, course_id, assessment).await
    }

    // 更新考核
    pub async fn update_assessment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        assessment_id: i64,
        update: UpdateAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        assessments::update_assessment(self, request, course_id, assessment_id, update).await
    }

    // 删除考核
    pub async fn delete_assessment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        assessments::delete_assessment(self, request, course_id, assessment_id).await
    }

    // 成绩评议表
    pub async fn get_pv(
        &self,
        request: &HttpRequest,
        course_id: i64,
        query: PvQuery,
    ) -> ActixResult<HttpResponse> {
        pv::get_pv(self, request, course_id, query).await
    }
}
