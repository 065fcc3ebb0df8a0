pub mod list;
pub mod record;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::{MyGradesQuery, RecordGradeRequest};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 录入成绩
    pub async fn record_grade(
        &self,
        request: &HttpRequest,
        grade: RecordGradeRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_grade(self, request, grade).await
    }

    // 某次考核的全部成绩
    pub async fn list_assessment_grades(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_assessment_grades(self, request, assessment_id).await
    }

    // 学生本人的成绩
    pub async fn list_my_grades(
        &self,
        request: &HttpRequest,
        query: MyGradesQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_my_grades(self, request, query).await
    }
}
