pub mod create;
pub mod delete;
pub mod list;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::announcements::requests::{AnnouncementQueryParams, CreateAnnouncementRequest};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AnnouncementService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnnouncementService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 发布公告
    pub async fn create_announcement(
        &self,
        request: &HttpRequest,
        body: CreateAnnouncementRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_announcement(self, request, body).await
    }

    // 可见公告列表
    pub async fn list_announcements(
        &self,
        request: &HttpRequest,
        query: AnnouncementQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_announcements(self, request, query).await
    }

    // 未读数量
    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::unread_count(self, request).await
    }

    // 删除公告
    pub async fn delete_announcement(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_announcement(self, request, announcement_id).await
    }

    // 标记已读
    pub async fn mark_read(
        &self,
        request: &HttpRequest,
        announcement_id: i64,
    ) -> ActixResult<HttpResponse> {
        read::mark_read(self, request, announcement_id).await
    }
}

/// 用户可见的课程公告范围，`None` 表示不限
pub(crate) async fn visible_courses(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> crate::errors::Result<Option<Vec<i64>>> {
    if user.role.is_privileged() {
        return Ok(None);
    }
    let mut ids: Vec<i64> = storage
        .list_user_courses(user.id, None)
        .await?
        .into_iter()
        .map(|c| c.course.id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(Some(ids))
}

/// 公告是否在可见范围内
pub(crate) fn is_visible(course_id: Option<i64>, visible: &Option<Vec<i64>>) -> bool {
    match (course_id, visible) {
        (None, _) | (_, None) => true,
        (Some(id), Some(ids)) => ids.contains(&id),
    }
}

pub(crate) fn announcement_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AnnouncementNotFound,
        "Announcement not found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faculty_wide_is_always_visible() {
        assert!(is_visible(None, &Some(vec![])));
        assert!(is_visible(None, &None));
    }

    #[test]
    fn course_announcements_need_membership() {
        let visible = Some(vec![3, 8]);
        assert!(is_visible(Some(8), &visible));
        assert!(!is_visible(Some(5), &visible));
        assert!(is_visible(Some(5), &None));
    }
}
