//! 公告存储操作

use super::SeaOrmStorage;
use crate::entity::announcement_reads::{
    ActiveModel as ReadActiveModel, Column as ReadColumn, Entity as AnnouncementReads,
};
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    announcements::{
        entities::Announcement,
        requests::{AnnouncementListQuery, CreateAnnouncementRequest},
        responses::{AnnouncementListResponse, AnnouncementView},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, sea_query::Query,
};
use std::collections::HashSet;

impl SeaOrmStorage {
    pub async fn create_announcement_impl(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            author_id: Set(author_id),
            title: Set(req.title),
            content: Set(req.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("发布公告失败: {e}")))?;

        Ok(result.into_announcement())
    }

    pub async fn get_announcement_by_id_impl(&self, id: i64) -> Result<Option<Announcement>> {
        let result = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询公告失败: {e}")))?;

        Ok(result.map(|m| m.into_announcement()))
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除公告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 当前页中用户已读的公告 ID
    async fn read_among(&self, user_id: i64, announcement_ids: Vec<i64>) -> Result<HashSet<i64>> {
        if announcement_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let rows = AnnouncementReads::find()
            .filter(ReadColumn::UserId.eq(user_id))
            .filter(ReadColumn::AnnouncementId.is_in(announcement_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询已读记录失败: {e}")))?;

        Ok(rows.into_iter().map(|r| r.announcement_id).collect())
    }

    /// 未读条件，已读回执由子查询在库内过滤
    fn unread_condition(user_id: i64) -> Condition {
        Condition::all().add(
            Column::Id.not_in_subquery(
                Query::select()
                    .column(ReadColumn::AnnouncementId)
                    .from(AnnouncementReads)
                    .and_where(ReadColumn::UserId.eq(user_id))
                    .to_owned(),
            ),
        )
    }

    /// 全院公告加上可见课程的公告
    fn visibility_condition(visible_courses: Option<Vec<i64>>) -> Condition {
        match visible_courses {
            Some(ids) => Condition::any()
                .add(Column::CourseId.is_null())
                .add(Column::CourseId.is_in(ids)),
            None => Condition::all(),
        }
    }

    pub async fn list_announcements_with_pagination_impl(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        let (page, size) = PaginationInfo::normalize(query.page, query.size, 10);
        let mut select =
            Announcements::find().filter(Self::visibility_condition(query.visible_courses));

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if query.unread_only {
            select = select.filter(Self::unread_condition(query.viewer_id));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询公告总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询公告页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询公告列表失败: {e}")))?;

        let authors = self
            .users_by_ids(rows.iter().map(|a| a.author_id).collect())
            .await?;
        let read_ids = self
            .read_among(query.viewer_id, rows.iter().map(|a| a.id).collect())
            .await?;

        let items = rows
            .into_iter()
            .map(|a| {
                let author_name = authors
                    .get(&a.author_id)
                    .map(|u| u.display_name.clone().unwrap_or_else(|| u.username.clone()))
                    .unwrap_or_default();
                let is_read = read_ids.contains(&a.id);
                AnnouncementView {
                    announcement: a.into_announcement(),
                    author_name,
                    is_read,
                }
            })
            .collect();

        Ok(AnnouncementListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 写入已读回执，之前已读返回 false
    pub async fn mark_announcement_read_impl(&self, announcement_id: i64, user_id: i64) -> Result<bool> {
        let model = ReadActiveModel {
            announcement_id: Set(announcement_id),
            user_id: Set(user_id),
            read_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) => match PortalError::db_write("标记已读失败", e) {
                PortalError::Conflict(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    pub async fn count_unread_announcements_impl(
        &self,
        user_id: i64,
        visible_courses: Option<Vec<i64>>,
    ) -> Result<u64> {
        Announcements::find()
            .filter(Self::visibility_condition(visible_courses))
            .filter(Self::unread_condition(user_id))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计未读公告失败: {e}")))
    }
}
