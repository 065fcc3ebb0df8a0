//! 成绩修改申请存储操作

use super::SeaOrmStorage;
use crate::entity::grade_change_requests::{ActiveModel, Column, Entity as GradeChangeRequests};
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    grade_changes::{
        entities::{GradeChangeRequest, GradeChangeStatus, ReviewDecision},
        requests::{GradeChangeListQuery, SubmitGradeChangeRequest},
        responses::GradeChangeListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_grade_change_impl(
        &self,
        req: SubmitGradeChangeRequest,
        requested_by: i64,
        previous_score: f64,
    ) -> Result<GradeChangeRequest> {
        let model = ActiveModel {
            grade_id: Set(req.grade_id),
            requested_by: Set(requested_by),
            previous_score: Set(previous_score),
            requested_score: Set(req.requested_score),
            justification: Set(req.justification),
            attachment_token: Set(req.attachment_token),
            status: Set(GradeChangeStatus::Pending.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::db_write("提交成绩修改申请失败", e))?;

        Ok(result.into_grade_change())
    }

    pub async fn get_grade_change_by_id_impl(&self, id: i64) -> Result<Option<GradeChangeRequest>> {
        let result = GradeChangeRequests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩修改申请失败: {e}")))?;

        Ok(result.map(|m| m.into_grade_change()))
    }

    pub async fn find_pending_grade_change_impl(
        &self,
        grade_id: i64,
    ) -> Result<Option<GradeChangeRequest>> {
        let result = GradeChangeRequests::find()
            .filter(Column::GradeId.eq(grade_id))
            .filter(Column::Status.eq(GradeChangeStatus::PENDING))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩修改申请失败: {e}")))?;

        Ok(result.map(|m| m.into_grade_change()))
    }

    pub async fn list_grade_changes_with_pagination_impl(
        &self,
        query: GradeChangeListQuery,
    ) -> Result<GradeChangeListResponse> {
        let (page, size) = PaginationInfo::normalize(query.page, query.size, 20);

        let mut select = GradeChangeRequests::find();
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(requested_by) = query.requested_by {
            select = select.filter(Column::RequestedBy.eq(requested_by));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询申请总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询申请页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询申请列表失败: {e}")))?;

        Ok(GradeChangeListResponse {
            items: rows.into_iter().map(|m| m.into_grade_change()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 审核申请
    ///
    /// 状态更新带 `status = pending` 条件，并发审核时只有一次生效；
    /// 通过时成绩在同一事务内改为申请分数，成绩已偏离原分数时整体回滚。
    pub async fn review_grade_change_impl(
        &self,
        id: i64,
        reviewer_id: i64,
        decision: ReviewDecision,
        comment: Option<String>,
    ) -> Result<GradeChangeRequest> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let request = GradeChangeRequests::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩修改申请失败: {e}")))?
            .ok_or_else(|| PortalError::not_found(format!("成绩修改申请 {id} 不存在")))?;

        let updated = GradeChangeRequests::update_many()
            .col_expr(
                Column::Status,
                Expr::value(decision.target_status().to_string()),
            )
            .col_expr(Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(Column::ReviewComment, Expr::value(comment))
            .col_expr(Column::ReviewedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(GradeChangeStatus::PENDING))
            .exec(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新申请状态失败: {e}")))?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| PortalError::database_operation(format!("回滚事务失败: {e}")))?;
            return Err(PortalError::conflict("申请已审核"));
        }

        if decision == ReviewDecision::Approve {
            // 成绩须仍为申请时的原分数，否则申请已过时
            let applied = Grades::update_many()
                .col_expr(GradeColumn::Score, Expr::value(request.requested_score))
                .col_expr(GradeColumn::UpdatedAt, Expr::value(now))
                .filter(GradeColumn::Id.eq(request.grade_id))
                .filter(GradeColumn::Score.eq(request.previous_score))
                .exec(&txn)
                .await
                .map_err(|e| PortalError::database_operation(format!("更新成绩失败: {e}")))?;

            if applied.rows_affected == 0 {
                txn.rollback()
                    .await
                    .map_err(|e| PortalError::database_operation(format!("回滚事务失败: {e}")))?;
                return Err(PortalError::conflict("成绩已在申请后被修改"));
            }
        }

        let reviewed = GradeChangeRequests::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩修改申请失败: {e}")))?
            .ok_or_else(|| PortalError::not_found(format!("成绩修改申请 {id} 不存在")))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(reviewed.into_grade_change())
    }
}
