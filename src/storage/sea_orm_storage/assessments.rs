//! 考核存储操作

use super::SeaOrmStorage;
use crate::entity::assessments::{ActiveModel, Column, Entity as Assessments};
use crate::errors::{PortalError, Result};
use crate::models::assessments::{
    entities::Assessment,
    requests::{CreateAssessmentRequest, UpdateAssessmentRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_assessment_impl(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            title: Set(req.title),
            kind: Set(req.kind.to_string()),
            max_points: Set(req.max_points),
            weight: Set(req.weight.unwrap_or(1.0)),
            due_at: Set(req.due_at.map(|d| d.timestamp())),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建考核失败: {e}")))?;

        Ok(result.into_assessment())
    }

    pub async fn get_assessment_by_id_impl(&self, assessment_id: i64) -> Result<Option<Assessment>> {
        let result = Assessments::find_by_id(assessment_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询考核失败: {e}")))?;

        Ok(result.map(|m| m.into_assessment()))
    }

    pub async fn list_course_assessments_impl(&self, course_id: i64) -> Result<Vec<Assessment>> {
        let rows = Assessments::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询考核列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_assessment()).collect())
    }

    pub async fn update_assessment_impl(
        &self,
        assessment_id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Option<Assessment>> {
        if self.get_assessment_by_id_impl(assessment_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(assessment_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(kind) = update.kind {
            model.kind = Set(kind.to_string());
        }
        if let Some(max_points) = update.max_points {
            model.max_points = Set(max_points);
        }
        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }
        if let Some(due_at) = update.due_at {
            model.due_at = Set(Some(due_at.timestamp()));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新考核失败: {e}")))?;

        Ok(Some(result.into_assessment()))
    }

    pub async fn delete_assessment_impl(&self, assessment_id: i64) -> Result<bool> {
        let result = Assessments::delete_by_id(assessment_id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除考核失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
