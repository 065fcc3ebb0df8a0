//! 成绩修改申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_change_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub grade_id: i64,
    pub requested_by: i64,
    pub previous_score: f64,
    pub requested_score: f64,
    #[sea_orm(column_type = "Text")]
    pub justification: String,
    pub attachment_token: Option<String>,
    pub status: String,
    pub reviewed_by: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_comment: Option<String>,
    pub created_at: i64,
    pub reviewed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grades::Entity",
        from = "Column::GradeId",
        to = "super::grades::Column::Id"
    )]
    Grade,
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade_change(self) -> crate::models::grade_changes::entities::GradeChangeRequest {
        use crate::models::grade_changes::entities::{GradeChangeRequest, GradeChangeStatus};

        GradeChangeRequest {
            id: self.id,
            grade_id: self.grade_id,
            requested_by: self.requested_by,
            previous_score: self.previous_score,
            requested_score: self.requested_score,
            justification: self.justification,
            attachment_token: self.attachment_token,
            status: self
                .status
                .parse::<GradeChangeStatus>()
                .unwrap_or(GradeChangeStatus::Pending),
            reviewed_by: self.reviewed_by,
            review_comment: self.review_comment,
            created_at: super::ts(self.created_at),
            reviewed_at: self.reviewed_at.map(super::ts),
        }
    }
}
