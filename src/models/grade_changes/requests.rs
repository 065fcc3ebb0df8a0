use super::entities::{GradeChangeStatus, ReviewDecision};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 提交成绩修改申请
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade_change.ts")]
pub struct SubmitGradeChangeRequest {
    pub grade_id: i64,
    pub requested_score: f64,
    pub justification: String,
    pub attachment_token: Option<String>,
}

// 审核成绩修改申请
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade_change.ts")]
pub struct ReviewGradeChangeRequest {
    pub decision: ReviewDecision,
    pub comment: Option<String>,
}

// 申请列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade_change.ts")]
pub struct GradeChangeQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<GradeChangeStatus>,
}

// 申请列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct GradeChangeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<GradeChangeStatus>,
    // 为 None 时返回所有人的申请
    pub requested_by: Option<i64>,
}
