use super::entities::GradeChangeRequest;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade_change.ts")]
pub struct GradeChangeListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<GradeChangeRequest>,
}
