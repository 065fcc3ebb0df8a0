use super::entities::AssessmentKind;
use serde::Deserialize;
use ts_rs::TS;

// 创建考核请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct CreateAssessmentRequest {
    pub title: String,
    pub kind: AssessmentKind,
    pub max_points: f64,
    pub weight: Option<f64>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 更新考核请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct UpdateAssessmentRequest {
    pub title: Option<String>,
    pub kind: Option<AssessmentKind>,
    pub max_points: Option<f64>,
    pub weight: Option<f64>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
}
