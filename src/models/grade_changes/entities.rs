use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成绩修改申请状态
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade_change.ts")]
pub enum GradeChangeStatus {
    Pending,
    Approved,
    Rejected,
}

impl GradeChangeStatus {
    pub const PENDING: &'static str = "pending";
    pub const APPROVED: &'static str = "approved";
    pub const REJECTED: &'static str = "rejected";

    pub fn is_pending(&self) -> bool {
        matches!(self, GradeChangeStatus::Pending)
    }
}

impl<'de> Deserialize<'de> for GradeChangeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<GradeChangeStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的申请状态: '{s}'. 支持的状态: pending, approved, rejected"
            ))
        })
    }
}

impl std::fmt::Display for GradeChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeChangeStatus::Pending => write!(f, "{}", GradeChangeStatus::PENDING),
            GradeChangeStatus::Approved => write!(f, "{}", GradeChangeStatus::APPROVED),
            GradeChangeStatus::Rejected => write!(f, "{}", GradeChangeStatus::REJECTED),
        }
    }
}

impl std::str::FromStr for GradeChangeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            GradeChangeStatus::PENDING => Ok(GradeChangeStatus::Pending),
            GradeChangeStatus::APPROVED => Ok(GradeChangeStatus::Approved),
            GradeChangeStatus::REJECTED => Ok(GradeChangeStatus::Rejected),
            _ => Err(format!("Invalid grade change status: {s}")),
        }
    }
}

// 审核决定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade_change.ts")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// 审核后申请进入的状态
    pub fn target_status(self) -> GradeChangeStatus {
        match self {
            ReviewDecision::Approve => GradeChangeStatus::Approved,
            ReviewDecision::Reject => GradeChangeStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade_change.ts")]
pub struct GradeChangeRequest {
    pub id: i64,
    pub grade_id: i64,
    pub requested_by: i64,
    // 提交申请时的原分数
    pub previous_score: f64,
    pub requested_score: f64,
    pub justification: String,
    pub attachment_token: Option<String>,
    pub status: GradeChangeStatus,
    pub reviewed_by: Option<i64>,
    pub review_comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 校验申请内容，返回首个不满足的规则
pub fn validate_submission(
    current_score: f64,
    requested_score: f64,
    max_points: f64,
    justification: &str,
) -> Result<(), SubmissionError> {
    if justification.trim().is_empty() {
        return Err(SubmissionError::EmptyJustification);
    }
    if !crate::models::assessments::entities::score_within_bounds(requested_score, max_points) {
        return Err(SubmissionError::ScoreOutOfBounds);
    }
    if (requested_score - current_score).abs() < f64::EPSILON {
        return Err(SubmissionError::ScoreUnchanged);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmissionError {
    EmptyJustification,
    ScoreOutOfBounds,
    ScoreUnchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_target_status() {
        assert_eq!(
            ReviewDecision::Approve.target_status(),
            GradeChangeStatus::Approved
        );
        assert_eq!(
            ReviewDecision::Reject.target_status(),
            GradeChangeStatus::Rejected
        );
    }

    #[test]
    fn test_only_pending_is_reviewable() {
        assert!(GradeChangeStatus::Pending.is_pending());
        assert!(!GradeChangeStatus::Approved.is_pending());
        assert!(!GradeChangeStatus::Rejected.is_pending());
    }

    #[test]
    fn test_validate_submission() {
        assert_eq!(validate_submission(8.0, 12.0, 20.0, "copy error"), Ok(()));
        assert_eq!(
            validate_submission(8.0, 12.0, 20.0, "   "),
            Err(SubmissionError::EmptyJustification)
        );
        assert_eq!(
            validate_submission(8.0, 21.0, 20.0, "bonus"),
            Err(SubmissionError::ScoreOutOfBounds)
        );
        assert_eq!(
            validate_submission(8.0, -1.0, 20.0, "typo"),
            Err(SubmissionError::ScoreOutOfBounds)
        );
        assert_eq!(
            validate_submission(8.0, 8.0, 20.0, "same"),
            Err(SubmissionError::ScoreUnchanged)
        );
    }

    #[test]
    fn test_status_roundtrip_strings() {
        assert_eq!(
            "approved".parse::<GradeChangeStatus>().unwrap(),
            GradeChangeStatus::Approved
        );
        assert_eq!(GradeChangeStatus::Pending.to_string(), "pending");
    }
}
