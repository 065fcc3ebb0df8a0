use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考核类型
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub enum AssessmentKind {
    Exam,
    Quiz,
    Assignment,
}

impl AssessmentKind {
    pub const EXAM: &'static str = "exam";
    pub const QUIZ: &'static str = "quiz";
    pub const ASSIGNMENT: &'static str = "assignment";
}

impl<'de> Deserialize<'de> for AssessmentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AssessmentKind>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的考核类型: '{s}'. 支持的类型: exam, quiz, assignment"
            ))
        })
    }
}

impl std::fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssessmentKind::Exam => write!(f, "{}", AssessmentKind::EXAM),
            AssessmentKind::Quiz => write!(f, "{}", AssessmentKind::QUIZ),
            AssessmentKind::Assignment => write!(f, "{}", AssessmentKind::ASSIGNMENT),
        }
    }
}

impl std::str::FromStr for AssessmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AssessmentKind::EXAM => Ok(AssessmentKind::Exam),
            AssessmentKind::QUIZ => Ok(AssessmentKind::Quiz),
            AssessmentKind::ASSIGNMENT => Ok(AssessmentKind::Assignment),
            _ => Err(format!("Invalid assessment kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct Assessment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub kind: AssessmentKind,
    // 满分
    pub max_points: f64,
    // 在期末总评中的权重
    pub weight: f64,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// 分数是否落在 [0, max_points] 内
    pub fn accepts_score(&self, score: f64) -> bool {
        score_within_bounds(score, self.max_points)
    }
}

pub fn score_within_bounds(score: f64, max_points: f64) -> bool {
    score.is_finite() && score >= 0.0 && score <= max_points
}

/// 满分与权重都必须为正数
pub fn validate_scoring(max_points: f64, weight: f64) -> Result<(), String> {
    if !max_points.is_finite() || max_points <= 0.0 {
        return Err("max_points must be greater than 0".to_string());
    }
    if !weight.is_finite() || weight <= 0.0 {
        return Err("weight must be greater than 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(score_within_bounds(0.0, 20.0));
        assert!(score_within_bounds(20.0, 20.0));
        assert!(score_within_bounds(12.5, 20.0));
        assert!(!score_within_bounds(20.01, 20.0));
        assert!(!score_within_bounds(-0.5, 20.0));
        assert!(!score_within_bounds(f64::NAN, 20.0));
    }

    #[test]
    fn test_validate_scoring() {
        assert!(validate_scoring(20.0, 1.0).is_ok());
        assert!(validate_scoring(0.0, 1.0).is_err());
        assert!(validate_scoring(20.0, 0.0).is_err());
        assert!(validate_scoring(20.0, -2.0).is_err());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("exam".parse::<AssessmentKind>().unwrap(), AssessmentKind::Exam);
        assert_eq!(AssessmentKind::Assignment.to_string(), "assignment");
        assert!("homework".parse::<AssessmentKind>().is_err());
    }
}
