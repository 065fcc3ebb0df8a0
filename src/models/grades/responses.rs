use super::entities::Grade;
use crate::models::assessments::entities::AssessmentKind;
use serde::Serialize;
use ts_rs::TS;

// 带学生信息的成绩
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub grade: Grade,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct AssessmentGradesResponse {
    pub assessment_id: i64,
    pub max_points: f64,
    pub items: Vec<GradeWithStudent>,
}

// 学生视角的成绩，附带考核信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct MyGrade {
    pub grade: Grade,
    pub course_id: i64,
    pub assessment_title: String,
    pub kind: AssessmentKind,
    pub max_points: f64,
    pub weight: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct MyGradesResponse {
    pub items: Vec<MyGrade>,
}
