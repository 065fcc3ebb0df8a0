use serde::Deserialize;
use ts_rs::TS;

// 录入 / 覆盖成绩
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct RecordGradeRequest {
    pub assessment_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct MyGradesQuery {
    pub course_id: Option<i64>,
}
