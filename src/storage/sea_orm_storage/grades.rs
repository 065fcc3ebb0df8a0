//! 成绩存储操作

use super::SeaOrmStorage;
use crate::entity::assessments::{Column as AssessmentColumn, Entity as Assessments};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::users::Entity as Users;
use crate::errors::{PortalError, Result};
use crate::models::{
    assessments::entities::AssessmentKind,
    grades::{
        entities::Grade,
        requests::RecordGradeRequest,
        responses::{GradeWithStudent, MyGrade},
    },
};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict,
};

impl SeaOrmStorage {
    /// 录入成绩，(考核, 学生) 已有记录时覆盖分数与评语
    pub async fn upsert_grade_impl(&self, req: RecordGradeRequest, graded_by: i64) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();
        let (assessment_id, student_id) = (req.assessment_id, req.student_id);

        let model = ActiveModel {
            assessment_id: Set(assessment_id),
            student_id: Set(student_id),
            score: Set(req.score),
            comment: Set(req.comment),
            graded_by: Set(graded_by),
            graded_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Grades::insert(model)
            .on_conflict(
                OnConflict::columns([Column::AssessmentId, Column::StudentId])
                    .update_columns([
                        Column::Score,
                        Column::Comment,
                        Column::GradedBy,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| PortalError::db_write("录入成绩失败", e))?;

        self.find_student_grade_impl(assessment_id, student_id)
            .await?
            .ok_or_else(|| PortalError::not_found("成绩写入后未找到"))
    }

    pub async fn find_student_grade_impl(
        &self,
        assessment_id: i64,
        student_id: i64,
    ) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::AssessmentId.eq(assessment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    pub async fn get_grade_by_id_impl(&self, grade_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    pub async fn list_assessment_grades_impl(
        &self,
        assessment_id: i64,
    ) -> Result<Vec<GradeWithStudent>> {
        let rows = Grades::find()
            .filter(Column::AssessmentId.eq(assessment_id))
            .order_by_asc(Column::StudentId)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(grade, user)| {
                let (username, display_name) = user
                    .map(|u| (u.username, u.display_name))
                    .unwrap_or_default();
                GradeWithStudent {
                    grade: grade.into_grade(),
                    username,
                    display_name,
                }
            })
            .collect())
    }

    /// 学生本人的成绩，可按课程筛选
    pub async fn list_student_grades_impl(
        &self,
        student_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<MyGrade>> {
        let mut select = Grades::find().filter(Column::StudentId.eq(student_id));
        if let Some(course_id) = course_id {
            select = select.filter(AssessmentColumn::CourseId.eq(course_id));
        }

        let rows = select
            .find_also_related(Assessments)
            .order_by_asc(AssessmentColumn::CourseId)
            .order_by_asc(Column::AssessmentId)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(grade, assessment)| {
                assessment.map(|a| MyGrade {
                    grade: grade.into_grade(),
                    course_id: a.course_id,
                    assessment_title: a.title,
                    kind: a
                        .kind
                        .parse::<AssessmentKind>()
                        .unwrap_or(AssessmentKind::Exam),
                    max_points: a.max_points,
                    weight: a.weight,
                })
            })
            .collect())
    }

    pub async fn list_course_grades_impl(&self, course_id: i64) -> Result<Vec<Grade>> {
        let assessment_ids: Vec<i64> = Assessments::find()
            .filter(AssessmentColumn::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询考核失败: {e}")))?
            .into_iter()
            .map(|a| a.id)
            .collect();

        if assessment_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = Grades::find()
            .filter(Column::AssessmentId.is_in(assessment_ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程成绩失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_grade()).collect())
    }
}
