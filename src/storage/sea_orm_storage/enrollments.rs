//! 课程成员存储操作

use super::SeaOrmStorage;
use crate::entity::course_enrollments::{ActiveModel, Column, Entity as CourseEnrollments};
use crate::entity::users::Entity as Users;
use crate::errors::{PortalError, Result};
use crate::models::courses::{
    entities::{CourseEnrollment, EnrollmentRole, EnrollmentWithUser},
    requests::{AddEnrollmentRequest, EnrollmentQuery},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 添加课程成员
    ///
    /// 同一课程同一学年最多一位主讲教授，重复的成员关系同样视为冲突。
    pub async fn add_enrollment_impl(
        &self,
        course_id: i64,
        req: AddEnrollmentRequest,
    ) -> Result<CourseEnrollment> {
        let existing = CourseEnrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(req.user_id))
            .filter(Column::AcademicYear.eq(req.academic_year.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程成员失败: {e}")))?;
        if existing.is_some() {
            return Err(PortalError::conflict("用户已在该学年加入此课程"));
        }

        if req.role == EnrollmentRole::Professor
            && self
                .find_course_professor_impl(course_id, &req.academic_year)
                .await?
                .is_some()
        {
            return Err(PortalError::conflict("该课程本学年已有主讲教授"));
        }

        let model = ActiveModel {
            course_id: Set(course_id),
            user_id: Set(req.user_id),
            role: Set(req.role.to_string()),
            academic_year: Set(req.academic_year),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::db_write("添加课程成员失败", e))?;

        Ok(result.into_enrollment())
    }

    pub async fn remove_enrollment_impl(&self, course_id: i64, enrollment_id: i64) -> Result<bool> {
        let result = CourseEnrollments::delete_many()
            .filter(Column::Id.eq(enrollment_id))
            .filter(Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("移除课程成员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出课程成员，附带用户信息
    pub async fn list_course_enrollments_impl(
        &self,
        course_id: i64,
        query: EnrollmentQuery,
    ) -> Result<Vec<EnrollmentWithUser>> {
        let mut select = CourseEnrollments::find().filter(Column::CourseId.eq(course_id));

        if let Some(year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(year));
        }
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let rows = select
            .order_by_asc(Column::Role)
            .order_by_asc(Column::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程成员失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, user)| {
                user.map(|u| EnrollmentWithUser {
                    enrollment: enrollment.into_enrollment(),
                    username: u.username,
                    display_name: u.display_name,
                    email: u.email,
                })
            })
            .collect())
    }

    pub async fn get_user_course_enrollments_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Vec<CourseEnrollment>> {
        let rows = CourseEnrollments::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程成员失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_enrollment()).collect())
    }

    pub async fn find_course_professor_impl(
        &self,
        course_id: i64,
        academic_year: &str,
    ) -> Result<Option<CourseEnrollment>> {
        let result = CourseEnrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::AcademicYear.eq(academic_year))
            .filter(Column::Role.eq(EnrollmentRole::PROFESSOR))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询主讲教授失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 用户以学生身份选修的课程 ID
    pub(crate) async fn student_course_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let rows = CourseEnrollments::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Role.eq(EnrollmentRole::STUDENT))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课记录失败: {e}")))?;

        let mut ids: Vec<i64> = rows.into_iter().map(|m| m.course_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}
