//! 考勤存储操作

use super::SeaOrmStorage;
use crate::entity::attendance_records::{
    ActiveModel as RecordActiveModel, Column as RecordColumn, Entity as AttendanceRecords,
};
use crate::entity::attendance_sessions::{
    ActiveModel as SessionActiveModel, Column as SessionColumn, Entity as AttendanceSessions,
};
use crate::entity::courses::Entity as Courses;
use crate::entity::users::Entity as Users;
use crate::errors::{PortalError, Result};
use crate::models::attendance::{
    entities::{AttendanceRecord, AttendanceSession, AttendanceStatus, attendance_rate},
    responses::{CourseAttendanceSummary, RecordWithStudent},
};
use crate::storage::{AttendanceMark, NewAttendanceSession};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict,
};

impl SeaOrmStorage {
    /// 创建签到会话，同课程同日期已有会话时轮换令牌与位置
    ///
    /// 写入走 `ON CONFLICT (course_id, session_date) DO UPDATE`，并发生成不会撞唯一索引。
    pub async fn upsert_attendance_session_impl(
        &self,
        session: NewAttendanceSession,
    ) -> Result<(AttendanceSession, bool)> {
        let existed = self
            .find_session_for_date(session.course_id, &session.session_date)
            .await?
            .is_some();

        let model = SessionActiveModel {
            course_id: Set(session.course_id),
            session_date: Set(session.session_date.clone()),
            token: Set(session.token),
            latitude: Set(session.latitude),
            longitude: Set(session.longitude),
            created_by: Set(session.created_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            expires_at: Set(session.expires_at),
            ..Default::default()
        };

        AttendanceSessions::insert(model)
            .on_conflict(
                OnConflict::columns([SessionColumn::CourseId, SessionColumn::SessionDate])
                    .update_columns([
                        SessionColumn::Token,
                        SessionColumn::Latitude,
                        SessionColumn::Longitude,
                        SessionColumn::CreatedBy,
                        SessionColumn::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| PortalError::db_write("写入签到会话失败", e))?;

        let stored = self
            .find_session_for_date(session.course_id, &session.session_date)
            .await?
            .ok_or_else(|| PortalError::not_found("签到会话写入后未找到"))?;

        Ok((stored, existed))
    }

    async fn find_session_for_date(
        &self,
        course_id: i64,
        session_date: &str,
    ) -> Result<Option<AttendanceSession>> {
        let result = AttendanceSessions::find()
            .filter(SessionColumn::CourseId.eq(course_id))
            .filter(SessionColumn::SessionDate.eq(session_date))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询签到会话失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn get_attendance_session_by_token_impl(
        &self,
        token: &str,
    ) -> Result<Option<AttendanceSession>> {
        let result = AttendanceSessions::find()
            .filter(SessionColumn::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询签到会话失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn get_attendance_session_by_id_impl(
        &self,
        session_id: i64,
    ) -> Result<Option<AttendanceSession>> {
        let result = AttendanceSessions::find_by_id(session_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询签到会话失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    /// 课程的签到会话，最新的在前
    pub async fn list_course_sessions_impl(&self, course_id: i64) -> Result<Vec<AttendanceSession>> {
        let rows = AttendanceSessions::find()
            .filter(SessionColumn::CourseId.eq(course_id))
            .order_by_desc(SessionColumn::SessionDate)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询签到会话失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_session()).collect())
    }

    /// 写入出勤记录，(会话, 学生) 唯一
    ///
    /// 同一学生并发扫码时由 `ON CONFLICT DO UPDATE` 合并为一条记录。
    pub async fn upsert_attendance_record_impl(
        &self,
        mark: AttendanceMark,
    ) -> Result<(AttendanceRecord, Option<AttendanceRecord>)> {
        let previous = self
            .find_student_record(mark.session_id, mark.student_id)
            .await?;

        let model = RecordActiveModel {
            session_id: Set(mark.session_id),
            course_id: Set(mark.course_id),
            student_id: Set(mark.student_id),
            status: Set(mark.status.to_string()),
            latitude: Set(mark.latitude),
            longitude: Set(mark.longitude),
            distance_m: Set(mark.distance_m),
            checked_in_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        AttendanceRecords::insert(model)
            .on_conflict(
                OnConflict::columns([RecordColumn::SessionId, RecordColumn::StudentId])
                    .update_columns([
                        RecordColumn::Status,
                        RecordColumn::Latitude,
                        RecordColumn::Longitude,
                        RecordColumn::DistanceM,
                        RecordColumn::CheckedInAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| PortalError::db_write("写入出勤记录失败", e))?;

        let stored = self
            .find_student_record(mark.session_id, mark.student_id)
            .await?
            .ok_or_else(|| PortalError::not_found("出勤记录写入后未找到"))?;

        Ok((stored, previous))
    }

    async fn find_student_record(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        let result = AttendanceRecords::find()
            .filter(RecordColumn::SessionId.eq(session_id))
            .filter(RecordColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询出勤记录失败: {e}")))?;

        Ok(result.map(|m| m.into_record()))
    }

    pub async fn list_session_records_impl(&self, session_id: i64) -> Result<Vec<RecordWithStudent>> {
        let rows = AttendanceRecords::find()
            .filter(RecordColumn::SessionId.eq(session_id))
            .order_by_asc(RecordColumn::CheckedInAt)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询出勤记录失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(record, user)| {
                let (username, display_name) = user
                    .map(|u| (u.username, u.display_name))
                    .unwrap_or_default();
                RecordWithStudent {
                    record: record.into_record(),
                    username,
                    display_name,
                }
            })
            .collect())
    }

    /// 截至 until_date 已开课的会话 ID
    async fn held_session_ids(&self, course_id: i64, until_date: &str) -> Result<Vec<i64>> {
        let rows = AttendanceSessions::find()
            .filter(SessionColumn::CourseId.eq(course_id))
            .filter(SessionColumn::SessionDate.lte(until_date))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询签到会话失败: {e}")))?;

        Ok(rows.into_iter().map(|s| s.id).collect())
    }

    pub async fn student_attendance_counts_impl(
        &self,
        course_id: i64,
        student_id: i64,
        until_date: &str,
    ) -> Result<(u64, u64)> {
        let session_ids = self.held_session_ids(course_id, until_date).await?;
        let total = session_ids.len() as u64;
        if total == 0 {
            return Ok((0, 0));
        }

        let attended = AttendanceRecords::find()
            .filter(RecordColumn::SessionId.is_in(session_ids))
            .filter(RecordColumn::StudentId.eq(student_id))
            .filter(RecordColumn::Status.is_in([
                AttendanceStatus::PRESENT,
                AttendanceStatus::EXCUSED,
            ]))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计出勤失败: {e}")))?;

        Ok((attended, total))
    }

    /// 学生每门选修课程的出勤汇总
    pub async fn student_attendance_summaries_impl(
        &self,
        student_id: i64,
        until_date: &str,
    ) -> Result<Vec<CourseAttendanceSummary>> {
        let course_ids = self.student_course_ids(student_id).await?;
        if course_ids.is_empty() {
            return Ok(vec![]);
        }

        let courses = Courses::find()
            .filter(crate::entity::courses::Column::Id.is_in(course_ids))
            .order_by_asc(crate::entity::courses::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程失败: {e}")))?;

        let mut items = Vec::with_capacity(courses.len());
        for course in courses {
            let (attended, total) = self
                .student_attendance_counts_impl(course.id, student_id, until_date)
                .await?;
            items.push(CourseAttendanceSummary {
                course_id: course.id,
                course_code: course.code,
                course_name: course.name,
                attended_sessions: attended,
                total_sessions: total,
                attendance_rate: attendance_rate(attended, total),
            });
        }

        Ok(items)
    }
}
