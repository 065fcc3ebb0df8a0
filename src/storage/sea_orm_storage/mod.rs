//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod ads;
mod announcements;
mod assessments;
mod attendance;
mod courses;
mod enrollments;
mod files;
mod grade_changes;
mod grades;
mod schedules;
mod users;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 基于已有连接创建存储并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PortalError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    ads::{
        entities::Advertisement,
        requests::{CreateAdRequest, UpdateAdRequest},
    },
    announcements::{
        entities::Announcement,
        requests::{AnnouncementListQuery, CreateAnnouncementRequest},
        responses::AnnouncementListResponse,
    },
    assessments::{
        entities::Assessment,
        requests::{CreateAssessmentRequest, UpdateAssessmentRequest},
    },
    attendance::{
        entities::{AttendanceRecord, AttendanceSession},
        responses::{CourseAttendanceSummary, RecordWithStudent},
    },
    courses::{
        entities::{Course, CourseEnrollment, EnrollmentWithUser},
        requests::{
            AddEnrollmentRequest, CourseListQuery, CreateCourseRequest, EnrollmentQuery,
            UpdateCourseRequest,
        },
        responses::{CourseListResponse, MyCourse},
    },
    files::entities::File,
    grade_changes::{
        entities::{GradeChangeRequest, ReviewDecision},
        requests::{GradeChangeListQuery, SubmitGradeChangeRequest},
        responses::GradeChangeListResponse,
    },
    grades::{
        entities::Grade,
        requests::RecordGradeRequest,
        responses::{GradeWithStudent, MyGrade},
    },
    schedules::{
        entities::ScheduleSlot,
        requests::{CreateScheduleRequest, UpdateScheduleRequest},
        responses::ScheduleEntry,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::{AttendanceMark, NewAttendanceSession, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 文件模块
    async fn upload_file(
        &self,
        download_token: &str,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File> {
        self.upload_file_impl(
            download_token,
            original_name,
            stored_name,
            file_size,
            file_type,
            user_id,
        )
        .await
    }

    async fn get_file_by_token(&self, download_token: &str) -> Result<Option<File>> {
        self.get_file_by_token_impl(download_token).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    async fn list_user_courses(
        &self,
        user_id: i64,
        academic_year: Option<String>,
    ) -> Result<Vec<MyCourse>> {
        self.list_user_courses_impl(user_id, academic_year).await
    }

    // 课程成员模块
    async fn add_enrollment(
        &self,
        course_id: i64,
        req: AddEnrollmentRequest,
    ) -> Result<CourseEnrollment> {
        self.add_enrollment_impl(course_id, req).await
    }

    async fn remove_enrollment(&self, course_id: i64, enrollment_id: i64) -> Result<bool> {
        self.remove_enrollment_impl(course_id, enrollment_id).await
    }

    async fn list_course_enrollments(
        &self,
        course_id: i64,
        query: EnrollmentQuery,
    ) -> Result<Vec<EnrollmentWithUser>> {
        self.list_course_enrollments_impl(course_id, query).await
    }

    async fn get_user_course_enrollments(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Vec<CourseEnrollment>> {
        self.get_user_course_enrollments_impl(user_id, course_id)
            .await
    }

    async fn find_course_professor(
        &self,
        course_id: i64,
        academic_year: &str,
    ) -> Result<Option<CourseEnrollment>> {
        self.find_course_professor_impl(course_id, academic_year)
            .await
    }

    // 考核模块
    async fn create_assessment(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment> {
        self.create_assessment_impl(course_id, created_by, req).await
    }

    async fn get_assessment_by_id(&self, assessment_id: i64) -> Result<Option<Assessment>> {
        self.get_assessment_by_id_impl(assessment_id).await
    }

    async fn list_course_assessments(&self, course_id: i64) -> Result<Vec<Assessment>> {
        self.list_course_assessments_impl(course_id).await
    }

    async fn update_assessment(
        &self,
        assessment_id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Option<Assessment>> {
        self.update_assessment_impl(assessment_id, update).await
    }

    async fn delete_assessment(&self, assessment_id: i64) -> Result<bool> {
        self.delete_assessment_impl(assessment_id).await
    }

    // 成绩模块
    async fn upsert_grade(&self, req: RecordGradeRequest, graded_by: i64) -> Result<Grade> {
        self.upsert_grade_impl(req, graded_by).await
    }

    async fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(grade_id).await
    }

    async fn find_student_grade(
        &self,
        assessment_id: i64,
        student_id: i64,
    ) -> Result<Option<Grade>> {
        self.find_student_grade_impl(assessment_id, student_id).await
    }

    async fn list_assessment_grades(&self, assessment_id: i64) -> Result<Vec<GradeWithStudent>> {
        self.list_assessment_grades_impl(assessment_id).await
    }

    async fn list_student_grades(
        &self,
        student_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<MyGrade>> {
        self.list_student_grades_impl(student_id, course_id).await
    }

    async fn list_course_grades(&self, course_id: i64) -> Result<Vec<Grade>> {
        self.list_course_grades_impl(course_id).await
    }

    // 成绩修改申请模块
    async fn create_grade_change(
        &self,
        req: SubmitGradeChangeRequest,
        requested_by: i64,
        previous_score: f64,
    ) -> Result<GradeChangeRequest> {
        self.create_grade_change_impl(req, requested_by, previous_score)
            .await
    }

    async fn get_grade_change_by_id(&self, id: i64) -> Result<Option<GradeChangeRequest>> {
        self.get_grade_change_by_id_impl(id).await
    }

    async fn find_pending_grade_change(
        &self,
        grade_id: i64,
    ) -> Result<Option<GradeChangeRequest>> {
        self.find_pending_grade_change_impl(grade_id).await
    }

    async fn list_grade_changes_with_pagination(
        &self,
        query: GradeChangeListQuery,
    ) -> Result<GradeChangeListResponse> {
        self.list_grade_changes_with_pagination_impl(query).await
    }

    async fn review_grade_change(
        &self,
        id: i64,
        reviewer_id: i64,
        decision: ReviewDecision,
        comment: Option<String>,
    ) -> Result<GradeChangeRequest> {
        self.review_grade_change_impl(id, reviewer_id, decision, comment)
            .await
    }

    // 考勤模块
    async fn upsert_attendance_session(
        &self,
        session: NewAttendanceSession,
    ) -> Result<(AttendanceSession, bool)> {
        self.upsert_attendance_session_impl(session).await
    }

    async fn get_attendance_session_by_token(
        &self,
        token: &str,
    ) -> Result<Option<AttendanceSession>> {
        self.get_attendance_session_by_token_impl(token).await
    }

    async fn get_attendance_session_by_id(
        &self,
        session_id: i64,
    ) -> Result<Option<AttendanceSession>> {
        self.get_attendance_session_by_id_impl(session_id).await
    }

    async fn list_course_sessions(&self, course_id: i64) -> Result<Vec<AttendanceSession>> {
        self.list_course_sessions_impl(course_id).await
    }

    async fn upsert_attendance_record(
        &self,
        mark: AttendanceMark,
    ) -> Result<(AttendanceRecord, Option<AttendanceRecord>)> {
        self.upsert_attendance_record_impl(mark).await
    }

    async fn list_session_records(&self, session_id: i64) -> Result<Vec<RecordWithStudent>> {
        self.list_session_records_impl(session_id).await
    }

    async fn student_attendance_counts(
        &self,
        course_id: i64,
        student_id: i64,
        until_date: &str,
    ) -> Result<(u64, u64)> {
        self.student_attendance_counts_impl(course_id, student_id, until_date)
            .await
    }

    async fn student_attendance_summaries(
        &self,
        student_id: i64,
        until_date: &str,
    ) -> Result<Vec<CourseAttendanceSummary>> {
        self.student_attendance_summaries_impl(student_id, until_date)
            .await
    }

    // 课表模块
    async fn create_schedule_slot(&self, req: CreateScheduleRequest) -> Result<ScheduleSlot> {
        self.create_schedule_slot_impl(req).await
    }

    async fn get_schedule_slot_by_id(&self, slot_id: i64) -> Result<Option<ScheduleSlot>> {
        self.get_schedule_slot_by_id_impl(slot_id).await
    }

    async fn update_schedule_slot(
        &self,
        slot_id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<ScheduleSlot>> {
        self.update_schedule_slot_impl(slot_id, update).await
    }

    async fn delete_schedule_slot(&self, slot_id: i64) -> Result<bool> {
        self.delete_schedule_slot_impl(slot_id).await
    }

    async fn list_schedule_slots(
        &self,
        course_ids: Option<Vec<i64>>,
        academic_year: Option<String>,
    ) -> Result<Vec<ScheduleEntry>> {
        self.list_schedule_slots_impl(course_ids, academic_year)
            .await
    }

    async fn list_room_slots(
        &self,
        room: &str,
        day_of_week: i32,
        academic_year: &str,
        exclude_id: Option<i64>,
    ) -> Result<Vec<ScheduleSlot>> {
        self.list_room_slots_impl(room, day_of_week, academic_year, exclude_id)
            .await
    }

    // 公告模块
    async fn create_announcement(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        self.create_announcement_impl(author_id, req).await
    }

    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_by_id_impl(id).await
    }

    async fn delete_announcement(&self, id: i64) -> Result<bool> {
        self.delete_announcement_impl(id).await
    }

    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        self.list_announcements_with_pagination_impl(query).await
    }

    async fn mark_announcement_read(&self, announcement_id: i64, user_id: i64) -> Result<bool> {
        self.mark_announcement_read_impl(announcement_id, user_id)
            .await
    }

    async fn count_unread_announcements(
        &self,
        user_id: i64,
        visible_courses: Option<Vec<i64>>,
    ) -> Result<u64> {
        self.count_unread_announcements_impl(user_id, visible_courses)
            .await
    }

    // 广告模块
    async fn create_ad(&self, created_by: i64, req: CreateAdRequest) -> Result<Advertisement> {
        self.create_ad_impl(created_by, req).await
    }

    async fn get_ad_by_id(&self, id: i64) -> Result<Option<Advertisement>> {
        self.get_ad_by_id_impl(id).await
    }

    async fn list_ads(&self, active_only: bool) -> Result<Vec<Advertisement>> {
        self.list_ads_impl(active_only).await
    }

    async fn update_ad(&self, id: i64, update: UpdateAdRequest) -> Result<Option<Advertisement>> {
        self.update_ad_impl(id, update).await
    }

    async fn delete_ad(&self, id: i64) -> Result<bool> {
        self.delete_ad_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("faculty.db").unwrap(),
            "sqlite://faculty.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/faculty").unwrap(),
            "postgres://u:p@localhost/faculty"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }
}
