use std::sync::Arc;

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
        entities::{AttendanceRecord, AttendanceSession, AttendanceStatus},
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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 新签到会话的参数
#[derive(Debug, Clone)]
pub struct NewAttendanceSession {
    pub course_id: i64,
    pub session_date: String,
    pub token: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_by: i64,
    pub expires_at: i64,
}

/// 出勤记录写入参数，手动标记时坐标为空
#[derive(Debug, Clone)]
pub struct AttendanceMark {
    pub session_id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_m: Option<f64>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 文件管理方法
    async fn upload_file(
        &self,
        download_token: &str,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File>;
    async fn get_file_by_token(&self, download_token: &str) -> Result<Option<File>>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;
    // 用户参与的课程（任课或选课）
    async fn list_user_courses(
        &self,
        user_id: i64,
        academic_year: Option<String>,
    ) -> Result<Vec<MyCourse>>;

    /// 课程成员方法
    async fn add_enrollment(
        &self,
        course_id: i64,
        req: AddEnrollmentRequest,
    ) -> Result<CourseEnrollment>;
    async fn remove_enrollment(&self, course_id: i64, enrollment_id: i64) -> Result<bool>;
    async fn list_course_enrollments(
        &self,
        course_id: i64,
        query: EnrollmentQuery,
    ) -> Result<Vec<EnrollmentWithUser>>;
    // 用户在课程中的所有学年记录
    async fn get_user_course_enrollments(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Vec<CourseEnrollment>>;
    // 某学年的主讲教授
    async fn find_course_professor(
        &self,
        course_id: i64,
        academic_year: &str,
    ) -> Result<Option<CourseEnrollment>>;

    /// 考核管理方法
    async fn create_assessment(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment>;
    async fn get_assessment_by_id(&self, assessment_id: i64) -> Result<Option<Assessment>>;
    async fn list_course_assessments(&self, course_id: i64) -> Result<Vec<Assessment>>;
    async fn update_assessment(
        &self,
        assessment_id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Option<Assessment>>;
    async fn delete_assessment(&self, assessment_id: i64) -> Result<bool>;

    /// 成绩方法
    // 录入成绩，已存在则覆盖
    async fn upsert_grade(&self, req: RecordGradeRequest, graded_by: i64) -> Result<Grade>;
    async fn get_grade_by_id(&self, grade_id: i64) -> Result<Option<Grade>>;
    async fn find_student_grade(&self, assessment_id: i64, student_id: i64)
    -> Result<Option<Grade>>;
    async fn list_assessment_grades(&self, assessment_id: i64) -> Result<Vec<GradeWithStudent>>;
    async fn list_student_grades(
        &self,
        student_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<MyGrade>>;
    // 课程下所有考核的成绩
    async fn list_course_grades(&self, course_id: i64) -> Result<Vec<Grade>>;

    /// 成绩修改申请方法
    async fn create_grade_change(
        &self,
        req: SubmitGradeChangeRequest,
        requested_by: i64,
        previous_score: f64,
    ) -> Result<GradeChangeRequest>;
    async fn get_grade_change_by_id(&self, id: i64) -> Result<Option<GradeChangeRequest>>;
    async fn find_pending_grade_change(&self, grade_id: i64)
    -> Result<Option<GradeChangeRequest>>;
    async fn list_grade_changes_with_pagination(
        &self,
        query: GradeChangeListQuery,
    ) -> Result<GradeChangeListResponse>;
    // 审核申请，通过时在同一事务内更新成绩
    async fn review_grade_change(
        &self,
        id: i64,
        reviewer_id: i64,
        decision: ReviewDecision,
        comment: Option<String>,
    ) -> Result<GradeChangeRequest>;

    /// 考勤方法
    // 创建会话；同课程同日期已存在时轮换令牌与位置，第二个返回值表示是否为轮换
    async fn upsert_attendance_session(
        &self,
        session: NewAttendanceSession,
    ) -> Result<(AttendanceSession, bool)>;
    async fn get_attendance_session_by_token(
        &self,
        token: &str,
    ) -> Result<Option<AttendanceSession>>;
    async fn get_attendance_session_by_id(
        &self,
        session_id: i64,
    ) -> Result<Option<AttendanceSession>>;
    async fn list_course_sessions(&self, course_id: i64) -> Result<Vec<AttendanceSession>>;
    // 写入出勤记录，第二个返回值为写入前的记录
    async fn upsert_attendance_record(
        &self,
        mark: AttendanceMark,
    ) -> Result<(AttendanceRecord, Option<AttendanceRecord>)>;
    async fn list_session_records(&self, session_id: i64) -> Result<Vec<RecordWithStudent>>;
    // 截至 until_date（含）已开课的会话中，学生的 (出勤数, 会话数)
    async fn student_attendance_counts(
        &self,
        course_id: i64,
        student_id: i64,
        until_date: &str,
    ) -> Result<(u64, u64)>;
    async fn student_attendance_summaries(
        &self,
        student_id: i64,
        until_date: &str,
    ) -> Result<Vec<CourseAttendanceSummary>>;

    /// 课表方法
    async fn create_schedule_slot(&self, req: CreateScheduleRequest) -> Result<ScheduleSlot>;
    async fn get_schedule_slot_by_id(&self, slot_id: i64) -> Result<Option<ScheduleSlot>>;
    async fn update_schedule_slot(
        &self,
        slot_id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<ScheduleSlot>>;
    async fn delete_schedule_slot(&self, slot_id: i64) -> Result<bool>;
    async fn list_schedule_slots(
        &self,
        course_ids: Option<Vec<i64>>,
        academic_year: Option<String>,
    ) -> Result<Vec<ScheduleEntry>>;
    // 同一教室、同一天、同一学年的其他时段
    async fn list_room_slots(
        &self,
        room: &str,
        day_of_week: i32,
        academic_year: &str,
        exclude_id: Option<i64>,
    ) -> Result<Vec<ScheduleSlot>>;

    /// 公告方法
    async fn create_announcement(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement>;
    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;
    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse>;
    // 返回 false 表示之前已读
    async fn mark_announcement_read(&self, announcement_id: i64, user_id: i64) -> Result<bool>;
    async fn count_unread_announcements(
        &self,
        user_id: i64,
        visible_courses: Option<Vec<i64>>,
    ) -> Result<u64>;

    /// 广告方法
    async fn create_ad(&self, created_by: i64, req: CreateAdRequest) -> Result<Advertisement>;
    async fn get_ad_by_id(&self, id: i64) -> Result<Option<Advertisement>>;
    async fn list_ads(&self, active_only: bool) -> Result<Vec<Advertisement>>;
    async fn update_ad(&self, id: i64, update: UpdateAdRequest) -> Result<Option<Advertisement>>;
    async fn delete_ad(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
