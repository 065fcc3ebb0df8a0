//! 存储层流程测试，使用内存 SQLite 并运行全部迁移

use std::sync::Arc;

use faculty_portal::errors::PortalError;
use faculty_portal::models::ads::requests::CreateAdRequest;
use faculty_portal::models::announcements::requests::{
    AnnouncementListQuery, CreateAnnouncementRequest,
};
use faculty_portal::models::assessments::entities::{Assessment, AssessmentKind};
use faculty_portal::models::assessments::requests::CreateAssessmentRequest;
use faculty_portal::models::attendance::entities::AttendanceStatus;
use faculty_portal::models::courses::entities::{Course, EnrollmentRole};
use faculty_portal::models::courses::requests::{AddEnrollmentRequest, CreateCourseRequest};
use faculty_portal::models::grade_changes::entities::{GradeChangeStatus, ReviewDecision};
use faculty_portal::models::grade_changes::requests::SubmitGradeChangeRequest;
use faculty_portal::models::grades::requests::RecordGradeRequest;
use faculty_portal::models::schedules::requests::CreateScheduleRequest;
use faculty_portal::models::users::entities::{User, UserRole};
use faculty_portal::models::users::requests::CreateUserRequest;
use faculty_portal::storage::sea_orm_storage::SeaOrmStorage;
use faculty_portal::storage::{AttendanceMark, NewAttendanceSession, Storage};
use sea_orm::{ConnectOptions, Database};

const YEAR: &str = "2025-2026";

async fn storage() -> Arc<dyn Storage> {
    // 内存库每个连接独立，连接池只保留一个连接
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Arc::new(SeaOrmStorage::from_connection(db).await.unwrap())
}

async fn user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@faculty.test"),
            password: "not-a-real-hash".to_string(),
            role,
            display_name: None,
        })
        .await
        .unwrap()
}

async fn course(storage: &Arc<dyn Storage>, code: &str) -> Course {
    storage
        .create_course(CreateCourseRequest {
            code: code.to_string(),
            name: format!("Course {code}"),
            description: None,
            credits: Some(6),
        })
        .await
        .unwrap()
}

async fn enroll(storage: &Arc<dyn Storage>, course_id: i64, user_id: i64, role: EnrollmentRole) {
    storage
        .add_enrollment(
            course_id,
            AddEnrollmentRequest {
                user_id,
                role,
                academic_year: YEAR.to_string(),
            },
        )
        .await
        .unwrap();
}

async fn assessment(storage: &Arc<dyn Storage>, course_id: i64, author: i64) -> Assessment {
    storage
        .create_assessment(
            course_id,
            author,
            CreateAssessmentRequest {
                title: "Midterm".to_string(),
                kind: AssessmentKind::Exam,
                max_points: 20.0,
                weight: Some(2.0),
                due_at: None,
            },
        )
        .await
        .unwrap()
}

fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn second_professor_for_same_year_is_rejected() {
    let storage = storage().await;
    let c = course(&storage, "ALG101").await;
    let p1 = user(&storage, "prof_a", UserRole::User).await;
    let p2 = user(&storage, "prof_b", UserRole::User).await;

    enroll(&storage, c.id, p1.id, EnrollmentRole::Professor).await;

    let second = storage
        .add_enrollment(
            c.id,
            AddEnrollmentRequest {
                user_id: p2.id,
                role: EnrollmentRole::Professor,
                academic_year: YEAR.to_string(),
            },
        )
        .await;
    assert!(matches!(second, Err(PortalError::Conflict(_))));

    // 下一学年可以换人
    let next_year = storage
        .add_enrollment(
            c.id,
            AddEnrollmentRequest {
                user_id: p2.id,
                role: EnrollmentRole::Professor,
                academic_year: "2026-2027".to_string(),
            },
        )
        .await;
    assert!(next_year.is_ok());

    let professor = storage.find_course_professor(c.id, YEAR).await.unwrap();
    assert_eq!(professor.map(|e| e.user_id), Some(p1.id));
}

#[tokio::test]
async fn duplicate_enrollment_is_rejected() {
    let storage = storage().await;
    let c = course(&storage, "NET200").await;
    let s = user(&storage, "student_a", UserRole::Student).await;

    enroll(&storage, c.id, s.id, EnrollmentRole::Student).await;
    let again = storage
        .add_enrollment(
            c.id,
            AddEnrollmentRequest {
                user_id: s.id,
                role: EnrollmentRole::Student,
                academic_year: YEAR.to_string(),
            },
        )
        .await;
    assert!(matches!(again, Err(PortalError::Conflict(_))));

    let mine = storage.list_user_courses(s.id, None).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].course.id, c.id);
}

#[tokio::test]
async fn recording_a_grade_twice_overwrites_it() {
    let storage = storage().await;
    let c = course(&storage, "DB300").await;
    let prof = user(&storage, "prof_db", UserRole::User).await;
    let s = user(&storage, "student_db", UserRole::Student).await;
    let a = assessment(&storage, c.id, prof.id).await;

    let first = storage
        .upsert_grade(
            RecordGradeRequest {
                assessment_id: a.id,
                student_id: s.id,
                score: 11.0,
                comment: None,
            },
            prof.id,
        )
        .await
        .unwrap();
    let second = storage
        .upsert_grade(
            RecordGradeRequest {
                assessment_id: a.id,
                student_id: s.id,
                score: 14.5,
                comment: Some("re-marked".to_string()),
            },
            prof.id,
        )
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    let grades = storage.list_course_grades(c.id).await.unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].score, 14.5);
}

#[tokio::test]
async fn approving_a_grade_change_applies_the_score_once() {
    let storage = storage().await;
    let c = course(&storage, "OS400").await;
    let prof = user(&storage, "prof_os", UserRole::User).await;
    let office = user(&storage, "office", UserRole::AcademicOffice).await;
    let s = user(&storage, "student_os", UserRole::Student).await;
    let a = assessment(&storage, c.id, prof.id).await;

    let grade = storage
        .upsert_grade(
            RecordGradeRequest {
                assessment_id: a.id,
                student_id: s.id,
                score: 9.0,
                comment: None,
            },
            prof.id,
        )
        .await
        .unwrap();

    let request = storage
        .create_grade_change(
            SubmitGradeChangeRequest {
                grade_id: grade.id,
                requested_score: 12.0,
                justification: "Exercise 3 was not counted".to_string(),
                attachment_token: None,
            },
            prof.id,
            grade.score,
        )
        .await
        .unwrap();
    assert_eq!(request.status, GradeChangeStatus::Pending);
    assert_eq!(request.previous_score, 9.0);

    let pending = storage.find_pending_grade_change(grade.id).await.unwrap();
    assert_eq!(pending.map(|r| r.id), Some(request.id));

    let reviewed = storage
        .review_grade_change(request.id, office.id, ReviewDecision::Approve, None)
        .await
        .unwrap();
    assert_eq!(reviewed.status, GradeChangeStatus::Approved);
    assert_eq!(reviewed.reviewed_by, Some(office.id));

    let updated = storage.get_grade_by_id(grade.id).await.unwrap().unwrap();
    assert_eq!(updated.score, 12.0);

    // 已审核的申请不能再次审核
    let again = storage
        .review_grade_change(request.id, office.id, ReviewDecision::Reject, None)
        .await;
    assert!(matches!(again, Err(PortalError::Conflict(_))));
    assert!(
        storage
            .find_pending_grade_change(grade.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn rejecting_a_grade_change_keeps_the_score() {
    let storage = storage().await;
    let c = course(&storage, "AI500").await;
    let prof = user(&storage, "prof_ai", UserRole::User).await;
    let admin = user(&storage, "root", UserRole::Admin).await;
    let s = user(&storage, "student_ai", UserRole::Student).await;
    let a = assessment(&storage, c.id, prof.id).await;

    let grade = storage
        .upsert_grade(
            RecordGradeRequest {
                assessment_id: a.id,
                student_id: s.id,
                score: 15.0,
                comment: None,
            },
            prof.id,
        )
        .await
        .unwrap();
    let request = storage
        .create_grade_change(
            SubmitGradeChangeRequest {
                grade_id: grade.id,
                requested_score: 18.0,
                justification: "Bonus question".to_string(),
                attachment_token: None,
            },
            prof.id,
            grade.score,
        )
        .await
        .unwrap();

    let reviewed = storage
        .review_grade_change(
            request.id,
            admin.id,
            ReviewDecision::Reject,
            Some("Bonus is not part of the exam".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(reviewed.status, GradeChangeStatus::Rejected);

    let unchanged = storage.get_grade_by_id(grade.id).await.unwrap().unwrap();
    assert_eq!(unchanged.score, 15.0);
}

#[tokio::test]
async fn regenerating_a_session_rotates_its_token() {
    let storage = storage().await;
    let c = course(&storage, "PHY110").await;
    let prof = user(&storage, "prof_phy", UserRole::User).await;
    let expires_at = chrono::Utc::now().timestamp() + 3600;

    let (first, rotated) = storage
        .upsert_attendance_session(NewAttendanceSession {
            course_id: c.id,
            session_date: today(),
            token: "a".repeat(32),
            latitude: 36.75,
            longitude: 3.05,
            created_by: prof.id,
            expires_at,
        })
        .await
        .unwrap();
    assert!(!rotated);

    let (second, rotated) = storage
        .upsert_attendance_session(NewAttendanceSession {
            course_id: c.id,
            session_date: today(),
            token: "b".repeat(32),
            latitude: 36.76,
            longitude: 3.06,
            created_by: prof.id,
            expires_at,
        })
        .await
        .unwrap();
    assert!(rotated);
    assert_eq!(first.id, second.id);

    assert!(
        storage
            .get_attendance_session_by_token(&"a".repeat(32))
            .await
            .unwrap()
            .is_none()
    );
    let found = storage
        .get_attendance_session_by_token(&"b".repeat(32))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.latitude, 36.76);
    assert_eq!(storage.list_course_sessions(c.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn check_in_upserts_and_counts_attendance() {
    let storage = storage().await;
    let c = course(&storage, "CHM120").await;
    let prof = user(&storage, "prof_chm", UserRole::User).await;
    let s = user(&storage, "student_chm", UserRole::Student).await;
    enroll(&storage, c.id, s.id, EnrollmentRole::Student).await;

    let (session, _) = storage
        .upsert_attendance_session(NewAttendanceSession {
            course_id: c.id,
            session_date: today(),
            token: "c".repeat(32),
            latitude: 48.85,
            longitude: 2.35,
            created_by: prof.id,
            expires_at: chrono::Utc::now().timestamp() + 3600,
        })
        .await
        .unwrap();

    let mark = AttendanceMark {
        session_id: session.id,
        course_id: c.id,
        student_id: s.id,
        status: AttendanceStatus::Present,
        latitude: Some(48.8501),
        longitude: Some(2.3501),
        distance_m: Some(13.4),
    };
    let (record, previous) = storage.upsert_attendance_record(mark.clone()).await.unwrap();
    assert!(previous.is_none());
    assert_eq!(record.status, AttendanceStatus::Present);

    // 重复扫码只更新同一条记录
    let (_, previous) = storage.upsert_attendance_record(mark).await.unwrap();
    assert_eq!(previous.map(|r| r.status), Some(AttendanceStatus::Present));
    assert_eq!(storage.list_session_records(session.id).await.unwrap().len(), 1);

    let (attended, total) = storage
        .student_attendance_counts(c.id, s.id, &today())
        .await
        .unwrap();
    assert_eq!((attended, total), (1, 1));

    // 手动改为缺勤后不再计入
    storage
        .upsert_attendance_record(AttendanceMark {
            session_id: session.id,
            course_id: c.id,
            student_id: s.id,
            status: AttendanceStatus::Absent,
            latitude: None,
            longitude: None,
            distance_m: None,
        })
        .await
        .unwrap();
    let (attended, total) = storage
        .student_attendance_counts(c.id, s.id, &today())
        .await
        .unwrap();
    assert_eq!((attended, total), (0, 1));
}

#[tokio::test]
async fn room_slots_are_scoped_by_room_day_and_year() {
    let storage = storage().await;
    let c = course(&storage, "MTH210").await;

    let slot = storage
        .create_schedule_slot(CreateScheduleRequest {
            course_id: c.id,
            academic_year: YEAR.to_string(),
            day_of_week: 1,
            start_time: "08:00".to_string(),
            end_time: "09:30".to_string(),
            room: "B204".to_string(),
        })
        .await
        .unwrap();

    let same_room = storage.list_room_slots("B204", 1, YEAR, None).await.unwrap();
    assert_eq!(same_room.len(), 1);
    assert!(
        storage
            .list_room_slots("B204", 1, YEAR, Some(slot.id))
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        storage
            .list_room_slots("B204", 2, YEAR, None)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        storage
            .list_room_slots("B204", 1, "2026-2027", None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn announcements_follow_course_visibility_and_read_state() {
    let storage = storage().await;
    let c1 = course(&storage, "BIO101").await;
    let c2 = course(&storage, "GEO101").await;
    let office = user(&storage, "office_ann", UserRole::AcademicOffice).await;
    let s = user(&storage, "student_ann", UserRole::Student).await;

    let faculty_wide = storage
        .create_announcement(
            office.id,
            CreateAnnouncementRequest {
                course_id: None,
                title: "Exam period".to_string(),
                content: "Exams start on Monday".to_string(),
            },
        )
        .await
        .unwrap();
    storage
        .create_announcement(
            office.id,
            CreateAnnouncementRequest {
                course_id: Some(c1.id),
                title: "Lab moved".to_string(),
                content: "Lab 2 is moved to room C1".to_string(),
            },
        )
        .await
        .unwrap();
    storage
        .create_announcement(
            office.id,
            CreateAnnouncementRequest {
                course_id: Some(c2.id),
                title: "Field trip".to_string(),
                content: "Bring boots".to_string(),
            },
        )
        .await
        .unwrap();

    let visible = Some(vec![c1.id]);
    let list = storage
        .list_announcements_with_pagination(AnnouncementListQuery {
            page: Some(1),
            size: Some(10),
            viewer_id: s.id,
            visible_courses: visible.clone(),
            course_id: None,
            unread_only: false,
        })
        .await
        .unwrap();
    assert_eq!(list.pagination.total, 2);
    assert_eq!(
        storage
            .count_unread_announcements(s.id, visible.clone())
            .await
            .unwrap(),
        2
    );

    assert!(
        storage
            .mark_announcement_read(faculty_wide.id, s.id)
            .await
            .unwrap()
    );
    // 第二次标记返回 false
    assert!(
        !storage
            .mark_announcement_read(faculty_wide.id, s.id)
            .await
            .unwrap()
    );
    assert_eq!(
        storage
            .count_unread_announcements(s.id, visible.clone())
            .await
            .unwrap(),
        1
    );

    let unread = storage
        .list_announcements_with_pagination(AnnouncementListQuery {
            page: Some(1),
            size: Some(10),
            viewer_id: s.id,
            visible_courses: visible,
            course_id: None,
            unread_only: true,
        })
        .await
        .unwrap();
    assert_eq!(unread.items.len(), 1);
    assert!(!unread.items[0].is_read);

    // 管理员视角不限课程
    assert_eq!(
        storage
            .count_unread_announcements(office.id, None)
            .await
            .unwrap(),
        3
    );
}

#[tokio::test]
async fn inactive_ads_are_hidden_from_active_list() {
    let storage = storage().await;
    let admin = user(&storage, "ads_admin", UserRole::Admin).await;

    storage
        .create_ad(
            admin.id,
            CreateAdRequest {
                title: "Career fair".to_string(),
                content: "Hall A, Thursday".to_string(),
                image_token: None,
                link_url: Some("https://faculty.test/fair".to_string()),
                is_active: None,
            },
        )
        .await
        .unwrap();
    storage
        .create_ad(
            admin.id,
            CreateAdRequest {
                title: "Old promo".to_string(),
                content: "Expired".to_string(),
                image_token: None,
                link_url: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

    assert_eq!(storage.list_ads(true).await.unwrap().len(), 1);
    assert_eq!(storage.list_ads(false).await.unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_writes_to_the_same_slot_keep_one_row() {
    let storage = storage().await;
    let c = course(&storage, "NET210").await;
    let prof = user(&storage, "prof_net", UserRole::User).await;
    let s = user(&storage, "student_net", UserRole::Student).await;
    enroll(&storage, c.id, s.id, EnrollmentRole::Student).await;
    let a = assessment(&storage, c.id, prof.id).await;

    let new_session = |token: char| NewAttendanceSession {
        course_id: c.id,
        session_date: today(),
        token: token.to_string().repeat(32),
        latitude: 36.75,
        longitude: 3.05,
        created_by: prof.id,
        expires_at: chrono::Utc::now().timestamp() + 3600,
    };
    let (first, second) = tokio::join!(
        storage.upsert_attendance_session(new_session('d')),
        storage.upsert_attendance_session(new_session('e')),
    );
    let (first, _) = first.unwrap();
    let (second, _) = second.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(storage.list_course_sessions(c.id).await.unwrap().len(), 1);

    let mark = AttendanceMark {
        session_id: first.id,
        course_id: c.id,
        student_id: s.id,
        status: AttendanceStatus::Present,
        latitude: Some(36.7501),
        longitude: Some(3.0501),
        distance_m: Some(12.0),
    };
    let (one, two) = tokio::join!(
        storage.upsert_attendance_record(mark.clone()),
        storage.upsert_attendance_record(mark),
    );
    assert_eq!(one.unwrap().0.id, two.unwrap().0.id);
    assert_eq!(storage.list_session_records(first.id).await.unwrap().len(), 1);

    let record = |score: f64| RecordGradeRequest {
        assessment_id: a.id,
        student_id: s.id,
        score,
        comment: None,
    };
    let (one, two) = tokio::join!(
        storage.upsert_grade(record(10.0), prof.id),
        storage.upsert_grade(record(13.0), prof.id),
    );
    assert_eq!(one.unwrap().id, two.unwrap().id);
    assert_eq!(storage.list_course_grades(c.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn second_pending_request_for_a_grade_is_a_conflict() {
    let storage = storage().await;
    let c = course(&storage, "SE330").await;
    let prof = user(&storage, "prof_se", UserRole::User).await;
    let s = user(&storage, "student_se", UserRole::Student).await;
    let a = assessment(&storage, c.id, prof.id).await;

    let grade = storage
        .upsert_grade(
            RecordGradeRequest {
                assessment_id: a.id,
                student_id: s.id,
                score: 8.0,
                comment: None,
            },
            prof.id,
        )
        .await
        .unwrap();
    let submission = |requested_score: f64| SubmitGradeChangeRequest {
        grade_id: grade.id,
        requested_score,
        justification: "Missing page".to_string(),
        attachment_token: None,
    };

    storage
        .create_grade_change(submission(10.0), prof.id, grade.score)
        .await
        .unwrap();
    let duplicate = storage
        .create_grade_change(submission(11.0), prof.id, grade.score)
        .await;
    assert!(matches!(duplicate, Err(PortalError::Conflict(_))));
}

#[tokio::test]
async fn approval_does_not_overwrite_a_newer_grade() {
    let storage = storage().await;
    let c = course(&storage, "ML600").await;
    let prof = user(&storage, "prof_ml", UserRole::User).await;
    let office = user(&storage, "office_ml", UserRole::AcademicOffice).await;
    let s = user(&storage, "student_ml", UserRole::Student).await;
    let a = assessment(&storage, c.id, prof.id).await;

    let record = |score: f64| RecordGradeRequest {
        assessment_id: a.id,
        student_id: s.id,
        score,
        comment: None,
    };
    let grade = storage.upsert_grade(record(9.0), prof.id).await.unwrap();
    let request = storage
        .create_grade_change(
            SubmitGradeChangeRequest {
                grade_id: grade.id,
                requested_score: 12.0,
                justification: "Exercise 2 was misread".to_string(),
                attachment_token: None,
            },
            prof.id,
            grade.score,
        )
        .await
        .unwrap();

    storage.upsert_grade(record(15.0), prof.id).await.unwrap();

    let reviewed = storage
        .review_grade_change(request.id, office.id, ReviewDecision::Approve, None)
        .await;
    assert!(matches!(reviewed, Err(PortalError::Conflict(_))));

    let current = storage.get_grade_by_id(grade.id).await.unwrap().unwrap();
    assert_eq!(current.score, 15.0);
    let still_pending = storage.find_pending_grade_change(grade.id).await.unwrap();
    assert_eq!(still_pending.map(|r| r.status), Some(GradeChangeStatus::Pending));
}
