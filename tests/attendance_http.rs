//! 签到接口的 HTTP 测试：真实路由、中间件与内存 SQLite

use std::sync::{Arc, Once};

use actix_web::{App, http::StatusCode, test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use faculty_portal::cache::ObjectCache;
use faculty_portal::cache::object_cache::MokaCacheWrapper;
use faculty_portal::models::courses::entities::EnrollmentRole;
use faculty_portal::models::courses::requests::{AddEnrollmentRequest, CreateCourseRequest};
use faculty_portal::models::users::entities::{User, UserRole};
use faculty_portal::models::users::requests::CreateUserRequest;
use faculty_portal::routes::configure_attendance_routes;
use faculty_portal::storage::sea_orm_storage::SeaOrmStorage;
use faculty_portal::storage::{NewAttendanceSession, Storage};
use faculty_portal::utils::jwt::JwtUtils;
use sea_orm::{ConnectOptions, Database};

const YEAR: &str = "2025-2026";
const CLASSROOM: (f64, f64) = (36.75, 3.05);

static JWT_ENV: Once = Once::new();

fn init_env() {
    JWT_ENV.call_once(|| {
        // 配置首次读取前设置，测试进程内只执行一次
        unsafe { std::env::set_var("JWT_SECRET", "attendance-http-test-secret") };
    });
}

async fn storage() -> Arc<dyn Storage> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Arc::new(SeaOrmStorage::from_connection(db).await.unwrap())
}

fn cache() -> Arc<dyn ObjectCache> {
    Arc::new(MokaCacheWrapper::with_settings(1_000, 300))
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

async fn course_with(
    storage: &Arc<dyn Storage>,
    code: &str,
    members: &[(&User, EnrollmentRole)],
) -> i64 {
    let course = storage
        .create_course(CreateCourseRequest {
            code: code.to_string(),
            name: format!("Course {code}"),
            description: None,
            credits: Some(4),
        })
        .await
        .unwrap();
    for (member, role) in members {
        storage
            .add_enrollment(
                course.id,
                AddEnrollmentRequest {
                    user_id: member.id,
                    role: role.clone(),
                    academic_year: YEAR.to_string(),
                },
            )
            .await
            .unwrap();
    }
    course.id
}

async fn open_session(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    created_by: i64,
    day_offset: i64,
    token: &str,
) {
    let date = Utc::now().date_naive() + Duration::days(day_offset);
    let expires_at = faculty_portal::models::attendance::entities::session_expiry(date);
    storage
        .upsert_attendance_session(NewAttendanceSession {
            course_id,
            session_date: date.format("%Y-%m-%d").to_string(),
            token: token.to_string(),
            latitude: CLASSROOM.0,
            longitude: CLASSROOM.1,
            created_by,
            expires_at: expires_at.timestamp(),
        })
        .await
        .unwrap();
}

fn bearer(user: &User) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user.id, &user.role.to_string()).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! attendance_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(cache()))
                .configure(configure_attendance_routes),
        )
        .await
    };
}

macro_rules! check_in {
    ($app:expr, $student:expr, $token:expr, $lat:expr, $lng:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/attendance/check-in")
            .insert_header(bearer($student))
            .set_json(json!({ "token": $token, "latitude": $lat, "longitude": $lng }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn check_in_rejections_carry_their_error_codes() {
    init_env();
    let storage = storage().await;
    let prof = user(&storage, "prof_geo", UserRole::User).await;
    let enrolled = user(&storage, "student_geo", UserRole::Student).await;
    let outsider = user(&storage, "visitor_geo", UserRole::Student).await;
    let course_id = course_with(
        &storage,
        "GEO101",
        &[
            (&prof, EnrollmentRole::Professor),
            (&enrolled, EnrollmentRole::Student),
        ],
    )
    .await;

    let today_token = "t".repeat(32);
    open_session(&storage, course_id, prof.id, 0, &today_token).await;
    let app = attendance_app!(storage);

    let (status, body) = check_in!(app, &enrolled, "x".repeat(32), CLASSROOM.0, CLASSROOM.1);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5000);

    let (status, body) = check_in!(app, &outsider, today_token, CLASSROOM.0, CLASSROOM.1);
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 3002);

    // 约 5.5 km 外
    let (status, body) = check_in!(app, &enrolled, today_token, 36.80, CLASSROOM.1);
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 5002);
    assert!(
        storage
            .get_attendance_session_by_token(&today_token)
            .await
            .unwrap()
            .is_some()
    );
}

#[actix_web::test]
async fn check_in_respects_the_session_day() {
    init_env();
    let storage = storage().await;
    let prof = user(&storage, "prof_hist", UserRole::User).await;
    let s = user(&storage, "student_hist", UserRole::Student).await;
    let yesterday = course_with(
        &storage,
        "HIS201",
        &[(&prof, EnrollmentRole::Professor), (&s, EnrollmentRole::Student)],
    )
    .await;
    let tomorrow = course_with(
        &storage,
        "HIS202",
        &[(&prof, EnrollmentRole::Professor), (&s, EnrollmentRole::Student)],
    )
    .await;

    let stale = "s".repeat(32);
    let early = "f".repeat(32);
    open_session(&storage, yesterday, prof.id, -1, &stale).await;
    open_session(&storage, tomorrow, prof.id, 1, &early).await;
    let app = attendance_app!(storage);

    let (status, body) = check_in!(app, &s, stale, CLASSROOM.0, CLASSROOM.1);
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["code"], 5001);

    let (status, body) = check_in!(app, &s, early, CLASSROOM.0, CLASSROOM.1);
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 5005);
}

#[actix_web::test]
async fn check_in_within_range_is_recorded_once() {
    init_env();
    let storage = storage().await;
    let prof = user(&storage, "prof_bio", UserRole::User).await;
    let s = user(&storage, "student_bio", UserRole::Student).await;
    let course_id = course_with(
        &storage,
        "BIO150",
        &[(&prof, EnrollmentRole::Professor), (&s, EnrollmentRole::Student)],
    )
    .await;
    let token = "b".repeat(32);
    open_session(&storage, course_id, prof.id, 0, &token).await;
    let app = attendance_app!(storage);

    let (status, body) = check_in!(app, &s, token, 36.7501, 3.0501);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["already_checked_in"], false);
    assert_eq!(body["data"]["record"]["status"], "present");

    let (status, body) = check_in!(app, &s, token, 36.7501, 3.0501);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["already_checked_in"], true);
    assert_eq!(body["data"]["total_sessions"], 1);
}

#[actix_web::test]
async fn students_cannot_open_sessions_and_past_dates_are_rejected() {
    init_env();
    let storage = storage().await;
    let prof = user(&storage, "prof_art", UserRole::User).await;
    let s = user(&storage, "student_art", UserRole::Student).await;
    let course_id = course_with(
        &storage,
        "ART100",
        &[(&prof, EnrollmentRole::Professor), (&s, EnrollmentRole::Student)],
    )
    .await;
    let app = attendance_app!(storage);

    let yesterday = (Utc::now().date_naive() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/sessions")
        .insert_header(bearer(&prof))
        .set_json(json!({
            "course_id": course_id,
            "session_date": yesterday,
            "latitude": CLASSROOM.0,
            "longitude": CLASSROOM.1,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);
    assert!(storage.list_course_sessions(course_id).await.unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/sessions")
        .insert_header(bearer(&s))
        .set_json(json!({
            "course_id": course_id,
            "latitude": CLASSROOM.0,
            "longitude": CLASSROOM.1,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
