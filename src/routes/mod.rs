pub mod ads;

pub mod announcements;

pub mod attendance;

pub mod auth;

pub mod courses;

pub mod files;

pub mod grade_changes;

pub mod grades;

pub mod schedules;

pub mod users;

pub use ads::configure_ads_routes;
pub use announcements::configure_announcements_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_courses_routes;
pub use files::configure_file_routes;
pub use grade_changes::configure_grade_changes_routes;
pub use grades::configure_grades_routes;
pub use schedules::configure_schedules_routes;
pub use users::configure_user_routes;
