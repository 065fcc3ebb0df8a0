pub mod extractor;
pub mod file_magic;
pub mod geo;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod sql;
pub mod validate;

pub use extractor::{
    SafeAssessmentIdI64, SafeCourseIdI64, SafeEnrollmentIdI64, SafeFileToken, SafeIDI64,
    SafeSessionIdI64,
};
pub use file_magic::validate_magic_bytes;
pub use geo::haversine_distance;
pub use parameter_error_handler::{json_error_handler, path_error_handler, query_error_handler};
pub use sql::escape_like_pattern;
