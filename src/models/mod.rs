//! 数据模型定义
//!
//! 每个资源分为 `entities`（业务实体）、`requests`（请求体 / 查询参数）
//! 与 `responses`（响应体）三部分，类型通过 ts-rs 导出给前端。

pub mod ads;
pub mod announcements;
pub mod assessments;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod courses;
pub mod files;
pub mod grade_changes;
pub mod grades;
pub mod pv;
pub mod schedules;
pub mod users;

pub use common::{
    ApiResponse, AppStartTime, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery,
};
