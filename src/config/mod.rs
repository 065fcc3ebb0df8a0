//! 配置管理
//!
//! 静态配置按 `config.toml` -> `config.{APP_ENV}.toml` -> 环境变量 的顺序叠加加载。

mod loader;
mod structs;

pub use structs::*;
