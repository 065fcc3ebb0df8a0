use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

impl PaginationInfo {
    /// 将可选的页码 / 页大小规范化为 (page, size)，页码从 1 开始，页大小限制在 1..=100
    pub fn normalize(page: Option<i64>, size: Option<i64>, default_size: i64) -> (u64, u64) {
        let page = page.unwrap_or(1).max(1) as u64;
        let size = size.unwrap_or(default_size).clamp(1, 100) as u64;
        (page, size)
    }

    pub fn new(page: u64, size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

// flatten 后查询参数都以字符串形式到达，数字与布尔需要手动解析
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Bool(bool),
    Int(i64),
    Str(String),
}

pub(crate) fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    match Option::<LooseScalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LooseScalar::Int(v)) => Ok(Some(v)),
        Some(LooseScalar::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(LooseScalar::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid integer: '{s}'"))),
        Some(LooseScalar::Bool(b)) => Err(D::Error::custom(format!("invalid integer: {b}"))),
    }
}

pub(crate) fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    match Option::<LooseScalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LooseScalar::Bool(b)) => Ok(Some(b)),
        Some(LooseScalar::Int(0)) => Ok(Some(false)),
        Some(LooseScalar::Int(1)) => Ok(Some(true)),
        Some(LooseScalar::Str(s)) => match s.trim() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("invalid boolean: '{other}'"))),
        },
        Some(LooseScalar::Int(v)) => Err(D::Error::custom(format!("invalid boolean: {v}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_accepts_numeric_strings() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page":"3","size":25}"#).unwrap();
        assert_eq!(q.page, 3);
        assert_eq!(q.size, 25);
    }

    #[test]
    fn query_defaults() {
        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((q.page, q.size), (1, 10));
    }

    #[test]
    fn normalize_clamps() {
        assert_eq!(PaginationInfo::normalize(Some(0), Some(500), 20), (1, 100));
        assert_eq!(PaginationInfo::normalize(None, None, 20), (1, 20));
        assert_eq!(PaginationInfo::normalize(Some(4), Some(0), 20), (4, 1));
    }

    #[derive(Debug, Deserialize)]
    struct Filters {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        course_id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        unread_only: Option<bool>,
    }

    #[test]
    fn flattened_query_parses_scalars() {
        let f = actix_web::web::Query::<Filters>::from_query(
            "page=2&size=5&course_id=17&unread_only=true",
        )
        .unwrap();
        assert_eq!(f.pagination.page, 2);
        assert_eq!(f.pagination.size, 5);
        assert_eq!(f.course_id, Some(17));
        assert_eq!(f.unread_only, Some(true));
    }

    #[test]
    fn flattened_query_defaults() {
        let f = actix_web::web::Query::<Filters>::from_query("").unwrap();
        assert_eq!(f.pagination.page, 1);
        assert_eq!(f.course_id, None);
        assert_eq!(f.unread_only, None);
    }

    #[test]
    fn flattened_query_rejects_garbage() {
        assert!(actix_web::web::Query::<Filters>::from_query("course_id=abc").is_err());
        assert!(actix_web::web::Query::<Filters>::from_query("unread_only=maybe").is_err());
    }
}
