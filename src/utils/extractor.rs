//! 路径参数提取器
//!
//! 解析失败时直接返回 400 的 `ApiResponse`，而不是 actix 默认的纯文本错误。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_path(format!("Missing path parameter: {name}")))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_path(format!("Invalid path parameter {name}: '{raw}'"))),
    }
}

macro_rules! define_id_extractors {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param).map($name))
                }
            }
        )*
    };
}

define_id_extractors! {
    SafeIDI64 => "id",
    SafeCourseIdI64 => "course_id",
    SafeEnrollmentIdI64 => "enrollment_id",
    SafeAssessmentIdI64 => "assessment_id",
    SafeSessionIdI64 => "session_id",
}

/// 文件下载令牌（仅允许字母、数字与连字符）
#[derive(Debug, Clone)]
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req.match_info().get("token").unwrap_or_default();
        let valid = !token.is_empty()
            && token.len() <= 64
            && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if valid {
            ready(Ok(SafeFileToken(token.to_string())))
        } else {
            ready(Err(bad_path(format!("Invalid file token: '{token}'"))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn parses_positive_id() {
        let req = TestRequest::default()
            .param("course_id", "42")
            .to_http_request();
        let id = SafeCourseIdI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn rejects_non_numeric_and_zero() {
        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("id", "0").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn file_token_charset() {
        let req = TestRequest::default()
            .param("token", "0b7c1d2e-aaaa-4bbb-8ccc-123456789abc")
            .to_http_request();
        assert!(SafeFileToken::extract(&req).await.is_ok());

        let req = TestRequest::default()
            .param("token", "../etc/passwd")
            .to_http_request();
        assert!(SafeFileToken::extract(&req).await.is_err());
    }
}
