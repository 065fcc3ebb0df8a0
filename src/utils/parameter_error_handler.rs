use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, &message));
    InternalError::from_response(message, response).into()
}

/// JSON 请求体解析失败
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Invalid JSON body on {}: {}", req.path(), err);
    bad_request(format!("Invalid request body: {err}"))
}

/// 查询参数解析失败
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Invalid query on {}: {}", req.path(), err);
    bad_request(format!("Invalid query parameters: {err}"))
}

/// 路径参数解析失败
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Invalid path on {}: {}", req.path(), err);
    bad_request(format!("Invalid path parameters: {err}"))
}
