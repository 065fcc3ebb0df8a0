use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{
    BEARER, CurrentUserResponse, RefreshTokenResponse, TokenStatusResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt;

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(crate::services::unauthorized());
    };

    let claims = match jwt::JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(expired_session());
        }
    };

    // 停用或删除的账号不再续期
    let storage = service.get_storage(request)?;
    let user_id = claims.sub.parse::<i64>().unwrap_or_default();
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active() => {}
        Ok(_) => return Ok(expired_session()),
        Err(e) => return Ok(crate::services::internal_error("Refresh token failed", e)),
    }

    match jwt::JwtUtils::generate_access_token(user_id, &claims.role) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                token_type: BEARER.to_string(),
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error("Refresh token failed", e)),
    }
}

// 清除无效的 refresh token cookie
fn expired_session() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(jwt::JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_verify_token(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TokenStatusResponse {
                is_valid: true,
                user_id: user.id,
                role: user.role,
            },
            "Token is valid",
        ))),
        None => Ok(crate::services::unauthorized()),
    }
}

/// 当前用户，附带其任课或选修的课程
pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(crate::services::unauthorized());
    };
    let storage = service.get_storage(request)?;

    match storage.list_user_courses(user.id, None).await {
        Ok(courses) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CurrentUserResponse { user, courses },
            "User information retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error("Failed to load user courses", e)),
    }
}
