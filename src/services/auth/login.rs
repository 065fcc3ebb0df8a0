use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse, responses::BEARER},
};
use crate::utils::jwt;
use crate::utils::password::verify_password;

use super::AuthService;

fn login_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(login_failed()),
        Err(e) => return Ok(crate::services::internal_error("Login failed", e)),
    };

    // 2. 验证密码，停用账号与密码错误返回相同的提示
    if !verify_password(&login_request.password, &user.password_hash) {
        return Ok(login_failed());
    }
    if !user.is_active() {
        tracing::info!("Rejected login for inactive user {}", user.username);
        return Ok(login_failed());
    }

    // 3. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    // 4. 生成令牌对
    let token_pair = match user.generate_token_pair(login_request.remember_me) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    tracing::info!(
        "User {} logged in (remember_me={})",
        user.username,
        login_request.remember_me
    );

    let refresh_cookie = jwt::JwtUtils::create_refresh_token_cookie(
        &token_pair.refresh_token,
        login_request.remember_me,
    );

    let response = LoginResponse {
        access_token: token_pair.access_token,
        token_type: BEARER.to_string(),
        expires_in: config.jwt.access_token_expiry * 60,
        remember_me: login_request.remember_me,
        user,
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
