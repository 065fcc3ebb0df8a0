use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::auth::ChangePasswordRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

use super::AuthService;

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(crate::services::unauthorized());
    };
    let storage = service.get_storage(request)?;

    // 缓存中的用户不含密码哈希，需回源
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(crate::services::internal_error("Failed to load user", e)),
    };

    if !verify_password(&change_request.current_password, &user.password_hash) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Current password is incorrect",
        )));
    }

    if change_request.new_password == change_request.current_password {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordPolicyViolation,
            "New password must differ from the current password",
        )));
    }

    if let Err(msg) = validate_password_simple(&change_request.new_password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::PasswordPolicyViolation, msg)));
    }

    let hashed = match hash_password(&change_request.new_password) {
        Ok(hash) => hash,
        Err(e) => return Ok(crate::services::internal_error("Password hashing failed", e)),
    };

    let update = UpdateUserRequest {
        email: None,
        password: Some(hashed),
        role: None,
        status: None,
        display_name: None,
    };

    match storage.update_user(user_id, update).await {
        Ok(Some(_)) => {
            tracing::info!("User {} changed password", user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password changed")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(crate::services::internal_error("Failed to change password", e)),
    }
}
