use crate::models::courses::responses::MyCourse;
use crate::models::users::entities::{User, UserRole};
use serde::Serialize;
use ts_rs::TS;

/// 登录成功后返回的会话信息，refresh token 只通过 HttpOnly cookie 下发
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    // 秒
    pub expires_in: i64,
    // 扫码签到页的持久登录
    pub remember_me: bool,
    pub user: User,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// 当前用户及其参与的课程，前端据此决定展示哪个门户
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct CurrentUserResponse {
    pub user: User,
    pub courses: Vec<MyCourse>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct TokenStatusResponse {
    pub is_valid: bool,
    pub user_id: i64,
    pub role: UserRole,
}

pub const BEARER: &str = "Bearer";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    #[test]
    fn login_response_hides_password_hash() {
        let now = chrono::Utc::now();
        let response = LoginResponse {
            access_token: "access".to_string(),
            token_type: BEARER.to_string(),
            expires_in: 900,
            remember_me: true,
            user: User {
                id: 4,
                username: "office".to_string(),
                email: "office@faculty.test".to_string(),
                password_hash: "$argon2id$secret".to_string(),
                role: UserRole::AcademicOffice,
                status: UserStatus::Active,
                display_name: None,
                last_login: None,
                created_at: now,
                updated_at: now,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["remember_me"], true);
        assert_eq!(json["user"]["role"], "academic_office");
        assert!(json["user"].get("password_hash").is_none());
    }
}
