use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, UserInfo,
};

use crate::shared::api_utils::{get_json, post_json, post_ok};

pub async fn login(username: String, password: String) -> Result<LoginResponse, String> {
    post_json("/api/system/auth/login", &LoginRequest { username, password }).await
}

pub async fn register(request: RegisterRequest) -> Result<LoginResponse, String> {
    post_json("/api/system/auth/register", &request).await
}

/// Refresh access token using refresh token
pub async fn refresh_token(refresh_token: String) -> Result<RefreshResponse, String> {
    post_json("/api/system/auth/refresh", &RefreshRequest { refresh_token }).await
}

/// Logout (revoke refresh token)
pub async fn logout(refresh_token: String) -> Result<(), String> {
    post_ok("/api/system/auth/logout", &RefreshRequest { refresh_token }).await
}

/// Текущий пользователь по сохранённому токену
pub async fn get_current_user() -> Result<UserInfo, String> {
    get_json("/api/system/auth/me").await
}
