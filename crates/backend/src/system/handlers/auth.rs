use axum::{extract::Json, http::StatusCode};
use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, UserInfo,
};

use crate::shared::api_error::{ApiError, ApiResult, OrInternal};
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::jwt;
use crate::system::users::{repository as user_repository, service as user_service};

async fn issue_tokens(info: UserInfo) -> ApiResult<LoginResponse> {
    let access_token = jwt::generate_access_token(&info.id, &info.username, info.is_admin)
        .await
        .or_internal("Не удалось выпустить токен")?;

    let refresh_token = jwt::generate_refresh_token();
    user_repository::store_refresh_token(
        &info.id,
        &jwt::hash_token(&refresh_token),
        &jwt::calculate_refresh_token_expiration(),
    )
    .await
    .or_internal("Не удалось сохранить сессию")?;

    Ok(LoginResponse {
        access_token,
        refresh_token,
        user: info,
    })
}

/// Login handler
pub async fn login(Json(request): Json<LoginRequest>) -> ApiResult<Json<LoginResponse>> {
    let user = user_service::verify_credentials(&request.username, &request.password)
        .await
        .or_internal("Ошибка проверки учётных данных")?
        .ok_or(ApiError::Unauthorized)?;

    tracing::info!("User {} logged in", user.username);
    Ok(Json(issue_tokens(user_service::to_user_info(user)).await?))
}

/// Registration handler: creates a regular user and logs them in
pub async fn register(Json(request): Json<RegisterRequest>) -> ApiResult<Json<LoginResponse>> {
    let user = user_service::register(request)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(Json(issue_tokens(user_service::to_user_info(user)).await?))
}

/// Refresh token handler
pub async fn refresh(Json(request): Json<RefreshRequest>) -> ApiResult<Json<RefreshResponse>> {
    let user_id = user_repository::find_refresh_token_user(&jwt::hash_token(&request.refresh_token))
        .await
        .or_internal("Ошибка проверки сессии")?
        .ok_or(ApiError::Unauthorized)?;

    let user = user_service::get_by_id(&user_id)
        .await
        .or_internal("Ошибка загрузки пользователя")?
        .filter(|u| u.is_active)
        .ok_or(ApiError::Unauthorized)?;

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.is_admin)
        .await
        .or_internal("Не удалось выпустить токен")?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Logout handler
pub async fn logout(Json(request): Json<RefreshRequest>) -> ApiResult<StatusCode> {
    user_repository::revoke_refresh_token(&jwt::hash_token(&request.refresh_token))
        .await
        .or_internal("Не удалось завершить сессию")?;
    Ok(StatusCode::OK)
}

/// Get current user handler
pub async fn current_user(CurrentUser(claims): CurrentUser) -> ApiResult<Json<UserInfo>> {
    let user = user_service::get_by_id(&claims.sub)
        .await
        .or_internal("Ошибка загрузки пользователя")?
        .ok_or_else(|| ApiError::NotFound("Пользователь не найден".into()))?;

    Ok(Json(user_service::to_user_info(user)))
}
