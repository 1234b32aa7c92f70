use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::system::users::{CreateUserDto, UpdateUserDto, User};

use crate::shared::api_error::{ApiError, ApiResult, OrInternal};
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// List all users (admin only, guarded by `require_admin`)
pub async fn list(CurrentUser(_claims): CurrentUser) -> ApiResult<Json<Vec<User>>> {
    let users = service::list_all()
        .await
        .or_internal("Не удалось загрузить пользователей")?;
    Ok(Json(users))
}

pub async fn get_by_id(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    service::get_by_id(&id)
        .await
        .or_internal("Не удалось загрузить пользователя")?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Пользователь не найден".into()))
}

pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> ApiResult<Json<serde_json::Value>> {
    let user_id = service::create(dto, Some(claims.sub)).await.map_err(|e| {
        tracing::warn!("Failed to create user: {}", e);
        ApiError::BadRequest(e.to_string())
    })?;

    Ok(Json(serde_json::json!({ "id": user_id })))
}

pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> ApiResult<StatusCode> {
    dto.id = id;
    if dto.id == claims.sub && !dto.is_admin {
        return Err(ApiError::BadRequest(
            "Нельзя снять права администратора с самого себя".into(),
        ));
    }

    service::update(dto).await.map_err(|e| {
        tracing::warn!("Failed to update user: {}", e);
        ApiError::BadRequest(e.to_string())
    })?;

    Ok(StatusCode::OK)
}

pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if id == claims.sub {
        return Err(ApiError::BadRequest("Нельзя удалить самого себя".into()));
    }

    if service::delete(&id)
        .await
        .or_internal("Не удалось удалить пользователя")?
    {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::NotFound("Пользователь не найден".into()))
    }
}
