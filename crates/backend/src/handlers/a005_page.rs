use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::domain::a005_page::{Page, PageEnvelope};

use super::parse_id;
use crate::domain::a005_page::service;
use crate::shared::api_error::ApiResult;
use crate::system::auth::extractor::{AdminUser, OptionalUser};

/// GET /api/pages
pub async fn list(user: OptionalUser) -> ApiResult<Json<Vec<Page>>> {
    Ok(Json(service::list_for(user.is_admin()).await?))
}

/// GET /api/pages/:id (accepts id or slug)
pub async fn get_by_id(user: OptionalUser, Path(key): Path<String>) -> ApiResult<Json<Page>> {
    Ok(Json(service::get_visible(&key, user.is_admin()).await?))
}

/// POST /api/pages
pub async fn create(_admin: AdminUser, Json(body): Json<PageEnvelope>) -> ApiResult<Json<Page>> {
    Ok(Json(service::create(body.page).await?))
}

/// PUT /api/pages/:id
pub async fn update(
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(body): Json<PageEnvelope>,
) -> ApiResult<Json<Page>> {
    let uuid = parse_id(&id)?;
    Ok(Json(service::update(uuid, body.page).await?))
}

/// DELETE /api/pages/:id
pub async fn delete(_admin: AdminUser, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_id(&id)?;
    service::delete(uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}
