use axum::{
    extract::{Json, Multipart, Path},
    http::StatusCode,
    Extension,
};
use contracts::domain::a001_memorial::{Memorial, MemorialAccessDto, MemorialEnvelope};

use super::{caller, parse_id};
use crate::domain::a001_memorial::service;
use crate::shared::api_error::ApiResult;
use crate::shared::context::SharedContext;
use crate::system::auth::extractor::{CurrentUser, OptionalUser};

/// GET /api/memorials
pub async fn list(user: OptionalUser) -> ApiResult<Json<Vec<Memorial>>> {
    let identity = user.identity();
    Ok(Json(service::list_visible(identity.as_ref()).await?))
}

/// GET /api/memorials/mine
pub async fn mine(CurrentUser(claims): CurrentUser) -> ApiResult<Json<Vec<Memorial>>> {
    let identity = caller(&claims)?;
    Ok(Json(service::list_editable(&identity).await?))
}

/// GET /api/memorials/:id
pub async fn get_by_id(user: OptionalUser, Path(id): Path<String>) -> ApiResult<Json<Memorial>> {
    let uuid = parse_id(&id)?;
    let identity = user.identity();
    Ok(Json(service::get_visible(uuid, identity.as_ref()).await?))
}

/// POST /api/memorials
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(body): Json<MemorialEnvelope>,
) -> ApiResult<Json<Memorial>> {
    let identity = caller(&claims)?;
    Ok(Json(service::create(body.memorial, identity).await?))
}

/// PUT /api/memorials/:id
pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<MemorialEnvelope>,
) -> ApiResult<Json<Memorial>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    Ok(Json(service::update(uuid, body.memorial, &identity).await?))
}

/// PUT /api/memorials/:id/access
pub async fn set_access(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<MemorialAccessDto>,
) -> ApiResult<Json<Memorial>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    Ok(Json(service::set_access(uuid, dto, &identity).await?))
}

/// DELETE /api/memorials/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    service::delete(uuid, &identity, claims.is_admin).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/memorials/:id/photo (multipart `image`)
pub async fn upload_photo(
    Extension(ctx): Extension<SharedContext>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<Memorial>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    let memorial = service::get_editable(uuid, &identity).await?;
    let file = ctx.uploads.save_field(multipart, "image").await?;
    Ok(Json(service::set_photo(memorial, file.url).await?))
}
