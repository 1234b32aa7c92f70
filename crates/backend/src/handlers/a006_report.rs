use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::domain::a006_report::{Report, ReportEnvelope, ReportPatch};

use super::{caller, parse_id};
use crate::domain::a006_report::service;
use crate::shared::api_error::ApiResult;
use crate::system::auth::extractor::{AdminUser, CurrentUser, OptionalUser};

/// POST /api/reports (public)
pub async fn create(user: OptionalUser, Json(body): Json<ReportEnvelope>) -> ApiResult<Json<Report>> {
    Ok(Json(service::create(body.report, user.identity()).await?))
}

/// GET /api/reports
pub async fn list(CurrentUser(claims): CurrentUser) -> ApiResult<Json<Vec<Report>>> {
    let identity = caller(&claims)?;
    Ok(Json(service::list_for(&identity, claims.is_admin).await?))
}

/// GET /api/reports/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> ApiResult<Json<Report>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    Ok(Json(service::get_visible(uuid, &identity, claims.is_admin).await?))
}

/// PATCH /api/reports/:id
pub async fn resolve(
    AdminUser(claims): AdminUser,
    Path(id): Path<String>,
    Json(patch): Json<ReportPatch>,
) -> ApiResult<Json<Report>> {
    let uuid = parse_id(&id)?;
    let moderator = caller(&claims)?;
    Ok(Json(service::resolve(uuid, patch, &moderator).await?))
}

/// DELETE /api/reports/:id
pub async fn delete(_admin: AdminUser, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_id(&id)?;
    service::delete(uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}
