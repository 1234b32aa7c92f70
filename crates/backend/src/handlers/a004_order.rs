use axum::extract::{Json, Path, Query};
use contracts::domain::a004_order::{Order, OrderEnvelope, OrderStatusPatch};
use serde::Deserialize;

use super::{caller, parse_id};
use crate::domain::a004_order::service;
use crate::shared::api_error::ApiResult;
use crate::system::auth::extractor::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub company_id: Option<String>,
}

/// POST /api/orders (public)
pub async fn create(Json(body): Json<OrderEnvelope>) -> ApiResult<Json<Order>> {
    Ok(Json(service::create(body.order).await?))
}

/// GET /api/orders?company_id=
pub async fn list(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    let company_id = match query.company_id.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(parse_id(raw)?),
        None => None,
    };
    let identity = caller(&claims)?;
    Ok(Json(service::list_for(company_id, &identity, claims.is_admin).await?))
}

/// GET /api/orders/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> ApiResult<Json<Order>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    Ok(Json(service::get_visible(uuid, &identity, claims.is_admin).await?))
}

/// PATCH /api/orders/:id
pub async fn change_status(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(patch): Json<OrderStatusPatch>,
) -> ApiResult<Json<Order>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    Ok(Json(
        service::change_status(uuid, patch.status, &identity, claims.is_admin).await?,
    ))
}
