use axum::{
    extract::{Json, Path, Query},
    http::{HeaderMap, StatusCode},
};
use contracts::domain::a003_product::{CsvImportRequest, ImportResult, ProductEnvelope, PRODUCT_FIELDS};
use contracts::shared::metadata::FieldDescriptor;
use serde::Deserialize;

use super::{caller, parse_id, request_locale};
use crate::domain::a003_product::{import, service};
use crate::shared::api_error::ApiResult;
use crate::system::auth::extractor::{CurrentUser, OptionalUser};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub company_id: Option<String>,
}

/// GET /api/products?company_id=
pub async fn list(
    user: OptionalUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<serde_json::Value>>> {
    let company_id = match query.company_id.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(parse_id(raw)?),
        None => None,
    };
    let identity = user.identity();
    let products = service::list_for(company_id, identity.as_ref(), user.is_admin()).await?;
    Ok(Json(products.iter().map(service::to_json).collect()))
}

/// GET /api/products/fields
pub async fn fields() -> Json<&'static [FieldDescriptor]> {
    Json(PRODUCT_FIELDS)
}

/// GET /api/products/:id
pub async fn get_by_id(
    user: OptionalUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let uuid = parse_id(&id)?;
    let identity = user.identity();
    let product = service::get_visible(uuid, identity.as_ref(), user.is_admin()).await?;
    Ok(Json(service::to_json(&product)))
}

/// POST /api/products
pub async fn create(
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    Json(body): Json<ProductEnvelope>,
) -> ApiResult<Json<serde_json::Value>> {
    let identity = caller(&claims)?;
    let locale = request_locale(&headers);
    let product = service::create(body.product, &identity, claims.is_admin, locale).await?;
    Ok(Json(service::to_json(&product)))
}

/// PUT /api/products/:id
pub async fn update(
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ProductEnvelope>,
) -> ApiResult<Json<serde_json::Value>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    let locale = request_locale(&headers);
    let product = service::update(uuid, body.product, &identity, claims.is_admin, locale).await?;
    Ok(Json(service::to_json(&product)))
}

/// DELETE /api/products/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    service::delete(uuid, &identity, claims.is_admin).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/products/import-csv
pub async fn import_csv(
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    Json(body): Json<CsvImportRequest>,
) -> ApiResult<Json<ImportResult>> {
    let company_id = parse_id(&body.company_id)?;
    let identity = caller(&claims)?;
    let locale = request_locale(&headers);
    let result = import::import_csv(company_id, &body.csv, &identity, claims.is_admin, locale).await?;
    Ok(Json(result))
}
