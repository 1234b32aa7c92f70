use axum::{
    extract::{Json, Multipart, Path},
    http::{HeaderMap, StatusCode},
    Extension,
};
use contracts::domain::a002_company::{
    Company, CompanyEnvelope, CompanyReview, DocumentsEnvelope, GalleryEnvelope, ReviewEnvelope,
    UploadedFile,
};
use contracts::domain::a003_product::{ImportResult, ProductsEnvelope};

use super::{caller, parse_id, request_locale};
use crate::domain::a002_company::service;
use crate::domain::a003_product::import;
use crate::shared::api_error::ApiResult;
use crate::shared::context::SharedContext;
use crate::system::auth::extractor::{CurrentUser, OptionalUser};

/// GET /api/companies
pub async fn list(user: OptionalUser) -> ApiResult<Json<Vec<Company>>> {
    let identity = user.identity();
    Ok(Json(service::list_for(identity.as_ref(), user.is_admin()).await?))
}

/// GET /api/companies/:id
pub async fn get_by_id(user: OptionalUser, Path(id): Path<String>) -> ApiResult<Json<Company>> {
    let uuid = parse_id(&id)?;
    let identity = user.identity();
    Ok(Json(
        service::get_visible(uuid, identity.as_ref(), user.is_admin()).await?,
    ))
}

/// POST /api/companies
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(body): Json<CompanyEnvelope>,
) -> ApiResult<Json<Company>> {
    let identity = caller(&claims)?;
    Ok(Json(service::create(body.company, identity).await?))
}

/// PUT /api/companies/:id
pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<CompanyEnvelope>,
) -> ApiResult<Json<Company>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    Ok(Json(
        service::update(uuid, body.company, &identity, claims.is_admin).await?,
    ))
}

/// DELETE /api/companies/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    service::delete(uuid, &identity, claims.is_admin).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/companies/:id/documents
pub async fn set_documents(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<DocumentsEnvelope>,
) -> ApiResult<Json<Company>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    Ok(Json(
        service::set_documents(uuid, body.documents, &identity, claims.is_admin).await?,
    ))
}

/// POST /api/companies/:id/gallery
pub async fn set_gallery(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<GalleryEnvelope>,
) -> ApiResult<Json<Company>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    Ok(Json(
        service::set_gallery(uuid, body.gallery, &identity, claims.is_admin).await?,
    ))
}

/// POST /api/companies/:id/reviews
pub async fn add_review(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ReviewEnvelope>,
) -> ApiResult<Json<CompanyReview>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    let review = service::add_review(uuid, body.review, identity, Some(claims.username)).await?;
    Ok(Json(review))
}

/// POST /api/companies/:id/products
pub async fn import_products(
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ProductsEnvelope>,
) -> ApiResult<Json<ImportResult>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    let locale = request_locale(&headers);
    let result = import::import_json(uuid, body.products, &identity, claims.is_admin, locale).await?;
    Ok(Json(result))
}

/// POST /api/companies/:id/logo (multipart `logo`)
pub async fn upload_logo(
    Extension(ctx): Extension<SharedContext>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<Company>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    let company = service::get_managed(uuid, &identity, claims.is_admin).await?;
    let file = ctx.uploads.save_field(multipart, "logo").await?;
    Ok(Json(service::set_logo(company, file.url).await?))
}

/// POST /api/companies/:id/files (multipart `file`)
///
/// Returns the stored URL; the client then references it from documents
/// or gallery.
pub async fn upload_file(
    Extension(ctx): Extension<SharedContext>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<UploadedFile>> {
    let uuid = parse_id(&id)?;
    let identity = caller(&claims)?;
    service::get_managed(uuid, &identity, claims.is_admin).await?;
    Ok(Json(ctx.uploads.save_field(multipart, "file").await?))
}
