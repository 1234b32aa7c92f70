use axum::{extract::Json, Extension};
use serde::Serialize;

use crate::shared::context::SharedContext;
use crate::system::auth::extractor::AdminUser;

#[derive(Debug, Serialize)]
pub struct CrmBaseUrl {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
}

/// GET /api/crm/base-url
pub async fn base_url(Extension(ctx): Extension<SharedContext>) -> Json<CrmBaseUrl> {
    Json(CrmBaseUrl {
        base_url: ctx.crm.resolve().await,
    })
}

/// POST /api/crm/base-url/invalidate
pub async fn invalidate(
    _admin: AdminUser,
    Extension(ctx): Extension<SharedContext>,
) -> Json<serde_json::Value> {
    ctx.crm.invalidate().await;
    Json(serde_json::json!({ "ok": true }))
}
