use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::shared::context::SharedContext;
use crate::shared::uploads::UPLOADS_URL_PREFIX;
use crate::system::middleware::request_logger::request_logger;
use crate::{handlers, system};

/// Запас на служебные части multipart-запроса сверх размера файла
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// Конфигурация всех роутов приложения
pub fn configure_routes(ctx: SharedContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let body_limit = ctx.uploads.max_bytes() + BODY_LIMIT_OVERHEAD;
    let uploads = ServeDir::new(ctx.uploads.dir());

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/system/auth/register", post(system::handlers::auth::register))
        .route("/api/system/auth/login", post(system::handlers::auth::login))
        .route("/api/system/auth/refresh", post(system::handlers::auth::refresh))
        .route("/api/system/auth/logout", post(system::handlers::auth::logout))
        // System auth routes (protected)
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // System users management (admin only)
        .route(
            "/api/system/users",
            get(system::handlers::users::list)
                .post(system::handlers::users::create)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        // ========================================
        // MEMORIALS
        // ========================================
        .route(
            "/api/memorials",
            get(handlers::a001_memorial::list).post(handlers::a001_memorial::create),
        )
        .route("/api/memorials/mine", get(handlers::a001_memorial::mine))
        .route(
            "/api/memorials/:id",
            get(handlers::a001_memorial::get_by_id)
                .put(handlers::a001_memorial::update)
                .delete(handlers::a001_memorial::delete),
        )
        .route(
            "/api/memorials/:id/access",
            put(handlers::a001_memorial::set_access),
        )
        .route(
            "/api/memorials/:id/photo",
            post(handlers::a001_memorial::upload_photo),
        )
        // ========================================
        // COMPANIES
        // ========================================
        .route(
            "/api/companies",
            get(handlers::a002_company::list).post(handlers::a002_company::create),
        )
        .route(
            "/api/companies/:id",
            get(handlers::a002_company::get_by_id)
                .put(handlers::a002_company::update)
                .delete(handlers::a002_company::delete),
        )
        .route(
            "/api/companies/:id/documents",
            post(handlers::a002_company::set_documents),
        )
        .route(
            "/api/companies/:id/gallery",
            post(handlers::a002_company::set_gallery),
        )
        .route(
            "/api/companies/:id/reviews",
            post(handlers::a002_company::add_review),
        )
        .route(
            "/api/companies/:id/products",
            post(handlers::a002_company::import_products),
        )
        .route(
            "/api/companies/:id/logo",
            post(handlers::a002_company::upload_logo),
        )
        .route(
            "/api/companies/:id/files",
            post(handlers::a002_company::upload_file),
        )
        // ========================================
        // PRODUCTS
        // ========================================
        .route(
            "/api/products",
            get(handlers::a003_product::list).post(handlers::a003_product::create),
        )
        .route("/api/products/fields", get(handlers::a003_product::fields))
        .route(
            "/api/products/import-csv",
            post(handlers::a003_product::import_csv),
        )
        .route(
            "/api/products/:id",
            get(handlers::a003_product::get_by_id)
                .put(handlers::a003_product::update)
                .delete(handlers::a003_product::delete),
        )
        // ========================================
        // ORDERS
        // ========================================
        .route(
            "/api/orders",
            get(handlers::a004_order::list).post(handlers::a004_order::create),
        )
        .route(
            "/api/orders/:id",
            get(handlers::a004_order::get_by_id).patch(handlers::a004_order::change_status),
        )
        // ========================================
        // PAGES
        // ========================================
        .route(
            "/api/pages",
            get(handlers::a005_page::list).post(handlers::a005_page::create),
        )
        .route(
            "/api/pages/:id",
            get(handlers::a005_page::get_by_id)
                .put(handlers::a005_page::update)
                .delete(handlers::a005_page::delete),
        )
        // ========================================
        // REPORTS
        // ========================================
        .route(
            "/api/reports",
            get(handlers::a006_report::list).post(handlers::a006_report::create),
        )
        .route(
            "/api/reports/:id",
            get(handlers::a006_report::get_by_id)
                .patch(handlers::a006_report::resolve)
                .delete(handlers::a006_report::delete),
        )
        // ========================================
        // CRM
        // ========================================
        .route("/api/crm/base-url", get(handlers::crm::base_url))
        .route(
            "/api/crm/base-url/invalidate",
            post(handlers::crm::invalidate),
        )
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .fallback_service(ServeDir::new("dist"))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(ctx))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::default_config;
    use crate::shared::context::AppContext;
    use crate::shared::crm::{CrmUrlResolver, HttpCrmProbe};
    use crate::shared::uploads::UploadStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        let config = default_config().unwrap();
        let uploads = UploadStore::new(std::env::temp_dir().join("memorials-test-uploads"), 1024);
        let probe = Arc::new(HttpCrmProbe::new(Duration::from_millis(100)).unwrap());
        let crm = CrmUrlResolver::new(Vec::new(), "https://crm.local/api".into(), probe);
        configure_routes(AppContext::new(config, uploads, crm))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_write_without_token_is_unauthorized() {
        let request = Request::post("/api/memorials")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"memorial":{"fullName":"Иван Петров"}}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert!(body["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let response = app()
            .oneshot(Request::get("/api/memorials/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_crm_base_url_falls_back_without_candidates() {
        let response = app()
            .oneshot(Request::get("/api/crm/base-url").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["baseUrl"], "https://crm.local/api");
    }

    #[tokio::test]
    async fn test_crm_invalidate_requires_admin() {
        let response = app()
            .oneshot(
                Request::post("/api/crm/base-url/invalidate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
