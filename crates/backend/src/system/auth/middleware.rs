use axum::{body::Body, extract::Request, middleware::Next, response::Response};

use super::extractor::bearer_token;
use crate::shared::api_error::ApiError;

/// Middleware that requires valid JWT authentication
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?;

    let claims = super::jwt::validate_token(token)
        .await
        .map_err(|_| ApiError::Unauthorized)?;

    // Add claims to request extensions for use in handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Middleware that requires admin privileges
pub async fn require_admin(mut req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?;

    let claims = super::jwt::validate_token(token)
        .await
        .map_err(|_| ApiError::Unauthorized)?;

    if !claims.is_admin {
        return Err(ApiError::Forbidden(
            "Действие доступно только администратору".into(),
        ));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
