use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use contracts::domain::common::IdentityId;
use contracts::system::auth::TokenClaims;

use crate::shared::api_error::ApiError;

/// Bearer-токен из заголовка Authorization
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Claims, положенные middleware, либо разобранные из заголовка
async fn claims_from_parts(parts: &Parts) -> Option<TokenClaims> {
    if let Some(claims) = parts.extensions.get::<TokenClaims>() {
        return Some(claims.clone());
    }
    let token = bearer_token(&parts.headers)?;
    match super::jwt::validate_token(token).await {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Rejected bearer token: {:#}", e);
            None
        }
    }
}

/// Authenticated caller
/// Usage in handlers: `async fn handler(CurrentUser(claims): CurrentUser) -> Response`
pub struct CurrentUser(pub TokenClaims);

impl CurrentUser {
    pub fn identity(&self) -> Option<IdentityId> {
        self.0.identity()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        claims_from_parts(parts)
            .await
            .filter(|c| c.identity().is_some())
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Caller who may be anonymous; an invalid token counts as no token
pub struct OptionalUser(pub Option<TokenClaims>);

impl OptionalUser {
    pub fn identity(&self) -> Option<IdentityId> {
        self.0.as_ref().and_then(TokenClaims::identity)
    }

    pub fn is_admin(&self) -> bool {
        self.0.as_ref().map(|c| c.is_admin).unwrap_or(false)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(claims_from_parts(parts).await))
    }
}

/// Authenticated administrator
pub struct AdminUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(claims) = CurrentUser::from_request_parts(parts, state).await?;
        if !claims.is_admin {
            return Err(ApiError::Forbidden(
                "Действие доступно только администратору".into(),
            ));
        }
        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer  "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(bearer_token(&headers), Some("xyz"));
    }
}
