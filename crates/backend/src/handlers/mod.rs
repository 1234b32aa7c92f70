pub mod a001_memorial;
pub mod a002_company;
pub mod a003_product;
pub mod a004_order;
pub mod a005_page;
pub mod a006_report;
pub mod crm;

use axum::http::{header, HeaderMap};
use contracts::domain::common::IdentityId;
use contracts::shared::metadata::Locale;
use contracts::system::auth::TokenClaims;
use uuid::Uuid;

use crate::shared::api_error::{ApiError, ApiResult};

/// Идентификатор из пути; некорректный UUID даёт 400
pub fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("Некорректный идентификатор: {}", raw)))
}

/// Identity of an authenticated caller
pub fn caller(claims: &TokenClaims) -> ApiResult<IdentityId> {
    claims.identity().ok_or(ApiError::Unauthorized)
}

/// Язык сообщений валидации по первому тегу `Accept-Language`
pub fn request_locale(headers: &HeaderMap) -> Locale {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split([',', ';']).next())
        .map(Locale::from_code)
        .unwrap_or(Locale::Ru)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(matches!(parse_id("42"), Err(ApiError::BadRequest(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_request_locale() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_locale(&headers), Locale::Ru);

        headers.insert(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9,ru;q=0.8".parse().unwrap());
        assert_eq!(request_locale(&headers), Locale::En);

        headers.insert(header::ACCEPT_LANGUAGE, "ru-RU,ru;q=0.9".parse().unwrap());
        assert_eq!(request_locale(&headers), Locale::Ru);
    }
}
