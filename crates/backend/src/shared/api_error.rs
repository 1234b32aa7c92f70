use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::shared::api_error::ErrorBody;
use contracts::shared::metadata::FieldError;

/// Ошибка HTTP-слоя
///
/// Сервисы возвращают `anyhow::Result`, обработчики переводят ошибки
/// в `ApiError`, который отдаёт клиенту `{message, error, fields}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Ошибка проверки данных")]
    Validation(Vec<FieldError>),

    #[error("Требуется авторизация")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Internal { message: String, raw: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Ошибки предметной области, которые сервисы кладут в `anyhow::Error`
///
/// При переводе в `ApiError` они становятся 400/404 вместо 500.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Invalid(String),

    #[error("Ошибка проверки данных")]
    Fields(Vec<FieldError>),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Invalid(message) => Self::BadRequest(message),
            DomainError::Fields(fields) => Self::Validation(fields),
            DomainError::Forbidden(message) => Self::Forbidden(message),
            DomainError::NotFound(message) => Self::NotFound(message),
        }
    }
}

impl ApiError {
    pub fn internal(message: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            raw: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let mut body = ErrorBody::new(self.to_string());
        match self {
            Self::Validation(fields) => body.fields = fields.clone(),
            Self::Internal { raw, .. } => body.error = Some(raw.clone()),
            _ => {}
        }
        body
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(err) => Self::internal("Ошибка сервера при обработке запроса", format!("{:#}", err)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal { message, raw } = &self {
            tracing::error!("{}: {}", message, raw);
        }
        (status, Json(self.body())).into_response()
    }
}

/// Перевод `anyhow::Result` в `ApiResult` с русским сообщением
pub trait OrInternal<T> {
    fn or_internal(self, message: &str) -> ApiResult<T>;
}

impl<T> OrInternal<T> for anyhow::Result<T> {
    fn or_internal(self, message: &str) -> ApiResult<T> {
        self.map_err(|e| match e.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(e) => ApiError::internal(message, format!("{:#}", e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_body_carries_raw_error() {
        let err = ApiError::internal("Не удалось сохранить мемориал", "disk I/O error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["message"], "Не удалось сохранить мемориал");
        assert_eq!(json["error"], "disk I/O error");
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let err = ApiError::Validation(vec![FieldError {
            key: "price".into(),
            message: "Цена должно быть числом".into(),
        }]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["fields"][0]["key"], "price");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_domain_errors_keep_their_status() {
        let err: ApiError = anyhow::Error::new(DomainError::Invalid("ФИО не может быть пустым".into())).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().message, "ФИО не может быть пустым");

        let res: anyhow::Result<()> = Err(DomainError::NotFound("Компания не найдена".into()).into());
        let err = res.or_internal("Не удалось сохранить").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_anyhow_maps_to_500() {
        let err: ApiError = anyhow::anyhow!("connection refused").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().error.as_deref(), Some("connection refused"));
    }
}
