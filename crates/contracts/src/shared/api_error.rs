use serde::{Deserialize, Serialize};

use super::metadata::FieldError;

/// Тело ответа об ошибке
///
/// `message` предназначено для пользователя, `error` содержит исходный
/// текст ошибки для диагностики.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
            fields: Vec::new(),
        }
    }

    /// Текст для пользователя: `message` и ошибки полей через "; "
    pub fn user_message(&self) -> String {
        let message = match self.message.trim() {
            "" => GENERIC_ERROR_MESSAGE,
            m => m,
        };
        if self.fields.is_empty() {
            return message.to_string();
        }
        let fields: Vec<&str> = self.fields.iter().map(|f| f.message.as_str()).collect();
        format!("{}: {}", message, fields.join("; "))
    }
}

/// Сообщение по умолчанию, если сервер не объяснил ошибку
pub const GENERIC_ERROR_MESSAGE: &str = "Не удалось выполнить запрос. Попробуйте позже";

/// Извлечь сообщение для пользователя из тела неуспешного ответа
pub fn message_from_body(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.user_message())
        .unwrap_or_else(|_| GENERIC_ERROR_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_body() {
        assert_eq!(
            message_from_body(r#"{"message":"Мемориал не найден","error":"not found"}"#),
            "Мемориал не найден"
        );
        assert_eq!(message_from_body("<html>502</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(message_from_body(r#"{"message":"  "}"#), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_message_includes_field_errors() {
        let body = r#"{"message":"Проверьте поля","fields":[
            {"key":"name","message":"Название не может быть пустым"},
            {"key":"price","message":"Цена, ₽ должно быть числом"}]}"#;
        assert_eq!(
            message_from_body(body),
            "Проверьте поля: Название не может быть пустым; Цена, ₽ должно быть числом"
        );
    }

    #[test]
    fn test_error_body_skips_empty_parts() {
        let json = serde_json::to_string(&ErrorBody::new("Ошибка")).unwrap();
        assert_eq!(json, r#"{"message":"Ошибка"}"#);
    }
}
