//! Import/validation routine driven by registry descriptors
//!
//! Raw input (form submission, JSON body or CSV row) is a map of key to
//! text. Unknown keys are dropped, number fields are parsed, empty optional
//! fields are omitted from the result.

use super::field_type::{FieldKind, Locale};
use super::types::FieldDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Значение поля после валидации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Представление для поля ввода
    pub fn to_input_string(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

/// Провалидированная запись: ключ поля -> значение
pub type ValidatedRecord = BTreeMap<String, FieldValue>;

/// Ошибка валидации отдельного поля
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub key: String,
    pub message: String,
}

/// Ошибки одной строки пакетного импорта (нумерация с 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub errors: Vec<FieldError>,
}

/// Разобрать число: допускает запятую как десятичный разделитель
/// и пробелы-разделители разрядов
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Провалидировать запись по реестру
pub fn validate_record(
    fields: &[FieldDescriptor],
    raw: &HashMap<String, String>,
    locale: Locale,
) -> Result<ValidatedRecord, Vec<FieldError>> {
    let mut record = ValidatedRecord::new();
    let mut errors = Vec::new();

    for field in fields {
        let label = field.label.get(locale);
        let value = raw.get(field.key).map(|s| s.trim()).unwrap_or("");

        if value.is_empty() {
            if field.is_required() {
                errors.push(FieldError {
                    key: field.key.to_string(),
                    message: format!("{} не может быть пустым", label),
                });
            }
            continue;
        }

        let checked = match field.kind {
            FieldKind::Number => match parse_number(value) {
                Some(n) => field
                    .validation
                    .validate_number(n, label)
                    .map(|_| FieldValue::Number(n)),
                None => Err(format!("{} должно быть числом", label)),
            },
            FieldKind::String => field
                .validation
                .validate_string(value, label)
                .and_then(|_| match field.options {
                    Some(options) if !options.contains(&value) => Err(format!(
                        "{}: недопустимое значение \"{}\"",
                        label, value
                    )),
                    _ => Ok(FieldValue::Text(value.to_string())),
                }),
        };

        match checked {
            Ok(v) => {
                record.insert(field.key.to_string(), v);
            }
            Err(message) => errors.push(FieldError {
                key: field.key.to_string(),
                message,
            }),
        }
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(errors)
    }
}

/// Провалидировать JSON-объект: числа и строки приводятся к тексту,
/// остальные типы считаются пустыми значениями
pub fn validate_json_record(
    fields: &[FieldDescriptor],
    raw: &serde_json::Map<String, serde_json::Value>,
    locale: Locale,
) -> Result<ValidatedRecord, Vec<FieldError>> {
    let text: HashMap<String, String> = raw
        .iter()
        .filter_map(|(k, v)| {
            let s = match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some((k.clone(), s))
        })
        .collect();
    validate_record(fields, &text, locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::types::LocalizedText;
    use crate::shared::metadata::validation::ValidationRules;

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::string("name", LocalizedText::new("Название", "Name")).required(),
        FieldDescriptor::number("price", LocalizedText::new("Цена", "Price"))
            .required()
            .rules(ValidationRules {
                min: Some(0.0),
                ..ValidationRules::none()
            }),
        FieldDescriptor::number("stock", LocalizedText::new("Остаток", "Stock")),
        FieldDescriptor::string("unit", LocalizedText::new("Ед.", "Unit")).options(&["шт", "м²"]),
    ];

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_record_parses_numbers_and_drops_unknown() {
        let record = validate_record(
            FIELDS,
            &raw(&[("name", " Плита "), ("price", "1 200,50"), ("extra", "x")]),
            Locale::Ru,
        )
        .unwrap();
        assert_eq!(record.get("name"), Some(&FieldValue::Text("Плита".into())));
        assert_eq!(record.get("price"), Some(&FieldValue::Number(1200.5)));
        assert!(!record.contains_key("extra"));
        assert!(!record.contains_key("stock"));
    }

    #[test]
    fn test_number_field_rejects_non_numeric() {
        let errors = validate_record(
            FIELDS,
            &raw(&[("name", "Плита"), ("price", "дорого")]),
            Locale::Ru,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "price");

        assert!(parse_number("12abc").is_none());
        assert!(parse_number("NaN").is_none());
        assert!(parse_number("inf").is_none());
    }

    #[test]
    fn test_missing_required_reported_per_field() {
        let errors = validate_record(FIELDS, &raw(&[]), Locale::En).unwrap_err();
        let keys: Vec<&str> = errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "price"]);
        assert!(errors[0].message.starts_with("Name"));
    }

    #[test]
    fn test_option_membership_and_bounds() {
        let errors = validate_record(
            FIELDS,
            &raw(&[("name", "Плита"), ("price", "-1"), ("unit", "кг")]),
            Locale::Ru,
        )
        .unwrap_err();
        let keys: Vec<&str> = errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["price", "unit"]);
    }

    #[test]
    fn test_json_record_accepts_numbers() {
        let value = serde_json::json!({"name": "Ваза", "price": 350, "stock": true});
        let record = validate_json_record(FIELDS, value.as_object().unwrap(), Locale::Ru).unwrap();
        assert_eq!(record.get("price").and_then(FieldValue::as_number), Some(350.0));
        assert!(!record.contains_key("stock"));
    }

    #[test]
    fn test_field_value_untagged_serde() {
        let v: FieldValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(v, FieldValue::Number(12.5));
        let v: FieldValue = serde_json::from_str("\"гранит\"").unwrap();
        assert_eq!(v.as_text(), Some("гранит"));
    }
}
