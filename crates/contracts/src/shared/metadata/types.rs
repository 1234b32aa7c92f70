//! Core descriptor types for the field-schema registry
//!
//! All types use 'static data so registries are compile-time constants.

use super::field_type::{FieldKind, Locale};
use super::validation::ValidationRules;
use serde::Serialize;

/// Подпись на двух языках
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub ru: &'static str,
    pub en: &'static str,
}

impl LocalizedText {
    pub const fn new(ru: &'static str, en: &'static str) -> Self {
        Self { ru, en }
    }

    pub fn get(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ru => self.ru,
            Locale::En => self.en,
        }
    }
}

/// Описание одного редактируемого поля
///
/// Один и тот же срез дескрипторов используется формой и импортом.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: LocalizedText,
    pub kind: FieldKind,
    pub validation: ValidationRules,
    pub options: Option<&'static [&'static str]>,
    pub description: Option<LocalizedText>,
    /// Многострочный ввод в форме
    pub multiline: bool,
}

impl FieldDescriptor {
    /// Строковое поле без ограничений
    pub const fn string(key: &'static str, label: LocalizedText) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::String,
            validation: ValidationRules::none(),
            options: None,
            description: None,
            multiline: false,
        }
    }

    /// Числовое поле без ограничений
    pub const fn number(key: &'static str, label: LocalizedText) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Number,
            validation: ValidationRules::none(),
            options: None,
            description: None,
            multiline: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.validation.required = true;
        self
    }

    /// Заменить правила валидации, сохранив признак обязательности
    pub const fn rules(mut self, validation: ValidationRules) -> Self {
        let required = self.validation.required;
        self.validation = validation;
        self.validation.required = required || validation.required;
        self
    }

    pub const fn options(mut self, options: &'static [&'static str]) -> Self {
        self.options = Some(options);
        self
    }

    pub const fn description(mut self, description: LocalizedText) -> Self {
        self.description = Some(description);
        self
    }

    pub const fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.validation.required
    }
}

/// Найти дескриптор по ключу
pub fn find_field<'a>(fields: &'a [FieldDescriptor], key: &str) -> Option<&'a FieldDescriptor> {
    fields.iter().find(|f| f.key == key)
}

/// Проверка согласованности реестра: непустые уникальные ключи,
/// варианты выбора только у строковых полей, подписи на обоих языках.
pub fn check_registry(fields: &[FieldDescriptor]) -> Result<(), String> {
    let mut seen: Vec<&str> = Vec::with_capacity(fields.len());
    for field in fields {
        if field.key.trim().is_empty() {
            return Err("field key must not be empty".into());
        }
        if seen.contains(&field.key) {
            return Err(format!("duplicate field key: {}", field.key));
        }
        if field.options.is_some() && field.kind != FieldKind::String {
            return Err(format!("options on non-string field: {}", field.key));
        }
        if field.label.ru.is_empty() || field.label.en.is_empty() {
            return Err(format!("missing label for field: {}", field.key));
        }
        seen.push(field.key);
    }
    Ok(())
}
