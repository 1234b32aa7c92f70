//! Dynamic form model built from registry descriptors
//!
//! The frontend renders `FormControl`s one by one; it never spells field
//! keys itself.

use super::field_type::{FieldKind, Locale};
use super::import::FieldValue;
use super::types::FieldDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Вид элемента ввода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    TextArea,
    Number,
    Select,
}

/// Элемент формы, готовый к отрисовке
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormControl {
    pub key: String,
    pub label: String,
    pub input: InputKind,
    pub required: bool,
    pub value: String,
    pub options: Vec<String>,
    pub hint: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FormControl {
    /// Подпись со звёздочкой для обязательных полей
    pub fn display_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }
}

/// Построить форму по реестру в порядке объявления полей
pub fn build_form(
    fields: &[FieldDescriptor],
    locale: Locale,
    values: &BTreeMap<String, FieldValue>,
) -> Vec<FormControl> {
    fields
        .iter()
        .map(|field| {
            let input = match (field.kind, field.options.is_some(), field.multiline) {
                (FieldKind::Number, _, _) => InputKind::Number,
                (FieldKind::String, true, _) => InputKind::Select,
                (FieldKind::String, false, true) => InputKind::TextArea,
                (FieldKind::String, false, false) => InputKind::Text,
            };
            FormControl {
                key: field.key.to_string(),
                label: field.label.get(locale).to_string(),
                input,
                required: field.is_required(),
                value: values
                    .get(field.key)
                    .map(FieldValue::to_input_string)
                    .unwrap_or_default(),
                options: field
                    .options
                    .map(|o| o.iter().map(|s| s.to_string()).collect())
                    .unwrap_or_default(),
                hint: field.description.map(|d| d.get(locale).to_string()),
                min: field.validation.min,
                max: field.validation.max,
            }
        })
        .collect()
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
        FieldDescriptor::string("unit", LocalizedText::new("Ед.", "Unit")).options(&["шт", "м²"]),
        FieldDescriptor::string("notes", LocalizedText::new("Заметки", "Notes")).multiline(),
    ];

    #[test]
    fn test_required_fields_present_in_form() {
        let form = build_form(FIELDS, Locale::Ru, &BTreeMap::new());
        for field in FIELDS.iter().filter(|f| f.is_required()) {
            let control = form.iter().find(|c| c.key == field.key).unwrap();
            assert!(control.required);
            assert!(control.display_label().ends_with('*'));
        }
    }

    #[test]
    fn test_input_kinds_and_order() {
        let form = build_form(FIELDS, Locale::En, &BTreeMap::new());
        let kinds: Vec<InputKind> = form.iter().map(|c| c.input).collect();
        assert_eq!(
            kinds,
            vec![InputKind::Text, InputKind::Number, InputKind::Select, InputKind::TextArea]
        );
        assert_eq!(form[0].label, "Name");
        assert_eq!(form[1].min, Some(0.0));
        assert_eq!(form[2].options, vec!["шт".to_string(), "м²".to_string()]);
    }

    #[test]
    fn test_values_prefilled() {
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), FieldValue::Text("Плита".into()));
        values.insert("price".to_string(), FieldValue::Number(1500.0));
        let form = build_form(FIELDS, Locale::Ru, &values);
        assert_eq!(form[0].value, "Плита");
        assert_eq!(form[1].value, "1500");
        assert_eq!(form[2].value, "");
    }
}
