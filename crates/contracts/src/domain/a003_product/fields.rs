//! Реестр полей товара
//!
//! Единственное место, где перечислены атрибуты товара. Форма товара и
//! пакетный импорт читают этот срез.

use crate::shared::metadata::{FieldDescriptor, LocalizedText, ValidationRules};

/// Ключ поля с названием товара (используется как описание записи)
pub const NAME_KEY: &str = "name";

pub const CATEGORY_OPTIONS: &[&str] = &[
    "Памятники",
    "Ограды",
    "Венки и цветы",
    "Ритуальные услуги",
    "Благоустройство",
    "Прочее",
];

pub const UNIT_OPTIONS: &[&str] = &["шт", "компл", "м", "м²", "услуга"];

pub const PRODUCT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::string(NAME_KEY, LocalizedText::new("Название", "Name"))
        .required()
        .rules(ValidationRules {
            min_length: Some(2),
            max_length: Some(200),
            ..ValidationRules::none()
        }),
    FieldDescriptor::string("sku", LocalizedText::new("Артикул", "SKU")).rules(ValidationRules {
        max_length: Some(64),
        ..ValidationRules::none()
    }),
    FieldDescriptor::string("category", LocalizedText::new("Категория", "Category"))
        .required()
        .options(CATEGORY_OPTIONS),
    FieldDescriptor::number("price", LocalizedText::new("Цена, ₽", "Price, RUB"))
        .required()
        .rules(ValidationRules {
            min: Some(0.0),
            max: Some(100_000_000.0),
            ..ValidationRules::none()
        }),
    FieldDescriptor::string("unit", LocalizedText::new("Единица измерения", "Unit"))
        .options(UNIT_OPTIONS),
    FieldDescriptor::number("stock", LocalizedText::new("Остаток", "Stock"))
        .rules(ValidationRules {
            min: Some(0.0),
            ..ValidationRules::none()
        })
        .description(LocalizedText::new(
            "Оставьте пустым, если товар под заказ",
            "Leave empty for made-to-order items",
        )),
    FieldDescriptor::string("material", LocalizedText::new("Материал", "Material")).rules(
        ValidationRules {
            max_length: Some(100),
            ..ValidationRules::none()
        },
    ),
    FieldDescriptor::string("description", LocalizedText::new("Описание", "Description"))
        .multiline()
        .rules(ValidationRules {
            max_length: Some(5000),
            ..ValidationRules::none()
        }),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::{
        build_form, check_registry, find_field, validate_record, FieldKind, Locale,
    };
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_registry_is_consistent() {
        assert!(check_registry(PRODUCT_FIELDS).is_ok());
        assert!(PRODUCT_FIELDS.iter().all(|f| !f.key.is_empty()));
    }

    #[test]
    fn test_name_field_is_required_string() {
        let name = find_field(PRODUCT_FIELDS, NAME_KEY).unwrap();
        assert!(name.is_required());
        assert_eq!(name.kind, FieldKind::String);
    }

    #[test]
    fn test_form_contains_every_required_field() {
        let form = build_form(PRODUCT_FIELDS, Locale::Ru, &BTreeMap::new());
        assert_eq!(form.len(), PRODUCT_FIELDS.len());
        for field in PRODUCT_FIELDS.iter().filter(|f| f.is_required()) {
            assert!(form.iter().any(|c| c.key == field.key && c.required));
        }
    }

    #[test]
    fn test_number_fields_reject_text() {
        for field in PRODUCT_FIELDS.iter().filter(|f| f.kind == FieldKind::Number) {
            let mut raw: HashMap<String, String> = HashMap::new();
            raw.insert(NAME_KEY.into(), "Памятник".into());
            raw.insert("category".into(), "Памятники".into());
            raw.insert("price".into(), "1000".into());
            raw.insert(field.key.into(), "не число".into());
            let errors = validate_record(PRODUCT_FIELDS, &raw, Locale::Ru).unwrap_err();
            assert!(errors.iter().any(|e| e.key == field.key));
        }
    }
}
