use super::fields::{NAME_KEY, PRODUCT_FIELDS};
use crate::domain::a002_company::aggregate::CompanyId;
use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata, IdentityId};
use crate::shared::metadata::{
    validate_json_record, FieldError, FieldValue, Locale, RowError, ValidatedRecord,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор товара
    ProductId
);

/// Видимость товара в каталоге
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Hidden,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Hidden => "hidden",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "hidden" => Self::Hidden,
            _ => Self::Active,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Товар или услуга компании
///
/// Атрибуты хранятся по ключам реестра `PRODUCT_FIELDS`;
/// `base.description` дублирует название для списков и поиска.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    #[serde(rename = "companyId")]
    pub company_id: CompanyId,
    pub owner: IdentityId,
    pub status: ProductStatus,
    pub attributes: ValidatedRecord,
}

impl Product {
    /// Создать товар из провалидированной записи
    pub fn from_record(company_id: CompanyId, owner: IdentityId, attributes: ValidatedRecord) -> Self {
        let id = ProductId::new_v4();
        let code = format!("{}-{}", Self::code_prefix(), &id.0.simple().to_string()[..8]);
        let mut product = Self {
            base: BaseAggregate::new(id, code, String::new()),
            company_id,
            owner,
            status: ProductStatus::Active,
            attributes: ValidatedRecord::new(),
        };
        product.set_attributes(attributes);
        product
    }

    /// Заменить атрибуты и синхронизировать название
    pub fn set_attributes(&mut self, attributes: ValidatedRecord) {
        self.base.description = attributes
            .get(NAME_KEY)
            .map(FieldValue::to_input_string)
            .unwrap_or_default();
        self.attributes = attributes;
    }

    pub fn attribute(&self, key: &str) -> Option<&FieldValue> {
        self.attributes.get(key)
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.before_write();
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "product"
    }

    fn element_name() -> &'static str {
        "Товар"
    }

    fn list_name() -> &'static str {
        "Товары"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления товара. Атрибуты сырые, проверяются реестром.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDto {
    pub id: Option<String>,
    #[serde(rename = "companyId")]
    pub company_id: String,
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl ProductDto {
    pub fn validate_attributes(&self, locale: Locale) -> Result<ValidatedRecord, Vec<FieldError>> {
        validate_json_record(PRODUCT_FIELDS, &self.attributes, locale)
    }
}

/// Тело запроса `{ "product": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEnvelope {
    pub product: ProductDto,
}

/// Тело запроса `{ "products": [...] }` для пакетного импорта в компанию
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsEnvelope {
    pub products: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Импорт из CSV: первая строка содержит ключи реестра
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvImportRequest {
    #[serde(rename = "companyId")]
    pub company_id: String,
    pub csv: String,
}

/// Результат пакетного импорта
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportResult {
    pub created: Vec<String>,
    pub errors: Vec<RowError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::FieldValue;

    #[test]
    fn test_from_record_syncs_description() {
        let mut record = ValidatedRecord::new();
        record.insert(NAME_KEY.into(), FieldValue::Text("Памятник из гранита".into()));
        record.insert("price".into(), FieldValue::Number(25000.0));
        let p = Product::from_record(
            CompanyId::new_v4(),
            IdentityId::parse("u1").unwrap(),
            record,
        );
        assert_eq!(p.base.description, "Памятник из гранита");
        assert!(p.base.code.starts_with("PRO-"));
        assert_eq!(p.attribute("price").and_then(FieldValue::as_number), Some(25000.0));
    }

    #[test]
    fn test_dto_validates_through_registry() {
        let dto: ProductDto = serde_json::from_value(serde_json::json!({
            "companyId": "c1",
            "attributes": {"name": "Ограда", "category": "Ограды", "price": "abc"}
        }))
        .unwrap();
        let errors = dto.validate_attributes(Locale::Ru).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "price");
    }
}
