use super::repository;
use crate::domain::a002_company::service as company_service;
use crate::shared::api_error::DomainError;
use contracts::domain::a002_company::aggregate::CompanyStatus;
use contracts::domain::a003_product::aggregate::{Product, ProductDto, ProductStatus};
use contracts::domain::common::IdentityId;
use contracts::shared::metadata::Locale;
use uuid::Uuid;

fn not_found() -> anyhow::Error {
    DomainError::NotFound("Товар не найден".into()).into()
}

pub fn parse_company_id(raw: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::Invalid("Некорректный идентификатор компании".into()).into())
}

fn is_manager(product: &Product, identity: Option<&IdentityId>, is_admin: bool) -> bool {
    match identity {
        Some(id) => is_admin || product.owner == *id,
        None => false,
    }
}

/// Товары каталога: скрытые видны только владельцу и администратору
pub async fn list_for(
    company_id: Option<Uuid>,
    identity: Option<&IdentityId>,
    is_admin: bool,
) -> anyhow::Result<Vec<Product>> {
    Ok(repository::list(company_id)
        .await?
        .into_iter()
        .filter(|p| p.status == ProductStatus::Active || is_manager(p, identity, is_admin))
        .collect())
}

pub async fn get_visible(
    id: Uuid,
    identity: Option<&IdentityId>,
    is_admin: bool,
) -> anyhow::Result<Product> {
    repository::get_by_id(id)
        .await?
        .filter(|p| p.status == ProductStatus::Active || is_manager(p, identity, is_admin))
        .ok_or_else(not_found)
}

/// Создание товара в компании вызывающего
pub async fn create(
    dto: ProductDto,
    identity: &IdentityId,
    is_admin: bool,
    locale: Locale,
) -> anyhow::Result<Product> {
    let company_id = parse_company_id(&dto.company_id)?;
    let company = company_service::get_managed(company_id, identity, is_admin).await?;
    if company.status == CompanyStatus::Hidden && !is_admin {
        return Err(DomainError::Invalid("Компания скрыта, добавление товаров недоступно".into()).into());
    }

    let record = dto.validate_attributes(locale).map_err(DomainError::Fields)?;
    let mut aggregate = Product::from_record(company.base.id, company.owner.clone(), record);
    if let Some(status) = dto.status {
        aggregate.status = status;
    }
    aggregate.before_write();
    repository::insert(&aggregate).await?;
    tracing::info!(
        "Product {} created in company {}",
        aggregate.base.code,
        company.base.code
    );
    Ok(aggregate)
}

pub async fn update(
    id: Uuid,
    dto: ProductDto,
    identity: &IdentityId,
    is_admin: bool,
    locale: Locale,
) -> anyhow::Result<Product> {
    let mut aggregate = get_visible(id, Some(identity), is_admin).await?;
    if !is_manager(&aggregate, Some(identity), is_admin) {
        return Err(DomainError::Forbidden("Нет прав на изменение товара".into()).into());
    }

    let record = dto.validate_attributes(locale).map_err(DomainError::Fields)?;
    aggregate.set_attributes(record);
    if let Some(status) = dto.status {
        aggregate.status = status;
    }
    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

pub async fn delete(id: Uuid, identity: &IdentityId, is_admin: bool) -> anyhow::Result<()> {
    let aggregate = get_visible(id, Some(identity), is_admin).await?;
    if !is_manager(&aggregate, Some(identity), is_admin) {
        return Err(DomainError::Forbidden("Нет прав на удаление товара".into()).into());
    }
    repository::soft_delete(id).await?;
    Ok(())
}

/// Представление товара для клиента: плоский объект атрибутов
/// плюс служебные поля `id`, `code`, `companyId`, `status`
pub fn to_json(product: &Product) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for (key, value) in &product.attributes {
        object.insert(
            key.clone(),
            serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
        );
    }
    object.insert("id".into(), product.base.id.value().to_string().into());
    object.insert("code".into(), product.base.code.clone().into());
    object.insert("companyId".into(), product.company_id.value().to_string().into());
    object.insert("status".into(), product.status.as_str().into());
    serde_json::Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_company::aggregate::CompanyId;
    use contracts::shared::metadata::{FieldValue, ValidatedRecord};

    #[test]
    fn test_to_json_flattens_attributes() {
        let mut record = ValidatedRecord::new();
        record.insert("name".into(), FieldValue::Text("Ваза".into()));
        record.insert("price".into(), FieldValue::Number(1500.0));
        let product = Product::from_record(
            CompanyId::new_v4(),
            IdentityId::parse("u1").unwrap(),
            record,
        );

        let json = to_json(&product);
        assert_eq!(json["name"], "Ваза");
        assert_eq!(json["price"], 1500.0);
        assert_eq!(json["status"], "active");
        assert!(json["id"].as_str().is_some());
    }

    #[test]
    fn test_parse_company_id() {
        assert!(parse_company_id("not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_company_id(&format!(" {} ", id)).unwrap(), id);
    }
}
