//! Пакетный импорт товаров через реестр полей
//!
//! Строки проверяются независимо: корректные сохраняются одной транзакцией,
//! для остальных возвращается список ошибок с номером строки (с 1, без заголовка).

use super::repository;
use crate::domain::a002_company::service as company_service;
use crate::shared::api_error::DomainError;
use contracts::domain::a002_company::aggregate::Company;
use contracts::domain::a003_product::aggregate::{ImportResult, Product};
use contracts::domain::a003_product::PRODUCT_FIELDS;
use contracts::domain::common::IdentityId;
use contracts::shared::metadata::{
    validate_json_record, validate_record, FieldError, Locale, RowError, ValidatedRecord,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Разобрать CSV: первая строка содержит ключи реестра
pub fn parse_csv(text: &str) -> anyhow::Result<Vec<HashMap<String, String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DomainError::Invalid(format!("Не удалось прочитать заголовок CSV: {}", e)))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_lowercase())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DomainError::Invalid("CSV не содержит заголовка".into()).into());
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            DomainError::Invalid(format!("Ошибка разбора CSV в строке {}: {}", index + 1, e))
        })?;
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Разделить строки на провалидированные записи и ошибки
pub fn validate_rows<T, F>(rows: &[T], validate: F) -> (Vec<(usize, ValidatedRecord)>, Vec<RowError>)
where
    F: Fn(&T) -> Result<ValidatedRecord, Vec<FieldError>>,
{
    let mut valid = Vec::new();
    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match validate(row) {
            Ok(record) => valid.push((index + 1, record)),
            Err(field_errors) => errors.push(RowError {
                row: index + 1,
                errors: field_errors,
            }),
        }
    }
    (valid, errors)
}

async fn store(company: &Company, records: Vec<(usize, ValidatedRecord)>, mut errors: Vec<RowError>) -> anyhow::Result<ImportResult> {
    let products: Vec<Product> = records
        .into_iter()
        .map(|(_, record)| {
            let mut product = Product::from_record(company.base.id, company.owner.clone(), record);
            product.before_write();
            product
        })
        .collect();
    let created: Vec<String> = repository::insert_batch(&products)
        .await?
        .into_iter()
        .map(|id| id.to_string())
        .collect();
    errors.sort_by_key(|e| e.row);
    tracing::info!(
        "Import into company {}: {} created, {} rejected",
        company.base.code,
        created.len(),
        errors.len()
    );
    Ok(ImportResult { created, errors })
}

/// Импорт JSON-объектов `{products: [...]}` в компанию
pub async fn import_json(
    company_id: Uuid,
    products: Vec<serde_json::Map<String, serde_json::Value>>,
    identity: &IdentityId,
    is_admin: bool,
    locale: Locale,
) -> anyhow::Result<ImportResult> {
    let company = company_service::get_managed(company_id, identity, is_admin).await?;
    let (valid, errors) = validate_rows(&products, |row| {
        validate_json_record(PRODUCT_FIELDS, row, locale)
    });
    store(&company, valid, errors).await
}

/// Импорт CSV-текста в компанию
pub async fn import_csv(
    company_id: Uuid,
    text: &str,
    identity: &IdentityId,
    is_admin: bool,
    locale: Locale,
) -> anyhow::Result<ImportResult> {
    let company = company_service::get_managed(company_id, identity, is_admin).await?;
    let rows = parse_csv(text)?;
    let (valid, errors) = validate_rows(&rows, |row| validate_record(PRODUCT_FIELDS, row, locale));
    store(&company, valid, errors).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::metadata::FieldValue;

    const CSV: &str = "name,category,price,unit\n\
        Памятник вертикальный,Памятники,\"25 000\",шт\n\
        ,Ограды,abc,шт\n\
        \n\
        Венок траурный,Венки и цветы,\"1500,50\",\n";

    #[test]
    fn test_parse_csv_uses_header_keys_and_skips_blank_lines() {
        let rows = parse_csv(CSV).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["name"], "Памятник вертикальный");
        assert_eq!(rows[2]["unit"], "");
    }

    #[test]
    fn test_validate_rows_reports_row_numbers() {
        let rows = parse_csv(CSV).unwrap();
        let (valid, errors) =
            validate_rows(&rows, |row| validate_record(PRODUCT_FIELDS, row, Locale::Ru));

        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].0, 1);
        assert_eq!(valid[1].1.get("price"), Some(&FieldValue::Number(1500.5)));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 2);
        let keys: Vec<&str> = errors[0].errors.iter().map(|e| e.key.as_str()).collect();
        assert!(keys.contains(&"name"));
        assert!(keys.contains(&"price"));
    }

    #[test]
    fn test_parse_csv_rejects_empty_input() {
        assert!(parse_csv("").is_err());
    }
}
