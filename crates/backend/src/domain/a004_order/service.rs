use super::repository;
use crate::domain::a002_company::repository as company_repository;
use crate::domain::a002_company::service as company_service;
use crate::domain::a003_product::repository as product_repository;
use crate::shared::api_error::DomainError;
use contracts::domain::a003_product::aggregate::ProductStatus;
use contracts::domain::a004_order::aggregate::{Order, OrderDto, OrderStatus};
use contracts::domain::common::IdentityId;
use uuid::Uuid;

fn not_found() -> anyhow::Error {
    DomainError::NotFound("Заказ не найден".into()).into()
}

/// Принять заказ посетителя; компания должна быть активной,
/// товар (если указан) принадлежать ей
pub async fn create(dto: OrderDto) -> anyhow::Result<Order> {
    let mut aggregate = Order::new_for_insert(&dto).map_err(DomainError::Invalid)?;
    let company = company_service::get_visible(aggregate.company_id.value(), None, false).await?;

    if let Some(product_id) = aggregate.product_id {
        let product = product_repository::get_by_id(product_id.value())
            .await?
            .filter(|p| p.company_id == company.base.id && p.status == ProductStatus::Active)
            .ok_or_else(|| DomainError::Invalid("Товар не найден в каталоге компании".into()))?;
        aggregate.base.description = format!("{}: {}", product.base.description, aggregate.customer_name);
    }

    aggregate.before_write();
    repository::insert(&aggregate).await?;
    tracing::info!("Order {} accepted for company {}", aggregate.base.code, company.base.code);
    Ok(aggregate)
}

/// Заказ виден владельцу компании и администратору
pub async fn get_visible(id: Uuid, identity: &IdentityId, is_admin: bool) -> anyhow::Result<Order> {
    let order = repository::get_by_id(id).await?.ok_or_else(not_found)?;
    let company = company_repository::get_by_id(order.company_id.value()).await?;
    match company {
        Some(c) if c.can_manage(Some(identity), is_admin) => Ok(order),
        None if is_admin => Ok(order),
        _ => Err(not_found()),
    }
}

/// Заказы одной компании или всех компаний вызывающего
pub async fn list_for(
    company_id: Option<Uuid>,
    identity: &IdentityId,
    is_admin: bool,
) -> anyhow::Result<Vec<Order>> {
    if let Some(company_id) = company_id {
        let company = company_service::get_managed(company_id, identity, is_admin).await?;
        return repository::list_by_companies(&[company.base.id.value()]).await;
    }
    if is_admin {
        return repository::list_all().await;
    }
    let owned: Vec<Uuid> = company_repository::list_all()
        .await?
        .into_iter()
        .filter(|c| c.can_manage(Some(identity), false))
        .map(|c| c.base.id.value())
        .collect();
    repository::list_by_companies(&owned).await
}

pub async fn change_status(
    id: Uuid,
    status: OrderStatus,
    identity: &IdentityId,
    is_admin: bool,
) -> anyhow::Result<Order> {
    let mut aggregate = get_visible(id, identity, is_admin).await?;
    aggregate.change_status(status).map_err(DomainError::Invalid)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;
    tracing::info!("Order {} moved to {}", aggregate.base.code, status.as_str());
    Ok(aggregate)
}
