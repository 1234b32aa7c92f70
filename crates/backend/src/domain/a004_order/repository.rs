use chrono::Utc;
use contracts::domain::a002_company::aggregate::CompanyId;
use contracts::domain::a003_product::aggregate::ProductId;
use contracts::domain::a004_order::aggregate::{Order, OrderId, OrderStatus};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub company_id: String,
    pub product_id: Option<String>,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub quantity: i32,
    pub message: String,
    pub status: String,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let company_uuid = Uuid::parse_str(&m.company_id).unwrap_or_else(|_| Uuid::nil());
        let product_id = m
            .product_id
            .as_deref()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(ProductId);

        Order {
            base: BaseAggregate::with_metadata(
                OrderId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            company_id: CompanyId(company_uuid),
            product_id,
            customer_name: m.customer_name,
            phone: m.phone,
            email: m.email,
            quantity: u32::try_from(m.quantity).unwrap_or(1),
            message: m.message,
            status: OrderStatus::from_db(&m.status),
        }
    }
}

pub fn to_active(aggregate: &Order) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        company_id: Set(aggregate.company_id.value().to_string()),
        product_id: Set(aggregate.product_id.map(|p| p.value().to_string())),
        customer_name: Set(aggregate.customer_name.clone()),
        phone: Set(aggregate.phone.clone()),
        email: Set(aggregate.email.clone()),
        quantity: Set(i32::try_from(aggregate.quantity).unwrap_or(i32::MAX)),
        message: Set(aggregate.message.clone()),
        status: Set(aggregate.status.as_str().to_string()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Заказы компаний, новые сверху
pub async fn list_by_companies(company_ids: &[Uuid]) -> anyhow::Result<Vec<Order>> {
    if company_ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = company_ids.iter().map(Uuid::to_string).collect();
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::CompanyId.is_in(ids))
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn list_all() -> anyhow::Result<Vec<Order>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Order>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Order) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Order) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}
