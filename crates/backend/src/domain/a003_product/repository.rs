use chrono::Utc;
use contracts::domain::a002_company::aggregate::CompanyId;
use contracts::domain::a003_product::aggregate::{Product, ProductId, ProductStatus};
use contracts::domain::common::{BaseAggregate, EntityMetadata, IdentityId};
use contracts::shared::metadata::ValidatedRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub company_id: String,
    pub owner: String,
    pub status: String,
    pub attributes_json: String,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
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
        let attributes: ValidatedRecord =
            serde_json::from_str(&m.attributes_json).unwrap_or_else(|e| {
                tracing::warn!("Bad attributes_json for product {}: {}", m.id, e);
                ValidatedRecord::new()
            });

        Product {
            base: BaseAggregate::with_metadata(
                ProductId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            company_id: CompanyId(company_uuid),
            owner: IdentityId::parse(&m.owner).unwrap_or_else(|| Uuid::new_v4().into()),
            status: ProductStatus::from_db(&m.status),
            attributes,
        }
    }
}

pub fn to_active(aggregate: &Product) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        company_id: Set(aggregate.company_id.value().to_string()),
        owner: Set(aggregate.owner.to_string()),
        status: Set(aggregate.status.as_str().to_string()),
        attributes_json: Set(serde_json::to_string(&aggregate.attributes)?),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    })
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list(company_id: Option<Uuid>) -> anyhow::Result<Vec<Product>> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));
    if let Some(company_id) = company_id {
        query = query.filter(Column::CompanyId.eq(company_id.to_string()));
    }
    let items = query
        .order_by_asc(Column::Description)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Product>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Product) -> anyhow::Result<Uuid> {
    to_active(aggregate)?.insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

/// Вставка пачки товаров одной транзакцией: при ошибке не сохраняется ничего
pub async fn insert_batch_on(db: &DatabaseConnection, products: &[Product]) -> anyhow::Result<Vec<Uuid>> {
    let txn = db.begin().await?;
    let mut ids = Vec::with_capacity(products.len());
    for product in products {
        to_active(product)?.insert(&txn).await?;
        ids.push(product.base.id.value());
    }
    txn.commit().await?;
    Ok(ids)
}

pub async fn insert_batch(products: &[Product]) -> anyhow::Result<Vec<Uuid>> {
    insert_batch_on(conn(), products).await
}

pub async fn update(aggregate: &Product) -> anyhow::Result<()> {
    let mut active = to_active(aggregate)?;
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;
    use contracts::shared::metadata::FieldValue;

    fn product(company: CompanyId, name: &str) -> Product {
        let mut record = ValidatedRecord::new();
        record.insert("name".into(), FieldValue::Text(name.into()));
        let mut product = Product::from_record(company, IdentityId::parse("u1").unwrap(), record);
        product.before_write();
        product
    }

    #[tokio::test]
    async fn test_insert_batch_commits_all_rows() {
        let conn = memory_connection().await;
        let company = CompanyId::new_v4();
        let batch = vec![product(company, "Ограда"), product(company, "Венок")];

        let ids = insert_batch_on(&conn, &batch).await.unwrap();

        assert_eq!(ids.len(), 2);
        let stored = Entity::find().all(&conn).await.unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_batch_rolls_back_on_failure() {
        let conn = memory_connection().await;
        let company = CompanyId::new_v4();
        let first = product(company, "Ограда");
        // Повтор первичного ключа ломает вторую вставку
        let batch = vec![first.clone(), product(company, "Венок"), first];

        assert!(insert_batch_on(&conn, &batch).await.is_err());

        let stored = Entity::find().all(&conn).await.unwrap();
        assert!(stored.is_empty());
    }
}
