use chrono::Utc;
use contracts::domain::a002_company::aggregate::{
    Company, CompanyDocument, CompanyId, CompanyReview, CompanyStatus, GalleryItem,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata, IdentityId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_company")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub owner: String,
    pub status: String,
    pub about: String,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: String,
    pub logo: Option<String>,
    pub documents_json: String,
    pub gallery_json: String,
    pub reviews_json: String,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn list_from_json<T: DeserializeOwned>(raw: &str, column: &str, id: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Bad {} for company {}: {}", column, id, e);
        Vec::new()
    })
}

impl From<Model> for Company {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let documents: Vec<CompanyDocument> = list_from_json(&m.documents_json, "documents_json", &m.id);
        let gallery: Vec<GalleryItem> = list_from_json(&m.gallery_json, "gallery_json", &m.id);
        let reviews: Vec<CompanyReview> = list_from_json(&m.reviews_json, "reviews_json", &m.id);

        Company {
            base: BaseAggregate::with_metadata(
                CompanyId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            owner: IdentityId::parse(&m.owner).unwrap_or_else(|| Uuid::new_v4().into()),
            status: CompanyStatus::from_db(&m.status),
            about: m.about,
            phone: m.phone,
            email: m.email,
            website: m.website,
            address: m.address,
            logo: m.logo,
            documents,
            gallery,
            reviews,
        }
    }
}

pub fn to_active(aggregate: &Company) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        owner: Set(aggregate.owner.to_string()),
        status: Set(aggregate.status.as_str().to_string()),
        about: Set(aggregate.about.clone()),
        phone: Set(aggregate.phone.clone()),
        email: Set(aggregate.email.clone()),
        website: Set(aggregate.website.clone()),
        address: Set(aggregate.address.clone()),
        logo: Set(aggregate.logo.clone()),
        documents_json: Set(serde_json::to_string(&aggregate.documents)?),
        gallery_json: Set(serde_json::to_string(&aggregate.gallery)?),
        reviews_json: Set(serde_json::to_string(&aggregate.reviews)?),
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

pub async fn list_all() -> anyhow::Result<Vec<Company>> {
    let mut items: Vec<Company> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| {
        a.base
            .description
            .to_lowercase()
            .cmp(&b.base.description.to_lowercase())
    });
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Company>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Company) -> anyhow::Result<Uuid> {
    to_active(aggregate)?.insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Company) -> anyhow::Result<()> {
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
    use contracts::domain::a002_company::aggregate::CompanyDto;

    #[tokio::test]
    async fn test_embedded_collections_survive_storage() {
        let conn = memory_connection().await;
        let mut company = Company::new_for_insert(
            &CompanyDto {
                name: "Гранит-Мастер".into(),
                ..Default::default()
            },
            IdentityId::parse("owner-1").unwrap(),
        );
        company.gallery.push(GalleryItem {
            url: "/uploads/1-2.jpg".into(),
            caption: Some("Мастерская".into()),
        });

        to_active(&company).unwrap().insert(&conn).await.unwrap();
        let loaded: Company = Entity::find_by_id(company.base.id.value().to_string())
            .one(&conn)
            .await
            .unwrap()
            .unwrap()
            .into();

        assert_eq!(loaded.gallery, company.gallery);
        assert!(loaded.documents.is_empty());
        assert_eq!(loaded.status, CompanyStatus::Active);
        assert_eq!(loaded.owner.as_str(), "owner-1");
    }
}
