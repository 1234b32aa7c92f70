use chrono::Utc;
use contracts::domain::a001_memorial::aggregate::{Memorial, MemorialId};
use contracts::domain::common::{BaseAggregate, EntityMetadata, IdentityId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_memorial")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub birth_date: Option<Date>,
    pub death_date: Option<Date>,
    pub biography: String,
    pub epitaph: String,
    pub photo: Option<String>,
    pub created_by: String,
    pub is_private: bool,
    pub allowed_users_json: String,
    pub editors_users_json: String,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn identities_from_json(raw: &str, column: &str, id: &str) -> Vec<IdentityId> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Bad {} for memorial {}: {}", column, id, e);
        Vec::new()
    })
}

impl From<Model> for Memorial {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let allowed_users = identities_from_json(&m.allowed_users_json, "allowed_users_json", &m.id);
        let editors_users = identities_from_json(&m.editors_users_json, "editors_users_json", &m.id);

        Memorial {
            base: BaseAggregate::with_metadata(
                MemorialId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            birth_date: m.birth_date,
            death_date: m.death_date,
            biography: m.biography,
            epitaph: m.epitaph,
            photo: m.photo,
            // a lost creator becomes a fresh id nobody holds
            created_by: IdentityId::parse(&m.created_by).unwrap_or_else(|| Uuid::new_v4().into()),
            is_private: m.is_private,
            allowed_users,
            editors_users,
        }
    }
}

/// Полная ActiveModel для вставки
pub fn to_active(aggregate: &Memorial) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        birth_date: Set(aggregate.birth_date),
        death_date: Set(aggregate.death_date),
        biography: Set(aggregate.biography.clone()),
        epitaph: Set(aggregate.epitaph.clone()),
        photo: Set(aggregate.photo.clone()),
        created_by: Set(aggregate.created_by.to_string()),
        is_private: Set(aggregate.is_private),
        allowed_users_json: Set(serde_json::to_string(&aggregate.allowed_users)?),
        editors_users_json: Set(serde_json::to_string(&aggregate.editors_users)?),
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

pub async fn list_all() -> anyhow::Result<Vec<Memorial>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Description)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Мемориалы, созданные пользователем или где он редактор
///
/// Редакторы хранятся JSON-массивом, поэтому отбор по ним делается
/// через LIKE и уточняется проверкой прав на стороне сервиса.
pub async fn list_related_to(identity: &IdentityId) -> anyhow::Result<Vec<Memorial>> {
    let needle = format!("%{}%", serde_json::to_string(identity)?);
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(
            Condition::any()
                .add(Column::CreatedBy.eq(identity.as_str()))
                .add(Column::EditorsUsersJson.like(needle.as_str())),
        )
        .order_by_desc(Column::UpdatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Memorial>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Memorial) -> anyhow::Result<Uuid> {
    to_active(aggregate)?.insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Memorial) -> anyhow::Result<()> {
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
        .filter(Column::IsDeleted.eq(false))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;
    use contracts::domain::a001_memorial::aggregate::{MemorialAccessDto, MemorialDto};

    #[tokio::test]
    async fn test_memorial_roundtrip_through_sqlite() {
        let conn = memory_connection().await;

        let owner = IdentityId::parse("u1").unwrap();
        let mut memorial = Memorial::new_for_insert(
            &MemorialDto {
                full_name: "Иванов Иван Иванович".into(),
                birth_date: chrono::NaiveDate::from_ymd_opt(1931, 5, 9),
                is_private: true,
                ..Default::default()
            },
            owner.clone(),
        );
        memorial.apply_access(&MemorialAccessDto {
            is_private: true,
            allowed_users: vec!["u2".into()],
            editors_users: vec!["u3".into(), "u1".into()],
        });

        to_active(&memorial).unwrap().insert(&conn).await.unwrap();

        let loaded: Memorial = Entity::find_by_id(memorial.base.id.value().to_string())
            .one(&conn)
            .await
            .unwrap()
            .unwrap()
            .into();

        assert_eq!(loaded.base.description, "Иванов Иван Иванович");
        assert_eq!(loaded.created_by, owner);
        assert!(loaded.is_private);
        assert_eq!(loaded.allowed_users, vec![IdentityId::parse("u2").unwrap()]);
        assert_eq!(loaded.editors_users, vec![IdentityId::parse("u3").unwrap()]);
        assert_eq!(loaded.birth_date, memorial.birth_date);
    }
}
