use chrono::Utc;
use contracts::domain::a006_report::aggregate::{Report, ReportId, ReportStatus, ReportTarget};
use contracts::domain::common::{BaseAggregate, EntityMetadata, IdentityId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a006_report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub target_kind: String,
    pub target_id: String,
    pub details: String,
    pub reporter: Option<String>,
    pub status: String,
    pub resolution: Option<String>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Строка с неизвестным видом объекта пропускается
fn into_report(m: Model) -> Option<Report> {
    let Some(target_kind) = ReportTarget::from_db(&m.target_kind) else {
        tracing::warn!("Report {} has unknown target kind '{}'", m.id, m.target_kind);
        return None;
    };
    let metadata = EntityMetadata {
        created_at: m.created_at.unwrap_or_else(Utc::now),
        updated_at: m.updated_at.unwrap_or_else(Utc::now),
        is_deleted: m.is_deleted,
        is_posted: m.is_posted,
        version: m.version,
    };
    let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

    Some(Report {
        base: BaseAggregate::with_metadata(ReportId(uuid), m.code, m.description, m.comment, metadata),
        target_kind,
        target_id: m.target_id,
        details: m.details,
        reporter: m.reporter.as_deref().and_then(IdentityId::parse),
        status: ReportStatus::from_db(&m.status),
        resolution: m.resolution,
        resolved_by: m.resolved_by.as_deref().and_then(IdentityId::parse),
        resolved_at: m.resolved_at,
    })
}

pub fn to_active(aggregate: &Report) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        target_kind: Set(aggregate.target_kind.as_str().to_string()),
        target_id: Set(aggregate.target_id.clone()),
        details: Set(aggregate.details.clone()),
        reporter: Set(aggregate.reporter.as_ref().map(ToString::to_string)),
        status: Set(aggregate.status.as_str().to_string()),
        resolution: Set(aggregate.resolution.clone()),
        resolved_by: Set(aggregate.resolved_by.as_ref().map(ToString::to_string)),
        resolved_at: Set(aggregate.resolved_at),
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

/// Жалобы: открытые сверху ("open" > "closed"), затем по дате
pub async fn list(reporter: Option<&IdentityId>) -> anyhow::Result<Vec<Report>> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));
    if let Some(reporter) = reporter {
        query = query.filter(Column::Reporter.eq(reporter.to_string()));
    }
    let items = query
        .order_by_desc(Column::Status)
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .filter_map(into_report)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Report>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.and_then(into_report))
}

pub async fn insert(aggregate: &Report) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Report) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
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

    fn model(kind: &str) -> Model {
        Model {
            id: Uuid::new_v4().to_string(),
            code: "REP-1".into(),
            description: "Спам".into(),
            comment: None,
            target_kind: kind.into(),
            target_id: "42".into(),
            details: String::new(),
            reporter: Some("u1".into()),
            status: "open".into(),
            resolution: None,
            resolved_by: None,
            resolved_at: None,
            is_deleted: false,
            is_posted: false,
            created_at: None,
            updated_at: None,
            version: 0,
        }
    }

    #[test]
    fn test_unknown_target_kind_is_skipped() {
        assert!(into_report(model("video")).is_none());
        let report = into_report(model("company")).unwrap();
        assert_eq!(report.target_kind, ReportTarget::Company);
        assert_eq!(report.reporter.unwrap().as_str(), "u1");
    }
}
