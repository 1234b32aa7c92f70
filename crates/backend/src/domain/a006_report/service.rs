use super::repository;
use crate::domain::{a001_memorial, a002_company, a003_product, a005_page};
use crate::shared::api_error::DomainError;
use contracts::domain::a006_report::aggregate::{Report, ReportDto, ReportPatch, ReportTarget};
use contracts::domain::common::IdentityId;
use uuid::Uuid;

fn not_found() -> anyhow::Error {
    DomainError::NotFound("Жалоба не найдена".into()).into()
}

/// Результат поиска объекта жалобы: `NotFound` означает отсутствие,
/// остальные ошибки (например, хранилища) пробрасываются как есть
fn target_found<T>(result: anyhow::Result<T>) -> anyhow::Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.downcast_ref::<DomainError>(), Some(DomainError::NotFound(_))) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Объект жалобы должен существовать и быть виден автору жалобы
async fn ensure_target_exists(kind: ReportTarget, raw_id: &str, reporter: Option<&IdentityId>) -> anyhow::Result<()> {
    let found = match (kind, Uuid::parse_str(raw_id)) {
        (ReportTarget::Page, _) => target_found(a005_page::service::get_visible(raw_id, false).await)?,
        (_, Err(_)) => false,
        (ReportTarget::Memorial, Ok(id)) => {
            target_found(a001_memorial::service::get_visible(id, reporter).await)?
        }
        (ReportTarget::Company, Ok(id)) => {
            target_found(a002_company::service::get_visible(id, reporter, false).await)?
        }
        (ReportTarget::Product, Ok(id)) => {
            target_found(a003_product::service::get_visible(id, reporter, false).await)?
        }
    };
    if found {
        Ok(())
    } else {
        Err(DomainError::Invalid("Объект жалобы не найден".into()).into())
    }
}

/// Принять жалобу; аноним тоже может пожаловаться
pub async fn create(dto: ReportDto, reporter: Option<IdentityId>) -> anyhow::Result<Report> {
    let mut aggregate = Report::new_for_insert(&dto, reporter);
    aggregate.validate().map_err(DomainError::Invalid)?;
    ensure_target_exists(aggregate.target_kind, &aggregate.target_id, aggregate.reporter.as_ref()).await?;
    aggregate.before_write();
    repository::insert(&aggregate).await?;
    tracing::info!(
        "Report {} on {} {}",
        aggregate.base.code,
        aggregate.target_kind.as_str(),
        aggregate.target_id
    );
    Ok(aggregate)
}

/// Администратор видит все жалобы, пользователь только свои
pub async fn list_for(identity: &IdentityId, is_admin: bool) -> anyhow::Result<Vec<Report>> {
    if is_admin {
        repository::list(None).await
    } else {
        repository::list(Some(identity)).await
    }
}

pub async fn get_visible(id: Uuid, identity: &IdentityId, is_admin: bool) -> anyhow::Result<Report> {
    repository::get_by_id(id)
        .await?
        .filter(|r| is_admin || r.reporter.as_ref() == Some(identity))
        .ok_or_else(not_found)
}

/// Решение модератора по жалобе
pub async fn resolve(id: Uuid, patch: ReportPatch, moderator: &IdentityId) -> anyhow::Result<Report> {
    let mut aggregate = repository::get_by_id(id).await?.ok_or_else(not_found)?;
    aggregate.apply_patch(&patch, moderator);
    aggregate.validate().map_err(DomainError::Invalid)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;
    tracing::info!("Report {} is {} (by {})", aggregate.base.code, aggregate.status.as_str(), moderator);
    Ok(aggregate)
}

pub async fn delete(id: Uuid) -> anyhow::Result<()> {
    if !repository::soft_delete(id).await? {
        return Err(not_found());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api_error::ApiError;
    use axum::http::StatusCode;

    #[test]
    fn test_target_found_only_swallows_not_found() {
        assert!(target_found(Ok(())).unwrap());

        let missing: anyhow::Result<()> = Err(DomainError::NotFound("Мемориал не найден".into()).into());
        assert!(!target_found(missing).unwrap());

        let denied: anyhow::Result<()> = Err(DomainError::Forbidden("Нет прав".into()).into());
        let err: ApiError = target_found(denied).unwrap_err().into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_store_failure_while_checking_target_is_internal() {
        let broken: anyhow::Result<()> = Err(anyhow::anyhow!("no such table: a001_memorial"));
        let err: ApiError = target_found(broken).unwrap_err().into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.body().error.as_deref(),
            Some("no such table: a001_memorial")
        );
    }
}
