use super::repository;
use crate::shared::api_error::DomainError;
use contracts::domain::a005_page::aggregate::{Page, PageDto};
use uuid::Uuid;

fn not_found() -> anyhow::Error {
    DomainError::NotFound("Страница не найдена".into()).into()
}

/// Опубликованные страницы для всех, черновики только администратору
pub async fn list_for(is_admin: bool) -> anyhow::Result<Vec<Page>> {
    Ok(repository::list_all()
        .await?
        .into_iter()
        .filter(|p| is_admin || p.is_published())
        .collect())
}

/// Страница по идентификатору или по адресу (slug)
pub async fn get_visible(key: &str, is_admin: bool) -> anyhow::Result<Page> {
    let page = match Uuid::parse_str(key) {
        Ok(id) => repository::get_by_id(id).await?,
        Err(_) => repository::get_by_slug(&key.trim().to_lowercase()).await?,
    };
    page.filter(|p| is_admin || p.is_published())
        .ok_or_else(not_found)
}

async fn ensure_slug_free(page: &Page) -> anyhow::Result<()> {
    if let Some(existing) = repository::get_by_slug(&page.slug).await? {
        if existing.base.id != page.base.id {
            return Err(DomainError::Invalid(format!(
                "Адрес «{}» уже занят другой страницей",
                page.slug
            ))
            .into());
        }
    }
    Ok(())
}

async fn save_checked(page: &mut Page) -> anyhow::Result<()> {
    page.content = ammonia::clean(&page.content);
    page.validate().map_err(DomainError::Invalid)?;
    ensure_slug_free(page).await?;
    page.before_write();
    Ok(())
}

pub async fn create(dto: PageDto) -> anyhow::Result<Page> {
    let mut aggregate = Page::new_for_insert(&dto);
    save_checked(&mut aggregate).await?;
    repository::insert(&aggregate).await?;
    tracing::info!("Page {} created", aggregate.slug);
    Ok(aggregate)
}

pub async fn update(id: Uuid, dto: PageDto) -> anyhow::Result<Page> {
    let mut aggregate = repository::get_by_id(id).await?.ok_or_else(not_found)?;
    aggregate.update(&dto);
    save_checked(&mut aggregate).await?;
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

pub async fn delete(id: Uuid) -> anyhow::Result<()> {
    if !repository::soft_delete(id).await? {
        return Err(not_found());
    }
    tracing::info!("Page {} deleted", id);
    Ok(())
}
