use super::repository;
use crate::shared::api_error::DomainError;
use chrono::Utc;
use contracts::domain::a002_company::aggregate::{
    Company, CompanyDocument, CompanyDto, CompanyReview, CompanyStatus, GalleryItem, ReviewDto,
};
use contracts::domain::common::IdentityId;
use uuid::Uuid;

fn not_found() -> anyhow::Error {
    DomainError::NotFound("Компания не найдена".into()).into()
}

fn validate(aggregate: &Company) -> anyhow::Result<()> {
    aggregate
        .validate()
        .map_err(|e| DomainError::Invalid(e).into())
}

/// Активные компании для всех, все для администратора и владельцу свои
pub async fn list_for(identity: Option<&IdentityId>, is_admin: bool) -> anyhow::Result<Vec<Company>> {
    Ok(repository::list_all()
        .await?
        .into_iter()
        .filter(|c| c.status == CompanyStatus::Active || c.can_manage(identity, is_admin))
        .collect())
}

/// Скрытая компания видна только владельцу и администратору
pub async fn get_visible(
    id: Uuid,
    identity: Option<&IdentityId>,
    is_admin: bool,
) -> anyhow::Result<Company> {
    repository::get_by_id(id)
        .await?
        .filter(|c| c.status == CompanyStatus::Active || c.can_manage(identity, is_admin))
        .ok_or_else(not_found)
}

/// Компания, которой вызывающий может управлять
pub async fn get_managed(id: Uuid, identity: &IdentityId, is_admin: bool) -> anyhow::Result<Company> {
    let company = get_visible(id, Some(identity), is_admin).await?;
    if !company.can_manage(Some(identity), is_admin) {
        return Err(DomainError::Forbidden(
            "Изменять компанию может только владелец или администратор".into(),
        )
        .into());
    }
    Ok(company)
}

pub async fn create(dto: CompanyDto, owner: IdentityId) -> anyhow::Result<Company> {
    let mut aggregate = Company::new_for_insert(&dto, owner);
    aggregate.about = ammonia::clean(&aggregate.about);
    validate(&aggregate)?;
    aggregate.before_write();
    repository::insert(&aggregate).await?;
    tracing::info!("Company {} created", aggregate.base.code);
    Ok(aggregate)
}

pub async fn update(
    id: Uuid,
    dto: CompanyDto,
    identity: &IdentityId,
    is_admin: bool,
) -> anyhow::Result<Company> {
    let mut aggregate = get_managed(id, identity, is_admin).await?;
    aggregate.update(&dto);
    aggregate.about = ammonia::clean(&aggregate.about);
    save(aggregate).await
}

pub async fn delete(id: Uuid, identity: &IdentityId, is_admin: bool) -> anyhow::Result<()> {
    let aggregate = get_managed(id, identity, is_admin).await?;
    repository::soft_delete(id).await?;
    tracing::info!("Company {} deleted by {}", aggregate.base.code, identity);
    Ok(())
}

/// Заменить список документов
pub async fn set_documents(
    id: Uuid,
    documents: Vec<CompanyDocument>,
    identity: &IdentityId,
    is_admin: bool,
) -> anyhow::Result<Company> {
    let mut aggregate = get_managed(id, identity, is_admin).await?;
    let now = Utc::now();
    aggregate.documents = documents
        .into_iter()
        .map(|mut d| {
            d.title = d.title.trim().to_string();
            d.uploaded_at.get_or_insert(now);
            d
        })
        .collect();
    save(aggregate).await
}

/// Заменить галерею
pub async fn set_gallery(
    id: Uuid,
    gallery: Vec<GalleryItem>,
    identity: &IdentityId,
    is_admin: bool,
) -> anyhow::Result<Company> {
    let mut aggregate = get_managed(id, identity, is_admin).await?;
    aggregate.gallery = gallery;
    save(aggregate).await
}

pub async fn set_logo(mut aggregate: Company, url: String) -> anyhow::Result<Company> {
    aggregate.logo = Some(url);
    save(aggregate).await
}

/// Добавить отзыв; один автор может оставить несколько отзывов
pub async fn add_review(
    id: Uuid,
    dto: ReviewDto,
    author: IdentityId,
    fallback_name: Option<String>,
) -> anyhow::Result<CompanyReview> {
    dto.validate().map_err(DomainError::Invalid)?;
    let mut aggregate = repository::get_by_id(id)
        .await?
        .filter(|c| c.status == CompanyStatus::Active)
        .ok_or_else(not_found)?;

    let review = build_review(dto, author, fallback_name);
    aggregate.reviews.push(review.clone());
    save(aggregate).await?;
    Ok(review)
}

fn build_review(dto: ReviewDto, author: IdentityId, fallback_name: Option<String>) -> CompanyReview {
    CompanyReview {
        id: Uuid::new_v4().to_string(),
        author,
        author_name: dto
            .author_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .or(fallback_name),
        rating: dto.rating,
        text: ammonia::clean(dto.text.trim()),
        created_at: Utc::now(),
    }
}

async fn save(mut aggregate: Company) -> anyhow::Result<Company> {
    validate(&aggregate)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_review_prefers_given_name() {
        let author = IdentityId::parse("u9").unwrap();
        let review = build_review(
            ReviewDto {
                rating: 5,
                text: "  Спасибо за работу  ".into(),
                author_name: Some(" ".into()),
            },
            author.clone(),
            Some("Мария".into()),
        );
        assert_eq!(review.author, author);
        assert_eq!(review.author_name.as_deref(), Some("Мария"));
        assert_eq!(review.text, "Спасибо за работу");
        assert_eq!(review.rating, 5);
    }
}
