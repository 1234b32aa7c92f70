use super::repository;
use crate::shared::api_error::DomainError;
use contracts::domain::a001_memorial::access::{
    can_delete, can_edit, can_manage_access, can_view, visible_to,
};
use contracts::domain::a001_memorial::aggregate::{Memorial, MemorialAccessDto, MemorialDto};
use contracts::domain::common::IdentityId;
use uuid::Uuid;

fn not_found() -> anyhow::Error {
    DomainError::NotFound("Мемориал не найден".into()).into()
}

fn sanitize(dto: &MemorialDto) -> MemorialDto {
    let mut clean = dto.clone();
    clean.biography = ammonia::clean(&dto.biography);
    clean
}

fn validate(aggregate: &Memorial) -> anyhow::Result<()> {
    aggregate
        .validate()
        .map_err(|e| DomainError::Invalid(e).into())
}

/// Список мемориалов, видимых вызывающему
pub async fn list_visible(identity: Option<&IdentityId>) -> anyhow::Result<Vec<Memorial>> {
    Ok(visible_to(repository::list_all().await?, identity))
}

/// Мемориалы, которые пользователь создал или может редактировать
pub async fn list_editable(identity: &IdentityId) -> anyhow::Result<Vec<Memorial>> {
    Ok(repository::list_related_to(identity)
        .await?
        .into_iter()
        .filter(|m| can_edit(Some(m), Some(identity)))
        .collect())
}

/// Мемориал, если он виден вызывающему; иначе `NotFound`
pub async fn get_visible(id: Uuid, identity: Option<&IdentityId>) -> anyhow::Result<Memorial> {
    repository::get_by_id(id)
        .await?
        .filter(|m| can_view(Some(m), identity))
        .ok_or_else(not_found)
}

/// Мемориал для изменения: 404 если не виден, 403 если виден, но не редактируется
pub async fn get_editable(id: Uuid, identity: &IdentityId) -> anyhow::Result<Memorial> {
    let memorial = get_visible(id, Some(identity)).await?;
    if !can_edit(Some(&memorial), Some(identity)) {
        return Err(DomainError::Forbidden("Нет прав на редактирование мемориала".into()).into());
    }
    Ok(memorial)
}

/// Создание мемориала; создатель получает права редактора
pub async fn create(dto: MemorialDto, creator: IdentityId) -> anyhow::Result<Memorial> {
    let mut aggregate = Memorial::new_for_insert(&sanitize(&dto), creator);
    validate(&aggregate)?;
    aggregate.before_write();
    repository::insert(&aggregate).await?;
    tracing::info!(
        "Memorial {} created by {}",
        aggregate.base.code,
        aggregate.created_by
    );
    Ok(aggregate)
}

pub async fn update(id: Uuid, dto: MemorialDto, identity: &IdentityId) -> anyhow::Result<Memorial> {
    let mut aggregate = get_editable(id, identity).await?;
    aggregate.update(&sanitize(&dto));
    validate(&aggregate)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

/// Приватность и списки доступа меняет только создатель
pub async fn set_access(
    id: Uuid,
    dto: MemorialAccessDto,
    identity: &IdentityId,
) -> anyhow::Result<Memorial> {
    let mut aggregate = get_visible(id, Some(identity)).await?;
    if !can_manage_access(Some(&aggregate), Some(identity)) {
        return Err(DomainError::Forbidden(
            "Настройки доступа может менять только создатель мемориала".into(),
        )
        .into());
    }
    aggregate.apply_access(&dto);
    aggregate.before_write();
    repository::update(&aggregate).await?;
    tracing::info!(
        "Memorial {} access updated: private={}, allowed={}, editors={}",
        aggregate.base.code,
        aggregate.is_private,
        aggregate.allowed_users.len(),
        aggregate.editors_users.len()
    );
    Ok(aggregate)
}

pub async fn set_photo(mut aggregate: Memorial, url: String) -> anyhow::Result<Memorial> {
    aggregate.photo = Some(url);
    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

/// Мягкое удаление: создатель или администратор
pub async fn delete(id: Uuid, identity: &IdentityId, is_admin: bool) -> anyhow::Result<()> {
    let aggregate = if is_admin {
        repository::get_by_id(id).await?.ok_or_else(not_found)?
    } else {
        get_visible(id, Some(identity)).await?
    };
    if !can_delete(Some(&aggregate), Some(identity), is_admin) {
        return Err(DomainError::Forbidden("Удалить мемориал может только создатель".into()).into());
    }
    repository::soft_delete(id).await?;
    tracing::info!("Memorial {} deleted by {}", aggregate.base.code, identity);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::initialize_database;
    use contracts::domain::a001_memorial::aggregate::MemorialAccessDto;

    fn user(raw: &str) -> IdentityId {
        IdentityId::parse(raw).unwrap()
    }

    fn outcome<T>(result: anyhow::Result<T>) -> &'static str {
        match result {
            Ok(_) => "ok",
            Err(e) => match e.downcast_ref::<DomainError>() {
                Some(DomainError::NotFound(_)) => "not_found",
                Some(DomainError::Forbidden(_)) => "forbidden",
                _ => "other",
            },
        }
    }

    fn contains(list: &[Memorial], id: Uuid) -> bool {
        list.iter().any(|m| m.base.id.value() == id)
    }

    // Единственный тест crate, поднимающий глобальное подключение
    #[tokio::test]
    async fn test_private_memorial_access_through_service() {
        let path = std::env::temp_dir().join(format!("memorials-service-{}.db", Uuid::new_v4()));
        initialize_database(Some(&path.to_string_lossy())).await.unwrap();

        let memorial = create(
            MemorialDto {
                full_name: "Сидоров Пётр".into(),
                ..Default::default()
            },
            user("u1"),
        )
        .await
        .unwrap();
        let id = memorial.base.id.value();
        set_access(
            id,
            MemorialAccessDto {
                is_private: true,
                allowed_users: vec!["u2".into()],
                editors_users: vec!["u3".into()],
            },
            &user("u1"),
        )
        .await
        .unwrap();

        assert_eq!(outcome(get_visible(id, None).await), "not_found");
        assert_eq!(outcome(get_visible(id, Some(&user("u4"))).await), "not_found");
        assert_eq!(outcome(get_visible(id, Some(&user("u2"))).await), "ok");
        assert_eq!(outcome(get_visible(id, Some(&user("u3"))).await), "ok");

        assert!(!contains(&list_visible(None).await.unwrap(), id));
        assert!(!contains(&list_visible(Some(&user("u4"))).await.unwrap(), id));
        assert!(contains(&list_visible(Some(&user("u2"))).await.unwrap(), id));

        assert!(contains(&list_editable(&user("u3")).await.unwrap(), id));
        assert!(!contains(&list_editable(&user("u2")).await.unwrap(), id));

        let edit = MemorialDto {
            full_name: "Сидоров Пётр Ильич".into(),
            ..Default::default()
        };
        assert_eq!(outcome(update(id, edit.clone(), &user("u4")).await), "not_found");
        assert_eq!(outcome(update(id, edit.clone(), &user("u2")).await), "forbidden");
        let updated = update(id, edit, &user("u3")).await.unwrap();
        assert_eq!(updated.base.description, "Сидоров Пётр Ильич");
        assert!(updated.is_private);

        let open_up = MemorialAccessDto {
            is_private: false,
            ..Default::default()
        };
        assert_eq!(outcome(set_access(id, open_up, &user("u3")).await), "forbidden");

        assert_eq!(outcome(delete(id, &user("u3"), false).await), "forbidden");
        assert_eq!(outcome(delete(id, &user("admin"), true).await), "ok");
        assert_eq!(outcome(get_visible(id, Some(&user("u1"))).await), "not_found");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_sanitize_strips_scripts() {
        let dto = MemorialDto {
            full_name: "Петров".into(),
            biography: "<p>Жил</p><script>alert(1)</script>".into(),
            ..Default::default()
        };
        let clean = sanitize(&dto);
        assert_eq!(clean.biography, "<p>Жил</p>");
        assert_eq!(clean.full_name, "Петров");
    }
}
