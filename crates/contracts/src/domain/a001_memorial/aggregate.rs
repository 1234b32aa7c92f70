use crate::domain::common::{
    parse_identity_list, AggregateRoot, BaseAggregate, EntityMetadata, IdentityId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор мемориала
    MemorialId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Мемориал: страница памяти умершего человека
///
/// `base.description` хранит ФИО. Доступ определяется владельцем
/// (`created_by`), флагом приватности и двумя независимыми списками:
/// `allowed_users` (только просмотр) и `editors_users` (редактирование).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memorial {
    #[serde(flatten)]
    pub base: BaseAggregate<MemorialId>,

    #[serde(rename = "birthDate")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "deathDate")]
    pub death_date: Option<NaiveDate>,
    pub biography: String,
    pub epitaph: String,
    pub photo: Option<String>,

    #[serde(rename = "createdBy")]
    pub created_by: IdentityId,
    #[serde(rename = "isPrivate")]
    pub is_private: bool,
    #[serde(rename = "allowedUsers", default)]
    pub allowed_users: Vec<IdentityId>,
    #[serde(rename = "editorsUsers", default)]
    pub editors_users: Vec<IdentityId>,
}

impl Memorial {
    /// Создать новый мемориал для вставки в БД
    pub fn new_for_insert(dto: &MemorialDto, created_by: IdentityId) -> Self {
        let id = MemorialId::new_v4();
        let code = dto
            .code
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| format!("{}-{}", Self::code_prefix(), &id.0.simple().to_string()[..8]));
        let mut base = BaseAggregate::new(id, code, dto.full_name.trim().to_string());
        base.comment = dto.comment.clone();

        Self {
            base,
            birth_date: dto.birth_date,
            death_date: dto.death_date,
            biography: dto.biography.clone(),
            epitaph: dto.epitaph.clone(),
            photo: None,
            created_by,
            is_private: dto.is_private,
            allowed_users: Vec::new(),
            editors_users: Vec::new(),
        }
    }

    /// Обновить содержательные поля из DTO (без прав доступа)
    pub fn update(&mut self, dto: &MemorialDto) {
        if let Some(code) = dto.code.clone().filter(|c| !c.trim().is_empty()) {
            self.base.code = code;
        }
        self.base.description = dto.full_name.trim().to_string();
        self.base.comment = dto.comment.clone();
        self.birth_date = dto.birth_date;
        self.death_date = dto.death_date;
        self.biography = dto.biography.clone();
        self.epitaph = dto.epitaph.clone();
    }

    /// Применить настройки доступа. Создатель не попадает в списки:
    /// его права следуют из `created_by`.
    pub fn apply_access(&mut self, dto: &MemorialAccessDto) {
        self.is_private = dto.is_private;
        self.allowed_users = parse_identity_list(&dto.allowed_users)
            .into_iter()
            .filter(|u| *u != self.created_by)
            .collect();
        self.editors_users = parse_identity_list(&dto.editors_users)
            .into_iter()
            .filter(|u| *u != self.created_by)
            .collect();
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("ФИО не может быть пустым".into());
        }
        if let (Some(birth), Some(death)) = (self.birth_date, self.death_date) {
            if death < birth {
                return Err("Дата смерти не может быть раньше даты рождения".into());
            }
        }
        if self.epitaph.chars().count() > 500 {
            return Err("Эпитафия не должна превышать 500 символов".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.before_write();
    }
}

impl AggregateRoot for Memorial {
    type Id = MemorialId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "memorial"
    }

    fn element_name() -> &'static str {
        "Мемориал"
    }

    fn list_name() -> &'static str {
        "Мемориалы"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления мемориала
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MemorialDto {
    pub id: Option<String>,
    pub code: Option<String>,

    #[serde(rename = "fullName")]
    pub full_name: String,

    #[serde(rename = "birthDate")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "deathDate")]
    pub death_date: Option<NaiveDate>,

    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub epitaph: String,

    /// Учитывается только при создании; дальше меняется через `MemorialAccessDto`
    #[serde(rename = "isPrivate", default)]
    pub is_private: bool,

    pub comment: Option<String>,
}

impl From<&Memorial> for MemorialDto {
    fn from(m: &Memorial) -> Self {
        use crate::domain::common::AggregateId;
        Self {
            id: Some(m.base.id.as_string()),
            code: Some(m.base.code.clone()),
            full_name: m.base.description.clone(),
            birth_date: m.birth_date,
            death_date: m.death_date,
            biography: m.biography.clone(),
            epitaph: m.epitaph.clone(),
            is_private: m.is_private,
            comment: m.base.comment.clone(),
        }
    }
}

/// Настройки доступа к мемориалу (меняет только создатель)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemorialAccessDto {
    #[serde(rename = "isPrivate")]
    pub is_private: bool,
    #[serde(rename = "allowedUsers", default)]
    pub allowed_users: Vec<String>,
    #[serde(rename = "editorsUsers", default)]
    pub editors_users: Vec<String>,
}

/// Тело запроса `{ "memorial": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorialEnvelope {
    pub memorial: MemorialDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(name: &str) -> MemorialDto {
        MemorialDto {
            full_name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_for_insert_generates_code() {
        let owner = IdentityId::parse("u1").unwrap();
        let m = Memorial::new_for_insert(&dto("Иванов Иван"), owner.clone());
        assert!(m.base.code.starts_with("MEM-"));
        assert_eq!(m.created_by, owner);
        assert!(m.allowed_users.is_empty());
    }

    #[test]
    fn test_validate_dates_order() {
        let owner = IdentityId::parse("u1").unwrap();
        let mut m = Memorial::new_for_insert(&dto("Петров"), owner);
        m.birth_date = NaiveDate::from_ymd_opt(1950, 1, 1);
        m.death_date = NaiveDate::from_ymd_opt(1940, 1, 1);
        assert!(m.validate().is_err());
        m.death_date = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_name() {
        let owner = IdentityId::parse("u1").unwrap();
        let m = Memorial::new_for_insert(&dto("   "), owner);
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_apply_access_drops_creator_and_blanks() {
        let owner = IdentityId::parse("u1").unwrap();
        let mut m = Memorial::new_for_insert(&dto("Сидоров"), owner);
        m.apply_access(&MemorialAccessDto {
            is_private: true,
            allowed_users: vec!["u1".into(), "u2".into(), " ".into()],
            editors_users: vec!["u3".into(), "u3".into()],
        });
        assert!(m.is_private);
        assert_eq!(m.allowed_users, vec![IdentityId::parse("u2").unwrap()]);
        assert_eq!(m.editors_users, vec![IdentityId::parse("u3").unwrap()]);
    }
}
