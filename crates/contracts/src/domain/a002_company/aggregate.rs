use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata, IdentityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор компании
    CompanyId
);

// ============================================================================
// Enums
// ============================================================================

/// Видимость карточки компании
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    #[default]
    Active,
    Hidden,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Hidden => "hidden",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "hidden" => Self::Hidden,
            _ => Self::Active,
        }
    }
}

// ============================================================================
// Embedded collections
// ============================================================================

/// Документ компании (лицензия, сертификат, прайс)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyDocument {
    pub title: String,
    pub url: String,
    #[serde(rename = "uploadedAt", default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Фото в галерее компании
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryItem {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Отзыв о компании
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyReview {
    pub id: String,
    pub author: IdentityId,
    #[serde(rename = "authorName")]
    pub author_name: Option<String>,
    pub rating: u8,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Компания (ритуальное агентство, мастерская)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(flatten)]
    pub base: BaseAggregate<CompanyId>,

    pub owner: IdentityId,
    pub status: CompanyStatus,
    pub about: String,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: String,
    pub logo: Option<String>,

    #[serde(default)]
    pub documents: Vec<CompanyDocument>,
    #[serde(default)]
    pub gallery: Vec<GalleryItem>,
    #[serde(default)]
    pub reviews: Vec<CompanyReview>,
}

impl Company {
    /// Создать новую компанию для вставки в БД
    pub fn new_for_insert(dto: &CompanyDto, owner: IdentityId) -> Self {
        let id = CompanyId::new_v4();
        let code = dto
            .code
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| format!("{}-{}", Self::code_prefix(), &id.0.simple().to_string()[..8]));
        let mut company = Self {
            base: BaseAggregate::new(id, code, String::new()),
            owner,
            status: CompanyStatus::Active,
            about: String::new(),
            phone: String::new(),
            email: None,
            website: None,
            address: String::new(),
            logo: None,
            documents: Vec::new(),
            gallery: Vec::new(),
            reviews: Vec::new(),
        };
        company.update(dto);
        company
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &CompanyDto) {
        if let Some(code) = dto.code.clone().filter(|c| !c.trim().is_empty()) {
            self.base.code = code;
        }
        self.base.description = dto.name.trim().to_string();
        self.base.comment = dto.comment.clone();
        self.about = dto.about.clone();
        self.phone = dto.phone.trim().to_string();
        self.email = dto.email.clone().filter(|e| !e.trim().is_empty());
        self.website = dto.website.clone().filter(|w| !w.trim().is_empty());
        self.address = dto.address.clone();
        if let Some(status) = dto.status {
            self.status = status;
        }
    }

    /// Владелец или администратор
    pub fn can_manage(&self, identity: Option<&IdentityId>, is_admin: bool) -> bool {
        match identity {
            Some(id) => is_admin || self.owner == *id,
            None => false,
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Название компании не может быть пустым".into());
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err("Некорректный email".into());
            }
        }
        for doc in &self.documents {
            if doc.title.trim().is_empty() || doc.url.trim().is_empty() {
                return Err("У документа должны быть название и ссылка".into());
            }
        }
        if self.gallery.iter().any(|g| g.url.trim().is_empty()) {
            return Err("У фото галереи должна быть ссылка".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.before_write();
    }
}

impl AggregateRoot for Company {
    type Id = CompanyId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "company"
    }

    fn element_name() -> &'static str {
        "Компания"
    }

    fn list_name() -> &'static str {
        "Компании"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления компании
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompanyDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub address: String,
    pub status: Option<CompanyStatus>,
    pub comment: Option<String>,
}

/// Тело запроса `{ "company": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyEnvelope {
    pub company: CompanyDto,
}

/// Тело запроса `{ "documents": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsEnvelope {
    pub documents: Vec<CompanyDocument>,
}

/// Тело запроса `{ "gallery": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryEnvelope {
    pub gallery: Vec<GalleryItem>,
}

/// Новый отзыв
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDto {
    pub rating: u8,
    pub text: String,
    #[serde(rename = "authorName")]
    pub author_name: Option<String>,
}

impl ReviewDto {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err("Оценка должна быть от 1 до 5".into());
        }
        if self.text.trim().is_empty() {
            return Err("Текст отзыва не может быть пустым".into());
        }
        Ok(())
    }
}

/// Тело запроса `{ "review": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEnvelope {
    pub review: ReviewDto,
}

/// Ответ на загрузку файла
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> IdentityId {
        IdentityId::parse("owner-1").unwrap()
    }

    #[test]
    fn test_new_company_defaults() {
        let dto = CompanyDto {
            name: " Гранит-Мастер ".into(),
            email: Some("".into()),
            ..Default::default()
        };
        let c = Company::new_for_insert(&dto, owner());
        assert_eq!(c.base.description, "Гранит-Мастер");
        assert!(c.base.code.starts_with("COM-"));
        assert_eq!(c.status, CompanyStatus::Active);
        assert!(c.email.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_can_manage() {
        let c = Company::new_for_insert(
            &CompanyDto {
                name: "А".into(),
                ..Default::default()
            },
            owner(),
        );
        assert!(c.can_manage(Some(&owner()), false));
        let other = IdentityId::parse("x").unwrap();
        assert!(!c.can_manage(Some(&other), false));
        assert!(c.can_manage(Some(&other), true));
        assert!(!c.can_manage(None, true));
    }

    #[test]
    fn test_validate_documents() {
        let mut c = Company::new_for_insert(
            &CompanyDto {
                name: "Б".into(),
                ..Default::default()
            },
            owner(),
        );
        c.documents.push(CompanyDocument {
            title: "".into(),
            url: "/uploads/1.pdf".into(),
            uploaded_at: None,
        });
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_review_rating_range() {
        let mut r = ReviewDto {
            rating: 0,
            text: "Спасибо".into(),
            author_name: None,
        };
        assert!(r.validate().is_err());
        r.rating = 5;
        assert!(r.validate().is_ok());
        r.rating = 6;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&CompanyStatus::Hidden).unwrap(), "\"hidden\"");
        assert_eq!(CompanyStatus::from_db("hidden"), CompanyStatus::Hidden);
        assert_eq!(CompanyStatus::from_db("???"), CompanyStatus::Active);
    }
}
