use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор страницы
    PageId
);

/// Вид страницы: новость или статическая страница
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    News,
    #[default]
    Page,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Page => "page",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "news" => Self::News,
            _ => Self::Page,
        }
    }
}

/// Статус публикации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Published,
    #[default]
    Draft,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "published" => Self::Published,
            _ => Self::Draft,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Страница сайта (новость, «О проекте», правила)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(flatten)]
    pub base: BaseAggregate<PageId>,

    pub slug: String,
    pub content: String,
    pub kind: PageKind,
    pub status: PageStatus,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Page {
    /// Создать новую страницу для вставки в БД
    pub fn new_for_insert(dto: &PageDto) -> Self {
        let id = PageId::new_v4();
        let code = format!("{}-{}", Self::code_prefix(), &id.0.simple().to_string()[..8]);
        let mut page = Self {
            base: BaseAggregate::new(id, code, String::new()),
            slug: String::new(),
            content: String::new(),
            kind: PageKind::Page,
            status: PageStatus::Draft,
            published_at: None,
        };
        page.update(dto);
        page
    }

    /// Обновить данные из DTO. Дата публикации ставится при первом переходе
    /// в `published`.
    pub fn update(&mut self, dto: &PageDto) {
        self.base.description = dto.title.trim().to_string();
        self.slug = dto
            .slug
            .clone()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_else(|| slugify(&dto.title));
        self.content = dto.content.clone();
        self.kind = dto.kind;
        self.status = dto.status;
        if self.status == PageStatus::Published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published && !self.base.metadata.is_deleted
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.is_empty() {
            return Err("Заголовок не может быть пустым".into());
        }
        if self.slug.is_empty()
            || !self
                .slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err("Адрес страницы может содержать только латиницу, цифры и дефис".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.before_write();
    }
}

impl AggregateRoot for Page {
    type Id = PageId;

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
        "a005"
    }

    fn collection_name() -> &'static str {
        "page"
    }

    fn element_name() -> &'static str {
        "Страница"
    }

    fn list_name() -> &'static str {
        "Страницы"
    }
}

/// Транслитерация заголовка в адрес страницы
pub fn slugify(title: &str) -> String {
    let mut out = String::new();
    for ch in title.trim().to_lowercase().chars() {
        let part: &str = match ch {
            'а' => "a",
            'б' => "b",
            'в' => "v",
            'г' => "g",
            'д' => "d",
            'е' | 'ё' | 'э' => "e",
            'ж' => "zh",
            'з' => "z",
            'и' | 'й' => "i",
            'к' => "k",
            'л' => "l",
            'м' => "m",
            'н' => "n",
            'о' => "o",
            'п' => "p",
            'р' => "r",
            'с' => "s",
            'т' => "t",
            'у' => "u",
            'ф' => "f",
            'х' => "h",
            'ц' => "ts",
            'ч' => "ch",
            'ш' => "sh",
            'щ' => "sch",
            'ы' => "y",
            'ю' => "yu",
            'я' => "ya",
            'ъ' | 'ь' => "",
            c if c.is_ascii_alphanumeric() => {
                out.push(c);
                continue;
            }
            _ => "-",
        };
        out.push_str(part);
    }
    let mut slug = String::with_capacity(out.len());
    for ch in out.chars() {
        if ch == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(ch);
    }
    slug.trim_end_matches('-').to_string()
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления страницы
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageDto {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub kind: PageKind,
    #[serde(default)]
    pub status: PageStatus,
}

/// Тело запроса `{ "page": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEnvelope {
    pub page: PageDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_cyrillic() {
        assert_eq!(slugify("О проекте"), "o-proekte");
        assert_eq!(slugify("  Новости 2025!  "), "novosti-2025");
        assert_eq!(slugify("Щёлково — память"), "schelkovo-pamyat");
    }

    #[test]
    fn test_publish_sets_date_once() {
        let mut page = Page::new_for_insert(&PageDto {
            title: "Правила".into(),
            ..Default::default()
        });
        assert!(page.published_at.is_none());
        assert_eq!(page.slug, "pravila");

        let dto = PageDto {
            title: "Правила".into(),
            status: PageStatus::Published,
            ..Default::default()
        };
        page.update(&dto);
        let first = page.published_at;
        assert!(first.is_some());
        page.update(&dto);
        assert_eq!(page.published_at, first);
        assert!(page.is_published());
    }

    #[test]
    fn test_validate_slug() {
        let mut page = Page::new_for_insert(&PageDto {
            title: "Контакты".into(),
            slug: Some("contacts".into()),
            ..Default::default()
        });
        assert!(page.validate().is_ok());
        page.slug = "bad slug".into();
        assert!(page.validate().is_err());
    }
}
