use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata, IdentityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор жалобы
    ReportId
);

/// На что жалуются
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTarget {
    Memorial,
    Company,
    Product,
    Page,
}

impl ReportTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memorial => "memorial",
            Self::Company => "company",
            Self::Product => "product",
            Self::Page => "page",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "memorial" => Some(Self::Memorial),
            "company" => Some(Self::Company),
            "product" => Some(Self::Product),
            "page" => Some(Self::Page),
            _ => None,
        }
    }
}

/// Статус рассмотрения жалобы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Open,
    Closed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "closed" => Self::Closed,
            _ => Self::Open,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Жалоба на контент для модерации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(flatten)]
    pub base: BaseAggregate<ReportId>,

    #[serde(rename = "targetKind")]
    pub target_kind: ReportTarget,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub details: String,
    pub reporter: Option<IdentityId>,
    pub status: ReportStatus,
    pub resolution: Option<String>,
    #[serde(rename = "resolvedBy")]
    pub resolved_by: Option<IdentityId>,
    #[serde(rename = "resolvedAt")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Создать новую жалобу
    pub fn new_for_insert(dto: &ReportDto, reporter: Option<IdentityId>) -> Self {
        let id = ReportId::new_v4();
        let code = format!("{}-{}", Self::code_prefix(), &id.0.simple().to_string()[..8]);
        Self {
            base: BaseAggregate::new(id, code, dto.reason.trim().to_string()),
            target_kind: dto.target_kind,
            target_id: dto.target_id.trim().to_string(),
            details: dto.details.clone(),
            reporter,
            status: ReportStatus::Open,
            resolution: None,
            resolved_by: None,
            resolved_at: None,
        }
    }

    pub fn reason(&self) -> &str {
        &self.base.description
    }

    /// Применить решение модератора
    pub fn apply_patch(&mut self, patch: &ReportPatch, moderator: &IdentityId) {
        if let Some(resolution) = &patch.resolution {
            self.resolution = Some(resolution.clone()).filter(|r| !r.trim().is_empty());
        }
        if let Some(status) = patch.status {
            match (self.status, status) {
                (ReportStatus::Open, ReportStatus::Closed) => {
                    self.resolved_by = Some(moderator.clone());
                    self.resolved_at = Some(Utc::now());
                }
                (ReportStatus::Closed, ReportStatus::Open) => {
                    self.resolved_by = None;
                    self.resolved_at = None;
                }
                _ => {}
            }
            self.status = status;
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.is_empty() {
            return Err("Укажите причину жалобы".into());
        }
        if self.target_id.is_empty() {
            return Err("Не указан объект жалобы".into());
        }
        if self.details.chars().count() > 2000 {
            return Err("Описание не должно превышать 2000 символов".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.before_write();
    }
}

impl AggregateRoot for Report {
    type Id = ReportId;

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
        "a006"
    }

    fn collection_name() -> &'static str {
        "report"
    }

    fn element_name() -> &'static str {
        "Жалоба"
    }

    fn list_name() -> &'static str {
        "Жалобы"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO новой жалобы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDto {
    #[serde(rename = "targetKind")]
    pub target_kind: ReportTarget,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub reason: String,
    #[serde(default)]
    pub details: String,
}

/// Тело запроса `{ "report": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub report: ReportDto,
}

/// Частичное обновление жалобы модератором
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportPatch {
    pub status: Option<ReportStatus>,
    pub resolution: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        Report::new_for_insert(
            &ReportDto {
                target_kind: ReportTarget::Memorial,
                target_id: " 42 ".into(),
                reason: "Оскорбительный текст".into(),
                details: String::new(),
            },
            None,
        )
    }

    #[test]
    fn test_new_report_is_open() {
        let r = report();
        assert_eq!(r.status, ReportStatus::Open);
        assert_eq!(r.target_id, "42");
        assert!(r.validate().is_ok());
        assert!(r.base.code.starts_with("REP-"));
    }

    #[test]
    fn test_close_and_reopen() {
        let mut r = report();
        let moderator = IdentityId::parse("admin").unwrap();
        r.apply_patch(
            &ReportPatch {
                status: Some(ReportStatus::Closed),
                resolution: Some("Текст удалён".into()),
            },
            &moderator,
        );
        assert_eq!(r.status, ReportStatus::Closed);
        assert_eq!(r.resolved_by.as_ref(), Some(&moderator));
        assert!(r.resolved_at.is_some());

        r.apply_patch(
            &ReportPatch {
                status: Some(ReportStatus::Open),
                resolution: None,
            },
            &moderator,
        );
        assert!(r.resolved_by.is_none());
        assert_eq!(r.resolution.as_deref(), Some("Текст удалён"));
    }

    #[test]
    fn test_target_kind_roundtrip_names() {
        for t in [
            ReportTarget::Memorial,
            ReportTarget::Company,
            ReportTarget::Product,
            ReportTarget::Page,
        ] {
            assert_eq!(ReportTarget::from_db(t.as_str()), Some(t));
        }
        assert_eq!(ReportTarget::from_db("user"), None);
    }
}
