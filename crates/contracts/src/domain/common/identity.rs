use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Канонический идентификатор пользователя (субъекта доступа)
///
/// Строка id пользователя без окружающих пробелов. Пустое значение
/// не является идентификатором: `parse` возвращает `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Идентификаторы пользователей выдаются как UUID
impl From<uuid::Uuid> for IdentityId {
    fn from(id: uuid::Uuid) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for IdentityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        IdentityId::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom("identity must not be empty"))
    }
}

/// Разбирает список идентификаторов, отбрасывая пустые и дубликаты
pub fn parse_identity_list<I, S>(raw: I) -> Vec<IdentityId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<IdentityId> = Vec::new();
    for item in raw {
        if let Some(id) = IdentityId::parse(item.as_ref()) {
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_rejects_empty() {
        assert_eq!(IdentityId::parse("  u1 ").unwrap().as_str(), "u1");
        assert!(IdentityId::parse("").is_none());
        assert!(IdentityId::parse("   ").is_none());
    }

    #[test]
    fn test_parse_identity_list_dedups() {
        let ids = parse_identity_list(["u1", " u1", "", "u2"]);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1].as_str(), "u2");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<IdentityId>("\"\"").is_err());
        let id: IdentityId = serde_json::from_str("\" u7 \"").unwrap();
        assert_eq!(id.as_str(), "u7");
    }
}
