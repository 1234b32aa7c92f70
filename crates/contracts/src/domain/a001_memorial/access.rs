//! Правила доступа к мемориалам
//!
//! Чистые предикаты над данными записи и идентификатором запрашивающего.
//! Отсутствующая запись или анонимный запрос дают `false`; публичная
//! запись видна всем.

use super::aggregate::Memorial;
use crate::domain::common::IdentityId;

/// Может ли субъект редактировать мемориал: создатель или редактор
pub fn can_edit(record: Option<&Memorial>, identity: Option<&IdentityId>) -> bool {
    let (Some(record), Some(identity)) = (record, identity) else {
        return false;
    };
    record.created_by == *identity || record.editors_users.contains(identity)
}

/// Может ли субъект просматривать мемориал
///
/// Редакторы видят запись, даже если их нет в `allowed_users`.
pub fn can_view(record: Option<&Memorial>, identity: Option<&IdentityId>) -> bool {
    let Some(record) = record else {
        return false;
    };
    if !record.is_private {
        return true;
    }
    let Some(identity) = identity else {
        return false;
    };
    record.created_by == *identity
        || record.allowed_users.contains(identity)
        || record.editors_users.contains(identity)
}

/// Удалять мемориал может только создатель или администратор
pub fn can_delete(record: Option<&Memorial>, identity: Option<&IdentityId>, is_admin: bool) -> bool {
    let Some(record) = record else {
        return false;
    };
    if is_admin && identity.is_some() {
        return true;
    }
    matches!(identity, Some(id) if record.created_by == *id)
}

/// Менять приватность и списки доступа может только создатель
pub fn can_manage_access(record: Option<&Memorial>, identity: Option<&IdentityId>) -> bool {
    matches!((record, identity), (Some(r), Some(id)) if r.created_by == *id)
}

/// Отфильтровать записи, видимые субъекту
pub fn visible_to(records: Vec<Memorial>, identity: Option<&IdentityId>) -> Vec<Memorial> {
    records
        .into_iter()
        .filter(|m| can_view(Some(m), identity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_memorial::aggregate::{MemorialAccessDto, MemorialDto};

    fn id(s: &str) -> IdentityId {
        IdentityId::parse(s).unwrap()
    }

    fn memorial(created_by: &str, is_private: bool, allowed: &[&str], editors: &[&str]) -> Memorial {
        let dto = MemorialDto {
            full_name: "Тестовый Мемориал".into(),
            ..Default::default()
        };
        let mut m = Memorial::new_for_insert(&dto, id(created_by));
        m.apply_access(&MemorialAccessDto {
            is_private,
            allowed_users: allowed.iter().map(|s| s.to_string()).collect(),
            editors_users: editors.iter().map(|s| s.to_string()).collect(),
        });
        m
    }

    #[test]
    fn test_public_memorial_visible_to_everyone() {
        let m = memorial("u1", false, &[], &[]);
        for who in ["u1", "u2", "stranger"] {
            assert!(can_view(Some(&m), Some(&id(who))));
        }
        assert!(can_view(Some(&m), None));
    }

    #[test]
    fn test_private_memorial_hidden_from_outsiders() {
        let m = memorial("u1", true, &["u2"], &["u3"]);
        assert!(!can_view(Some(&m), Some(&id("u4"))));
        assert!(!can_view(Some(&m), None));
    }

    #[test]
    fn test_editor_implies_view() {
        let m = memorial("u1", true, &[], &["u3"]);
        assert!(!m.allowed_users.contains(&id("u3")));
        assert!(can_view(Some(&m), Some(&id("u3"))));
    }

    #[test]
    fn test_can_edit_only_creator_and_editors() {
        let m = memorial("u1", true, &["u2"], &["u3"]);
        assert!(can_edit(Some(&m), Some(&id("u1"))));
        assert!(can_edit(Some(&m), Some(&id("u3"))));
        assert!(!can_edit(Some(&m), Some(&id("u2"))));
        assert!(!can_edit(Some(&m), Some(&id("u4"))));
        assert!(!can_edit(Some(&m), None));
    }

    #[test]
    fn test_scenario_private_with_lists() {
        let m = memorial("u1", true, &["u2"], &["u3"]);
        assert!(can_view(Some(&m), Some(&id("u2"))));
        assert!(can_view(Some(&m), Some(&id("u3"))));
        assert!(!can_view(Some(&m), Some(&id("u4"))));
        assert!(!can_edit(Some(&m), Some(&id("u2"))));
        assert!(can_edit(Some(&m), Some(&id("u3"))));
    }

    #[test]
    fn test_creator_always_views_and_edits() {
        let m = memorial("u1", true, &[], &[]);
        assert!(can_view(Some(&m), Some(&id("u1"))));
        assert!(can_edit(Some(&m), Some(&id("u1"))));
    }

    #[test]
    fn test_absent_record_or_malformed_identity() {
        let m = memorial("u1", true, &["u2"], &[]);
        assert!(!can_view(None, Some(&id("u1"))));
        assert!(!can_edit(None, Some(&id("u1"))));
        let malformed = IdentityId::parse("  ");
        assert!(!can_view(Some(&m), malformed.as_ref()));
        assert!(!can_edit(Some(&m), malformed.as_ref()));
    }

    #[test]
    fn test_can_delete_creator_or_admin() {
        let m = memorial("u1", true, &[], &["u3"]);
        assert!(can_delete(Some(&m), Some(&id("u1")), false));
        assert!(!can_delete(Some(&m), Some(&id("u3")), false));
        assert!(can_delete(Some(&m), Some(&id("admin")), true));
        assert!(!can_delete(Some(&m), None, true));
    }

    #[test]
    fn test_manage_access_only_creator() {
        let m = memorial("u1", true, &[], &["u3"]);
        assert!(can_manage_access(Some(&m), Some(&id("u1"))));
        assert!(!can_manage_access(Some(&m), Some(&id("u3"))));
    }

    #[test]
    fn test_visible_to_filters_private_records() {
        let records = vec![
            memorial("u1", false, &[], &[]),
            memorial("u1", true, &["u2"], &[]),
            memorial("u5", true, &[], &[]),
        ];
        assert_eq!(visible_to(records.clone(), Some(&id("u2"))).len(), 2);
        assert_eq!(visible_to(records.clone(), None).len(), 1);
        assert_eq!(visible_to(records, Some(&id("u5"))).len(), 2);
    }
}
