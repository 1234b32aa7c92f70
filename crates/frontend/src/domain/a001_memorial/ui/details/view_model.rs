use contracts::domain::a001_memorial::{
    can_delete, can_edit, can_manage_access, Memorial, MemorialAccessDto, MemorialDto,
    MemorialEnvelope,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_utils::{delete, get_json, put_json};
use crate::shared::date_utils::parse_input_date;
use crate::system::auth::context::AuthState;

/// Список идентификаторов из поля ввода: через запятую или с новой строки
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list<T: ToString>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// DTO для сохранения: даты приходят из `<input type="date">` строками
pub fn edit_dto(form: &MemorialDto, birth: &str, death: &str) -> MemorialDto {
    MemorialDto {
        birth_date: parse_input_date(birth),
        death_date: parse_input_date(death),
        ..form.clone()
    }
}

/// Состояние карточки мемориала, формы редактирования и формы доступа
#[derive(Clone, Copy)]
pub struct MemorialDetailsViewModel {
    pub memorial: RwSignal<Option<Memorial>>,
    pub error: RwSignal<Option<String>>,

    pub form: RwSignal<MemorialDto>,
    pub birth: RwSignal<String>,
    pub death: RwSignal<String>,
    pub edit_message: RwSignal<Option<String>>,

    pub is_private: RwSignal<bool>,
    pub allowed: RwSignal<String>,
    pub editors: RwSignal<String>,
    pub access_message: RwSignal<Option<String>>,
}

impl MemorialDetailsViewModel {
    pub fn new() -> Self {
        Self {
            memorial: RwSignal::new(None),
            error: RwSignal::new(None),
            form: RwSignal::new(MemorialDto::default()),
            birth: RwSignal::new(String::new()),
            death: RwSignal::new(String::new()),
            edit_message: RwSignal::new(None),
            is_private: RwSignal::new(false),
            allowed: RwSignal::new(String::new()),
            editors: RwSignal::new(String::new()),
            access_message: RwSignal::new(None),
        }
    }

    fn fill(&self, memorial: Memorial) {
        let dto = MemorialDto::from(&memorial);
        self.birth
            .set(dto.birth_date.map(|d| d.to_string()).unwrap_or_default());
        self.death
            .set(dto.death_date.map(|d| d.to_string()).unwrap_or_default());
        self.form.set(dto);
        self.is_private.set(memorial.is_private);
        self.allowed.set(join_list(&memorial.allowed_users));
        self.editors.set(join_list(&memorial.editors_users));
        self.memorial.set(Some(memorial));
    }

    fn url(&self, suffix: &str) -> String {
        let id = self.form.with_untracked(|f| f.id.clone()).unwrap_or_default();
        format!("/api/memorials/{}{}", id, suffix)
    }

    pub fn load(&self, id: String) {
        let vm = *self;
        spawn_local(async move {
            match get_json::<Memorial>(&format!("/api/memorials/{}", id)).await {
                Ok(m) => {
                    vm.fill(m);
                    vm.error.set(None);
                }
                Err(e) => {
                    vm.memorial.set(None);
                    vm.error.set(Some(e));
                }
            }
        });
    }

    // Права считаются на клиенте тем же правилом, что и на сервере
    pub fn can_edit(&self, auth: &AuthState) -> bool {
        let identity = auth.identity();
        self.memorial.with(|m| can_edit(m.as_ref(), identity.as_ref()))
    }

    pub fn can_manage_access(&self, auth: &AuthState) -> bool {
        let identity = auth.identity();
        self.memorial
            .with(|m| can_manage_access(m.as_ref(), identity.as_ref()))
    }

    pub fn can_delete(&self, auth: &AuthState) -> bool {
        let identity = auth.identity();
        self.memorial
            .with(|m| can_delete(m.as_ref(), identity.as_ref(), auth.is_admin()))
    }

    pub fn save_command(&self) {
        let vm = *self;
        let memorial = edit_dto(
            &self.form.get_untracked(),
            &self.birth.get_untracked(),
            &self.death.get_untracked(),
        );
        let body = MemorialEnvelope { memorial };
        let url = self.url("");
        spawn_local(async move {
            match put_json::<_, Memorial>(&url, &body).await {
                Ok(saved) => {
                    vm.fill(saved);
                    vm.edit_message.set(Some("Сохранено".into()));
                }
                Err(e) => vm.edit_message.set(Some(e)),
            }
        });
    }

    pub fn save_access_command(&self) {
        let vm = *self;
        let body = MemorialAccessDto {
            is_private: self.is_private.get_untracked(),
            allowed_users: split_list(&self.allowed.get_untracked()),
            editors_users: split_list(&self.editors.get_untracked()),
        };
        let url = self.url("/access");
        spawn_local(async move {
            match put_json::<_, Memorial>(&url, &body).await {
                Ok(saved) => {
                    vm.fill(saved);
                    vm.access_message.set(Some("Доступ обновлён".into()));
                }
                Err(e) => vm.access_message.set(Some(e)),
            }
        });
    }

    pub fn delete_command(&self, on_deleted: impl Fn() + 'static) {
        let vm = *self;
        let url = self.url("");
        spawn_local(async move {
            match delete(&url).await {
                Ok(()) => on_deleted(),
                Err(e) => vm.error.set(Some(e)),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" u1, u2\nu3 ,,"), vec!["u1", "u2", "u3"]);
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_join_list_roundtrips_through_split() {
        let joined = join_list(&["u2", "u3"]);
        assert_eq!(joined, "u2, u3");
        assert_eq!(split_list(&joined), vec!["u2", "u3"]);
    }

    #[test]
    fn test_edit_dto_parses_dates() {
        let form = MemorialDto {
            full_name: "Сидоров Пётр".into(),
            birth_date: NaiveDate::from_ymd_opt(1900, 1, 1),
            ..Default::default()
        };
        let dto = edit_dto(&form, "1931-05-09", "");
        assert_eq!(dto.full_name, "Сидоров Пётр");
        assert_eq!(dto.birth_date, NaiveDate::from_ymd_opt(1931, 5, 9));
        assert_eq!(dto.death_date, None);
    }
}
