use contracts::domain::a001_memorial::{Memorial, MemorialDto, MemorialEnvelope};
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::shared::api_utils::{get_json, post_json};
use crate::shared::date_utils::format_life_span;
use crate::system::auth::context::use_auth;

#[derive(Clone, Debug)]
pub struct MemorialRow {
    pub id: String,
    pub full_name: String,
    pub years: String,
    pub photo: Option<String>,
    pub is_private: bool,
}

impl From<Memorial> for MemorialRow {
    fn from(m: Memorial) -> Self {
        Self {
            id: m.base.id.as_string(),
            years: format_life_span(m.birth_date, m.death_date),
            full_name: m.base.description,
            photo: m.photo,
            is_private: m.is_private,
        }
    }
}

#[component]
pub fn MemorialList() -> impl IntoView {
    let (items, set_items) = signal::<Vec<MemorialRow>>(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (auth_state, _) = use_auth();

    // Перезагрузка при входе/выходе: состав видимых мемориалов зависит от пользователя
    Effect::new(move |_| {
        auth_state.track();
        spawn_local(async move {
            match get_json::<Vec<Memorial>>("/api/memorials").await {
                Ok(v) => {
                    set_items.set(v.into_iter().map(Into::into).collect());
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    view! {
        <section class="memorial-list">
            <h1>"Мемориалы"</h1>
            <Show when=move || auth_state.get().access_token.is_some()>
                <NewMemorialForm />
            </Show>
            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}
            <ul class="cards">
                <For
                    each=move || items.get()
                    key=|row| row.id.clone()
                    children=move |row| {
                        let href = format!("/memorials/{}", row.id);
                        view! {
                            <li class="card">
                                {row.photo.clone().map(|src| view! { <img class="card-photo" src=src alt="" /> })}
                                <A href=href>{row.full_name.clone()}</A>
                                <div class="card-years">{row.years.clone()}</div>
                                {row.is_private.then(|| view! { <span class="badge">"Закрытый"</span> })}
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}

/// Короткая форма: ФИО и приватность, остальное заполняется на странице мемориала
#[component]
fn NewMemorialForm() -> impl IntoView {
    let (full_name, set_full_name) = signal(String::new());
    let (is_private, set_is_private) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let body = MemorialEnvelope {
            memorial: MemorialDto {
                full_name: full_name.get(),
                is_private: is_private.get(),
                ..Default::default()
            },
        };
        let navigate = navigate.clone();
        spawn_local(async move {
            match post_json::<_, Memorial>("/api/memorials", &body).await {
                Ok(created) => {
                    navigate(&format!("/memorials/{}", created.base.id.as_string()), Default::default())
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <form class="inline-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="ФИО"
                prop:value=move || full_name.get()
                on:input=move |ev| set_full_name.set(event_target_value(&ev))
                required
            />
            <label>
                <input
                    type="checkbox"
                    prop:checked=move || is_private.get()
                    on:change=move |ev| set_is_private.set(event_target_checked(&ev))
                />
                "Закрытый"
            </label>
            <button type="submit" class="btn-primary">"Создать мемориал"</button>
            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}
        </form>
    }
}
