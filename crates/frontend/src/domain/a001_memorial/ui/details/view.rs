use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use super::view_model::MemorialDetailsViewModel;
use crate::shared::date_utils::format_life_span;
use crate::system::auth::context::use_auth;

#[component]
pub fn MemorialDetails() -> impl IntoView {
    let params = use_params_map();
    let id = move || params.read().get("id").unwrap_or_default();

    let vm = MemorialDetailsViewModel::new();
    let (auth_state, _) = use_auth();

    Effect::new(move |_| {
        let id = id();
        auth_state.track();
        vm.load(id);
    });

    view! {
        <section class="memorial-details">
            {move || vm.error.get().map(|e| view! { <div class="error-message">{e}</div> })}
            {move || vm.memorial.get().map(|m| view! {
                <article>
                    {m.photo.clone().map(|src| view! { <img class="memorial-photo" src=src alt="" /> })}
                    <h1>{m.base.description.clone()}</h1>
                    <div class="memorial-years">{format_life_span(m.birth_date, m.death_date)}</div>
                    <blockquote class="epitaph">{m.epitaph.clone()}</blockquote>
                    <div class="biography" inner_html=m.biography.clone()></div>
                </article>
            })}
            <Show when=move || vm.can_edit(&auth_state.get())>
                <MemorialEditForm vm=vm />
            </Show>
            <Show when=move || vm.can_manage_access(&auth_state.get())>
                <MemorialAccessForm vm=vm />
            </Show>
            <Show when=move || vm.can_delete(&auth_state.get())>
                <DeleteButton vm=vm />
            </Show>
        </section>
    }
}

#[component]
fn MemorialEditForm(vm: MemorialDetailsViewModel) -> impl IntoView {
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        vm.save_command();
    };

    view! {
        <form class="memorial-edit" on:submit=on_submit>
            <h2>"Редактирование"</h2>
            <label>"ФИО"
                <input type="text" prop:value=move || vm.form.get().full_name
                    on:input=move |ev| vm.form.update(|f| f.full_name = event_target_value(&ev)) required />
            </label>
            <label>"Дата рождения"
                <input type="date" prop:value=move || vm.birth.get()
                    on:input=move |ev| vm.birth.set(event_target_value(&ev)) />
            </label>
            <label>"Дата смерти"
                <input type="date" prop:value=move || vm.death.get()
                    on:input=move |ev| vm.death.set(event_target_value(&ev)) />
            </label>
            <label>"Эпитафия"
                <input type="text" prop:value=move || vm.form.get().epitaph
                    on:input=move |ev| vm.form.update(|f| f.epitaph = event_target_value(&ev)) />
            </label>
            <label>"Биография"
                <textarea prop:value=move || vm.form.get().biography
                    on:input=move |ev| vm.form.update(|f| f.biography = event_target_value(&ev))></textarea>
            </label>
            <button type="submit" class="btn-primary">"Сохранить"</button>
            {move || vm.edit_message.get().map(|m| view! { <div class="form-message">{m}</div> })}
        </form>
    }
}

#[component]
fn MemorialAccessForm(vm: MemorialDetailsViewModel) -> impl IntoView {
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        vm.save_access_command();
    };

    view! {
        <form class="memorial-access" on:submit=on_submit>
            <h2>"Доступ"</h2>
            <label>
                <input type="checkbox" prop:checked=move || vm.is_private.get()
                    on:change=move |ev| vm.is_private.set(event_target_checked(&ev)) />
                "Закрытый мемориал"
            </label>
            <label>"Могут просматривать (через запятую)"
                <textarea prop:value=move || vm.allowed.get()
                    on:input=move |ev| vm.allowed.set(event_target_value(&ev))></textarea>
            </label>
            <label>"Могут редактировать (через запятую)"
                <textarea prop:value=move || vm.editors.get()
                    on:input=move |ev| vm.editors.set(event_target_value(&ev))></textarea>
            </label>
            <button type="submit" class="btn-primary">"Сохранить доступ"</button>
            {move || vm.access_message.get().map(|m| view! { <div class="form-message">{m}</div> })}
        </form>
    }
}

#[component]
fn DeleteButton(vm: MemorialDetailsViewModel) -> impl IntoView {
    let navigate = use_navigate();

    let on_click = move |_| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Удалить мемориал?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let navigate = navigate.clone();
        vm.delete_command(move || navigate("/", Default::default()));
    };

    view! {
        <button class="btn-danger" on:click=on_click>"Удалить мемориал"</button>
    }
}
