use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::system::auth::context::{do_logout, use_auth};

#[component]
pub fn Header() -> impl IntoView {
    let (auth_state, set_auth_state) = use_auth();

    let user_name = move || {
        auth_state.get().user_info.map(|u| u.full_name.unwrap_or(u.username))
    };

    view! {
        <header class="top-header">
            <nav>
                <A href="/">"Мемориалы"</A>
                <A href="/companies">"Компании"</A>
                <A href="/pages">"Новости"</A>
                <A href="/report">"Жалоба"</A>
            </nav>
            <div class="user-box">
                {move || match user_name() {
                    Some(name) => view! {
                        <span class="user-name">{name}</span>
                        <button
                            class="btn-link"
                            on:click=move |_| spawn_local(do_logout(set_auth_state))
                        >
                            "Выйти"
                        </button>
                    }
                    .into_any(),
                    None => view! { <A href="/login">"Войти"</A> }.into_any(),
                }}
            </div>
        </header>
    }
}
