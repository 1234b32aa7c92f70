use contracts::system::auth::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::system::auth::{api, context::{apply_login, use_auth}};

#[component]
pub fn LoginPage() -> impl IntoView {
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (full_name, set_full_name) = signal(String::new());
    let (register_mode, set_register_mode) = signal(false);
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let (_, set_auth_state) = use_auth();
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get();
        let password_val = password.get();
        let full_name_val = Some(full_name.get()).filter(|n| !n.trim().is_empty());
        let registering = register_mode.get();
        let navigate = navigate.clone();

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            let result = if registering {
                api::register(RegisterRequest {
                    username: username_val,
                    password: password_val,
                    email: None,
                    full_name: full_name_val,
                })
                .await
            } else {
                api::login(username_val, password_val).await
            };

            match result {
                Ok(response) => {
                    apply_login(response, set_auth_state);
                    navigate("/", Default::default());
                }
                Err(e) => set_error_message.set(Some(e)),
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h2>{move || if register_mode.get() { "Регистрация" } else { "Вход в систему" }}</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="username">"Логин"</label>
                        <input
                            type="text"
                            id="username"
                            prop:value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Пароль"</label>
                        <input
                            type="password"
                            id="password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <Show when=move || register_mode.get()>
                        <div class="form-group">
                            <label for="full-name">"Имя"</label>
                            <input
                                type="text"
                                id="full-name"
                                prop:value=move || full_name.get()
                                on:input=move |ev| set_full_name.set(event_target_value(&ev))
                            />
                        </div>
                    </Show>

                    <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                        {move || match (is_loading.get(), register_mode.get()) {
                            (true, _) => "Подождите...",
                            (false, true) => "Зарегистрироваться",
                            (false, false) => "Войти",
                        }}
                    </button>
                </form>

                <button
                    class="btn-link"
                    on:click=move |_| set_register_mode.update(|m| *m = !*m)
                >
                    {move || if register_mode.get() { "Уже есть аккаунт" } else { "Создать аккаунт" }}
                </button>
            </div>
        </div>
    }
}
