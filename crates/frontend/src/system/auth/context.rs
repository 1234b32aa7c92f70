use contracts::domain::common::IdentityId;
use contracts::system::auth::{LoginResponse, UserInfo};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

impl AuthState {
    pub fn identity(&self) -> Option<IdentityId> {
        self.user_info.as_ref().and_then(UserInfo::identity)
    }

    pub fn is_admin(&self) -> bool {
        self.user_info.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::default());

    // Restore the session from localStorage on mount
    Effect::new(move |_| {
        spawn_local(async move {
            if storage::get_access_token().is_none() {
                return;
            }
            if let Ok(user_info) = api::get_current_user().await {
                set_auth_state.set(AuthState {
                    access_token: storage::get_access_token(),
                    user_info: Some(user_info),
                });
                return;
            }

            // Token invalid, try refresh
            let Some(refresh_token) = storage::get_refresh_token() else {
                storage::clear_tokens();
                return;
            };
            match api::refresh_token(refresh_token).await {
                Ok(response) => {
                    storage::save_access_token(&response.access_token);
                    if let Ok(user_info) = api::get_current_user().await {
                        set_auth_state.set(AuthState {
                            access_token: Some(response.access_token),
                            user_info: Some(user_info),
                        });
                    }
                }
                Err(e) => {
                    log::info!("Session expired: {}", e);
                    storage::clear_tokens();
                }
            }
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Сохранить токены и обновить состояние после входа или регистрации
pub fn apply_login(response: LoginResponse, set_auth_state: WriteSignal<AuthState>) {
    storage::save_access_token(&response.access_token);
    storage::save_refresh_token(&response.refresh_token);
    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
    });
}

/// Helper: Perform logout
pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("Logout request failed: {}", e);
        }
    }
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
