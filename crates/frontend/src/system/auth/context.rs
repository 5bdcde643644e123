use contracts::shared::config::ConsoleConfig;
use contracts::system::auth::{CurrentUser, UserInfo};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};
use crate::shared::api_utils::{api_base, ApiContext};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

impl AuthState {
    /// The user actions are performed for, once logged in
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.user_info.as_ref().map(CurrentUser::from)
    }

    pub fn api_context(&self, config: &ConsoleConfig) -> ApiContext {
        ApiContext::new(config.api.port, self.access_token.clone())
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(config: ConsoleConfig, children: ChildrenFn) -> impl IntoView {
    let auth_state = RwSignal::new(AuthState::default());
    let base_url = api_base(config.api.port);

    // Try to restore session from localStorage on mount
    Effect::new(move |_| {
        let base_url = base_url.clone();
        spawn_local(async move {
            let Some(access_token) = storage::get_access_token() else {
                return;
            };
            // Validate token by fetching current user
            match api::get_current_user(&base_url, &access_token).await {
                Ok(user_info) => {
                    auth_state.set(AuthState {
                        access_token: Some(access_token),
                        user_info: Some(user_info),
                    });
                }
                Err(e) => {
                    log::debug!("Stored access token rejected: {}", e);
                    // Token invalid, try refresh
                    let Some(refresh_token) = storage::get_refresh_token() else {
                        storage::clear_tokens();
                        return;
                    };
                    match api::refresh_token(&base_url, refresh_token).await {
                        Ok(response) => {
                            storage::save_access_token(&response.access_token);

                            // Get user info with new token
                            if let Ok(user_info) =
                                api::get_current_user(&base_url, &response.access_token).await
                            {
                                auth_state.set(AuthState {
                                    access_token: Some(response.access_token),
                                    user_info: Some(user_info),
                                });
                            }
                        }
                        Err(e) => {
                            log::warn!("Session refresh failed: {}", e);
                            storage::clear_tokens();
                        }
                    }
                }
            }
        });
    });

    provide_context(auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> RwSignal<AuthState> {
    use_context::<RwSignal<AuthState>>().expect("AuthProvider not found in component tree")
}

/// Helper: Perform logout
pub async fn do_logout(auth_state: RwSignal<AuthState>, base_url: String) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(&base_url, refresh_token).await {
            log::warn!("Logout request failed: {}", e);
        }
    }

    // Clear tokens
    storage::clear_tokens();

    // Clear auth state
    auth_state.set(AuthState::default());
}
