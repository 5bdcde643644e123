use contracts::shared::config::ConsoleConfig;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_utils::api_base;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::system::auth::context::{use_auth, AuthState};
use crate::system::auth::{api, storage};

#[component]
pub fn LoginPage() -> impl IntoView {
    let config = use_context::<ConsoleConfig>().expect("ConsoleConfig not found");
    let base_url = StoredValue::new(api_base(config.api.port));

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error_message = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(false);

    let auth_state = use_auth();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get();
        let password_val = password.get();
        let base_url = base_url.get_value();

        is_loading.set(true);
        error_message.set(None);

        spawn_local(async move {
            match api::login(&base_url, username_val, password_val).await {
                Ok(response) => {
                    storage::save_access_token(&response.access_token);
                    storage::save_refresh_token(&response.refresh_token);
                    log::info!("Logged in as {}", response.user.username);

                    auth_state.set(AuthState {
                        access_token: Some(response.access_token),
                        user_info: Some(response.user),
                    });
                }
                Err(e) => {
                    log::error!("Login failed: {}", e);
                    error_message.set(Some(format!("Login failed: {}", e)));
                }
            }
            is_loading.set(false);
        });
    };

    view! {
        <PageFrame page_id="sys_login--system" category=PAGE_CAT_SYSTEM>
            <div class="login-container">
                <div class="login-box">
                    <h1>"Training Console"</h1>
                    <h2>"Sign in"</h2>

                    <Show when=move || error_message.get().is_some()>
                        <div class="error-message">
                            {move || error_message.get().unwrap_or_default()}
                        </div>
                    </Show>

                    <form on:submit=on_submit>
                        <div class="form-group">
                            <label for="username">"Username"</label>
                            <input
                                type="text"
                                id="username"
                                prop:value=move || username.get()
                                on:input=move |ev| username.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>

                        <div class="form-group">
                            <label for="password">"Password"</label>
                            <input
                                type="password"
                                id="password"
                                prop:value=move || password.get()
                                on:input=move |ev| password.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>

                        <button
                            type="submit"
                            class="btn-primary"
                            disabled=move || is_loading.get()
                        >
                            {move || if is_loading.get() { "Signing in..." } else { "Sign in" }}
                        </button>
                    </form>
                </div>
            </div>
        </PageFrame>
    }
}
