use contracts::domain::a001_training_session::SessionId;
use contracts::domain::common::AggregateId;
use contracts::shared::config::ConsoleConfig;
use leptos::prelude::*;
use serde::Deserialize;

use crate::domain::a001_training_session::ui::TrainingSessionDetail;
use crate::shared::api_utils::api_base;
use crate::system::auth::context::{do_logout, use_auth};
use crate::system::pages::login::LoginPage;

/// Query string of the console URL: `?session=<id>`
#[derive(Debug, Default, Deserialize, PartialEq)]
struct ConsoleQuery {
    session: Option<String>,
}

fn parse_query(search: &str) -> ConsoleQuery {
    serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed query '{}': {}", search, e);
        ConsoleQuery::default()
    })
}

fn session_id(query: &ConsoleQuery) -> Option<SessionId> {
    let raw = query.session.as_deref()?;
    SessionId::from_string(raw)
        .map_err(|e| log::warn!("Bad session id '{}': {}", raw, e))
        .ok()
}

fn session_from_location() -> Option<SessionId> {
    let search = window().location().search().unwrap_or_default();
    session_id(&parse_query(&search))
}

#[component]
fn MainLayout() -> impl IntoView {
    let config = use_context::<ConsoleConfig>().expect("ConsoleConfig not found");
    let auth_state = use_auth();
    let base_url = StoredValue::new(api_base(config.api.port));
    let session_id = session_from_location();

    let on_logout = Callback::new(move |_| {
        let base_url = base_url.get_value();
        leptos::task::spawn_local(do_logout(auth_state, base_url));
    });

    move || {
        let state = auth_state.get();
        let Some(user) = state.current_user() else {
            return view! { <div class="page__loading">"Loading profile..."</div> }.into_any();
        };
        match session_id {
            Some(id) => view! {
                <TrainingSessionDetail
                    id=id
                    api=state.api_context(&config)
                    user=user
                    on_logout=on_logout
                />
            }
            .into_any(),
            None => view! {
                <div class="page">
                    <div class="warning-box">
                        <span class="warning-box__text">
                            "No training session selected. Open this page with ?session=<id>."
                        </span>
                    </div>
                </div>
            }
            .into_any(),
        }
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let auth_state = use_auth();

    view! {
        <Show
            when=move || auth_state.with(|s| s.access_token.is_some())
            fallback=|| view! { <LoginPage /> }
        >
            <MainLayout />
        </Show>
    }
}
