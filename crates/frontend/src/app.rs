use leptos::prelude::*;

use crate::routes::routes::AppRoutes;
use crate::shared::config::load_console_config;
use crate::shared::toast::{ToastHost, ToastService};
use crate::system::auth::context::AuthProvider;

#[component]
pub fn App() -> impl IntoView {
    let config = load_console_config();

    // Provide config and toasts to the whole app via context.
    provide_context(config.clone());
    provide_context(ToastService::new());

    view! {
        <AuthProvider config=config>
            <AppRoutes />
        </AuthProvider>
        <ToastHost />
    }
}
