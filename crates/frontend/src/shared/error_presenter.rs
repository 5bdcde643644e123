//! Single place where failed actions become user-visible messages.

use std::fmt::Display;

use super::toast::ToastService;

/// Log the failure to the console and show a toast. Nothing is retried.
pub fn present_error(toasts: &ToastService, action: &str, error: impl Display) {
    log::error!("{} failed: {}", action, error);
    toasts.error(user_message(action, &error.to_string()));
}

/// Text for the toast. Transport noise such as `JsValue(...)` wrappers is
/// replaced with a generic hint.
pub fn user_message(action: &str, error: &str) -> String {
    let error = error.trim();
    if error.is_empty() || error.starts_with("JsValue(") {
        return format!("{}: network error, please try again", action);
    }
    format!("{}: {}", action, error)
}
