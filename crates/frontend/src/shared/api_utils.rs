//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and the request
//! context every API call receives explicitly.

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location and the
/// configured backend port.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base(port: u16) -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, port)
}

/// Where to send a request and on whose behalf.
///
/// Built by the page from config and auth state, then passed to every
/// model function, so API calls never look anything up globally.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiContext {
    pub base_url: String,
    pub access_token: Option<String>,
}

impl ApiContext {
    pub fn new(port: u16, access_token: Option<String>) -> Self {
        Self {
            base_url: api_base(port),
            access_token,
        }
    }

    /// Build a full API URL from a path (should start with "/api/")
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn authorization(&self) -> Option<String> {
        self.access_token
            .as_ref()
            .map(|token| format!("Bearer {}", token))
    }
}
