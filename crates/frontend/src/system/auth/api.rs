//! Auth endpoints of the training API (`/api/auth/*`)

use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn auth_url(base_url: &str, action: &str) -> String {
    format!("{}/api/auth/{}", base_url, action)
}

async fn post(base_url: &str, action: &str, body: &impl Serialize) -> Result<Response, String> {
    let response = Request::post(&auth_url(base_url, action))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    ensure_ok(response, action)
}

fn ensure_ok(response: Response, action: &str) -> Result<Response, String> {
    match response.status() {
        200..=299 => Ok(response),
        401 => Err(format!("{}: invalid credentials or expired session", action)),
        status => Err(format!("{} failed: HTTP {}", action, status)),
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn login(
    base_url: &str,
    username: String,
    password: String,
) -> Result<LoginResponse, String> {
    let response = post(base_url, "login", &LoginRequest { username, password }).await?;
    parse(response).await
}

/// Exchange a refresh token for a new access token
pub async fn refresh_token(
    base_url: &str,
    refresh_token: String,
) -> Result<RefreshResponse, String> {
    let response = post(base_url, "refresh", &RefreshRequest { refresh_token }).await?;
    parse(response).await
}

/// Revoke the refresh token server-side
pub async fn logout(base_url: &str, refresh_token: String) -> Result<(), String> {
    post(base_url, "logout", &RefreshRequest { refresh_token }).await?;
    Ok(())
}

pub async fn get_current_user(base_url: &str, access_token: &str) -> Result<UserInfo, String> {
    let response = Request::get(&auth_url(base_url, "me"))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    parse(ensure_ok(response, "me")?).await
}
