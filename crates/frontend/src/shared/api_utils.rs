//! API utilities for frontend-backend communication
//!
//! Every request carries the stored access token when one exists. Failed
//! responses are turned into a user-facing message: the `message` field of
//! the error body (plus field errors, if any) or a generic fallback.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use contracts::shared::api_error::{message_from_body, GENERIC_ERROR_MESSAGE};

use crate::system::auth::storage;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

fn with_auth(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        log::warn!("API error {}: {}", response.status(), body);
        return Err(message_from_body(&body));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn send_body<B: Serialize, T: DeserializeOwned>(
    builder: RequestBuilder,
    body: &B,
) -> Result<T, String> {
    let response = with_auth(builder)
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|_| GENERIC_ERROR_MESSAGE.to_string())?;
    read_json(response).await
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = with_auth(Request::get(&api_url(path)))
        .send()
        .await
        .map_err(|_| GENERIC_ERROR_MESSAGE.to_string())?;
    read_json(response).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    send_body(Request::post(&api_url(path)), body).await
}

pub async fn put_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    send_body(Request::put(&api_url(path)), body).await
}

async fn expect_ok(response: Response) -> Result<(), String> {
    if response.ok() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(message_from_body(&body))
    }
}

/// POST без тела ответа
pub async fn post_ok<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    let response = with_auth(Request::post(&api_url(path)))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|_| GENERIC_ERROR_MESSAGE.to_string())?;
    expect_ok(response).await
}

pub async fn delete(path: &str) -> Result<(), String> {
    let response = with_auth(Request::delete(&api_url(path)))
        .send()
        .await
        .map_err(|_| GENERIC_ERROR_MESSAGE.to_string())?;
    expect_ok(response).await
}
