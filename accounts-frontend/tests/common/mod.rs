#![allow(dead_code)]

use accounts_frontend::config::ApiSettings;
use accounts_frontend::services::accounts_client::AccountsClient;
use accounts_frontend::startup::build_router;
use accounts_frontend::AppState;
use access_core::{AccessResolver, PolicyTable, ResolverSettings};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use std::sync::Arc;

pub fn build_app(api_base_url: &str) -> Router {
    build_app_with(api_base_url, ResolverSettings::default())
}

pub fn build_app_with(api_base_url: &str, auth: ResolverSettings) -> Router {
    let resolver = AccessResolver::new(Arc::new(PolicyTable::builtin().unwrap()), auth);
    let accounts_client = AccountsClient::new(ApiSettings {
        base_url: api_base_url.to_string(),
        timeout_secs: 5,
    })
    .unwrap();

    build_router(AppState::new(Arc::new(resolver), Arc::new(accounts_client)))
}

/// An unsigned token whose payload selects `user_name` as the role.
pub fn token_for(user_name: &str) -> String {
    let payload = serde_json::json!({
        "userId": format!("user-{}", user_name),
        "role": "factory",
        "userName": user_name,
        "iat": 1736500000,
        "exp": 9999999999i64,
    });
    format!(
        "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.{}.signature",
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

/// GET with the access token cookie for `user_name`.
pub fn get_as(user_name: &str, uri: &str) -> Request<Body> {
    let cookie = format!("accessToken={}", token_for(user_name));
    request(Method::GET, uri, Some(&cookie), Body::empty())
}

pub fn send_as(user_name: &str, method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    let cookie = format!("accessToken={}", token_for(user_name));
    request(method, uri, Some(&cookie), Body::from(body.to_string()))
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Form-encode query parameters, e.g. an Arabic component label.
pub fn encode_query(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).unwrap()
}
