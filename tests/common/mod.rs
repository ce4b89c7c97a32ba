#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, test};
use serde_json::json;
use tasklist::auth::{AuthResponse, PasswordHasher, TokenService};
use tasklist::rate_limit::{RateLimitPolicy, RateLimiter};
use tasklist::routes::AppState;
use tasklist::services::{AccountService, TaskService};
use tasklist::store::MemoryStore;

pub const TEST_SECRET: &str = "integration_test_secret";

/// Authenticated account details returned by sign-up.
pub struct TestUser {
    pub id: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

pub fn tokens() -> TokenService {
    TokenService::new(TEST_SECRET, chrono::Duration::minutes(30))
}

/// Application state over a fresh in-memory store.
pub fn state_with(policy: RateLimitPolicy) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let tokens = tokens();
    let state = AppState::new(
        AccountService::new(store.clone(), PasswordHasher::new(4), tokens.clone()),
        TaskService::new(store.clone()),
        tokens,
        RateLimiter::new(policy),
    );
    (state, store)
}

pub fn state() -> (AppState, Arc<MemoryStore>) {
    state_with(RateLimitPolicy::per_minute(10_000))
}

pub async fn signup(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> Result<TestUser, String> {
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    if !status.is_success() {
        return Err(format!(
            "Failed to sign up. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let auth: AuthResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse sign-up response: {}", e))?;

    Ok(TestUser {
        id: auth.user.id.to_string(),
        token: auth.token,
    })
}
