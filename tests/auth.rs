mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use tasklist::auth::AuthResponse;
use tasklist::routes;

#[actix_rt::test]
async fn test_signup_and_signin_flow() {
    let (state, _) = common::state();
    let tokens = state.tokens.clone();
    let app = test::init_service(App::new().configure(routes::configure(state))).await;

    let signup_payload = json!({ "email": "a@x.com", "password": "password123" });
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&signup_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        StatusCode::OK,
        "Sign-up failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );

    let signed_up: AuthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(signed_up.user.email, "a@x.com");
    let claims = tokens.verify(&signed_up.token).unwrap();
    assert_eq!(claims.subject_id(), Some(signed_up.user.id));

    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["user"].get("password_hash").is_none());

    // same email again
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&signup_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": "a@x.com", "password": "password123" }))
        .to_request();
    let signed_in: AuthResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(signed_in.user.id, signed_up.user.id);
    assert!(!signed_in.token.is_empty());

    for credentials in [
        json!({ "email": "a@x.com", "password": "wrongpw" }),
        json!({ "email": "nobody@x.com", "password": "password123" }),
        json!({ "email": "not-an-email", "password": "password123" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/signin")
            .set_json(&credentials)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", credentials);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[actix_rt::test]
async fn test_invalid_signup_inputs() {
    let (state, _) = common::state();
    let app = test::init_service(App::new().configure(routes::configure(state))).await;

    let test_cases = vec![
        (
            json!({ "password": "password123" }),
            StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": "test@example.com" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        (
            json!({ "email": "invalid-email", "password": "password123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "email": "test@example.com", "password": "1234567" }),
            StatusCode::BAD_REQUEST,
            "password too short",
        ),
        (
            json!({ "email": "test@example.com", "password": "p".repeat(73) }),
            StatusCode::BAD_REQUEST,
            "password longer than bcrypt reads",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            expected_status,
            "Unexpected status for case: {}",
            description
        );
    }

    // none of the rejected payloads created the account
    assert!(common::signup(&app, "test@example.com", "password123")
        .await
        .is_ok());
}

#[actix_rt::test]
async fn test_signin_is_case_insensitive_on_email() {
    let (state, _) = common::state();
    let app = test::init_service(App::new().configure(routes::configure(state))).await;
    let user = common::signup(&app, "Mixed@Example.com", "password123")
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": "mixed@example.COM", "password": "password123" }))
        .to_request();
    let signed_in: AuthResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(signed_in.user.id.to_string(), user.id);
    assert_eq!(signed_in.user.email, "mixed@example.com");
}

#[actix_rt::test]
async fn test_protected_route_rejects_bad_tokens() {
    let (state, _) = common::state();
    let app = test::init_service(App::new().configure(routes::configure(state))).await;
    let user = common::signup(&app, "a@x.com", "password123").await.unwrap();
    let uri = format!("/api/{}/tasks", user.id);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get("www-authenticate").unwrap(),
        "Bearer"
    );

    let forged = tasklist::auth::TokenService::new("some_other_secret", chrono::Duration::minutes(5))
        .issue(
            user.id.parse().unwrap(),
            "a@x.com",
            chrono::Duration::minutes(5),
        )
        .unwrap();
    for header_value in [
        format!("Bearer {}", forged),
        "Bearer not.a.token".to_string(),
        format!("Basic {}", user.token),
        "Bearer".to_string(),
    ] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(("Authorization", header_value.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "Expected 401 for header {:?}",
            header_value
        );
    }
}

#[actix_rt::test]
async fn test_expired_token_is_rejected() {
    let (state, _) = common::state();
    let app = test::init_service(App::new().configure(routes::configure(state))).await;
    let user = common::signup(&app, "a@x.com", "password123").await.unwrap();

    let issued = chrono::Utc::now() - chrono::Duration::hours(2);
    let expired = common::tokens()
        .issue_at(
            user.id.parse().unwrap(),
            "a@x.com",
            chrono::Duration::hours(1),
            issued,
        )
        .unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/{}/tasks", user.id))
        .insert_header(("Authorization", format!("Bearer {}", expired)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_account_endpoints() {
    let (state, store) = common::state();
    let app = test::init_service(App::new().configure(routes::configure(state))).await;
    let user = common::signup(&app, "a@x.com", "password123").await.unwrap();
    let other = common::signup(&app, "b@x.com", "password123").await.unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/{}", user.id))
        .insert_header(user.bearer())
        .to_request();
    let account: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(account["email"], "a@x.com");
    assert_eq!(account["id"], user.id.as_str());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/{}", user.id))
        .insert_header(other.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/{}/tasks", user.id))
        .insert_header(user.bearer())
        .set_json(json!({ "title": "Soon gone" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.task_count(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/{}", user.id))
        .insert_header(user.bearer())
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));
    assert_eq!(store.task_count(), 0);

    // the token still verifies but the account is gone
    let req = test::TestRequest::get()
        .uri(&format!("/api/{}", user.id))
        .insert_header(user.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": "a@x.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[test_log::test(actix_rt::test)]
async fn test_auth_routes_are_rate_limited() {
    let (state, _) = common::state_with(tasklist::rate_limit::RateLimitPolicy::per_minute(2));
    let app = test::init_service(App::new().configure(routes::configure(state))).await;

    let payload = json!({ "email": "nobody@x.com", "password": "password123" });
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/auth/signin")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}
