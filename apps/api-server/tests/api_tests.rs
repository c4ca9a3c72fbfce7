//! End-to-end HTTP flows against in-memory storage.

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use api_server::configure_app;
use api_server::state::AppState;
use quill_infra::JwtConfig;

fn test_state() -> AppState {
    AppState::in_memory(JwtConfig {
        secret: "api-test-secret".to_string(),
        ..JwtConfig::default()
    })
}

struct TestUser {
    id: String,
    token: String,
}

fn bearer(user: &TestUser) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", user.token))
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure_app),
        )
        .await
    };
}

/// Register a user with password `password123`.
macro_rules! register {
    ($app:expr, $name:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"name": $name, "email": $email, "password": "password123"}))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        TestUser {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            token: body["access_token"].as_str().unwrap().to_string(),
        }
    }};
}

/// Create a post with content `C` and return its id.
macro_rules! create_post {
    ($app:expr, $author:expr, $title:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer($author))
            .set_json(json!({"title": $title, "content": "C"}))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        body["id"].as_str().unwrap().to_string()
    }};
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let req = test::TestRequest::get().uri($uri).to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
    ($app:expr, $uri:expr, $user:expr) => {{
        let req = test::TestRequest::get()
            .uri($uri)
            .insert_header(bearer($user))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! patch {
    ($app:expr, $uri:expr, $user:expr) => {{
        let req = test::TestRequest::patch()
            .uri($uri)
            .insert_header(bearer($user))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_rt::test]
async fn test_health() {
    let app = app!();

    let (status, body) = get_json!(app, "/api/v1/health");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_rt::test]
async fn test_register_and_login() {
    let app = app!();
    let user = register!(app, "Jane", "jane@example.com");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "jane@example.com", "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], user.id.as_str());
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_rt::test]
async fn test_register_duplicate_email() {
    let app = app!();
    let first = register!(app, "Jane", "jane@example.com");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"name": "Impostor", "email": "jane@example.com", "password": "password456"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "EMAIL_ALREADY_EXISTS");
    assert_eq!(body["statusCode"], 409);

    let (_, profile) = get_json!(app, &format!("/api/v1/users/{}", first.id), &first);
    assert_eq!(profile["name"], "Jane");
}

#[actix_rt::test]
async fn test_register_rule_violations_return_code_only() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"name": "", "email": "nope", "password": "short"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"statusCode": 400, "errorCode": "VALIDATION_ERROR"})
    );
}

#[actix_rt::test]
async fn test_malformed_json_is_validation_error() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(header::ContentType::json())
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_parse_errors_are_not_echoed() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": 42, "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"statusCode": 400, "errorCode": "VALIDATION_ERROR"})
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?page=abc")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"statusCode": 400, "errorCode": "VALIDATION_ERROR"})
    );
}

#[actix_rt::test]
async fn test_login_failures_return_invalid_credentials() {
    let app = app!();
    register!(app, "Jane", "jane@example.com");

    for (email, password) in [
        ("jane@example.com", "wrong-password"),
        ("nobody@example.com", "password123"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": password}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errorCode"], "INVALID_CREDENTIALS");
    }
}

#[actix_rt::test]
async fn test_create_post_requires_token() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "MISSING_TOKEN");

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header((header::AUTHORIZATION, "Bearer garbage"))
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "INVALID_TOKEN");
}

#[actix_rt::test]
async fn test_like_flow_between_two_users() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");
    let bob = register!(app, "Bob", "bob@example.com");
    let post = create_post!(app, &alice, "T");
    let uri = format!("/api/v1/posts/{post}");

    let (status, body) = get_json!(app, &uri);
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("is_liked").is_none());
    assert_eq!(body["likes_count"], 0);
    assert_eq!(body["user"]["name"], "Alice");

    let (status, body) = patch!(app, &format!("{uri}/like"), &alice);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Like added successfully");

    let (_, body) = get_json!(app, &uri, &alice);
    assert_eq!(body["likes_count"], 1);
    assert_eq!(body["is_liked"], true);

    let (_, body) = get_json!(app, &uri, &bob);
    assert_eq!(body["likes_count"], 1);
    assert_eq!(body["is_liked"], false);

    patch!(app, &format!("{uri}/like"), &bob);
    let (_, body) = get_json!(app, &uri, &bob);
    assert_eq!(body["likes_count"], 2);
    assert_eq!(body["is_liked"], true);
}

#[actix_rt::test]
async fn test_like_twice_keeps_count() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");
    let post = create_post!(app, &alice, "T");
    let uri = format!("/api/v1/posts/{post}");

    patch!(app, &format!("{uri}/like"), &alice);
    let (status, _) = patch!(app, &format!("{uri}/like"), &alice);
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json!(app, &uri);
    assert_eq!(body["likes_count"], 1);
}

#[actix_rt::test]
async fn test_unlike_without_like() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");
    let post = create_post!(app, &alice, "T");

    let (status, body) = patch!(app, &format!("/api/v1/posts/{post}/unlike"), &alice);

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "CANNOT_REMOVE_LIKE");

    patch!(app, &format!("/api/v1/posts/{post}/like"), &alice);
    let (status, body) = patch!(app, &format!("/api/v1/posts/{post}/unlike"), &alice);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Like removed successfully");
}

#[actix_rt::test]
async fn test_update_post_by_non_owner_is_forbidden() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");
    let bob = register!(app, "Bob", "bob@example.com");
    let post = create_post!(app, &alice, "Original");
    let uri = format!("/api/v1/posts/{post}");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&bob))
        .set_json(json!({"title": "Hijacked"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let (_, body) = get_json!(app, &uri);
    assert_eq!(body["title"], "Original");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&alice))
        .set_json(json!({"title": "Edited"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Edited");
    assert_eq!(body["content"], "C");
}

#[actix_rt::test]
async fn test_unknown_and_malformed_post_ids() {
    let app = app!();

    let (status, body) = get_json!(app, "/api/v1/posts/00000000-0000-4000-8000-000000000000");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], "POST_NOT_FOUND");

    let (status, body) = get_json!(app, "/api/v1/posts/not-a-uuid");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_list_posts_pagination_meta() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");
    for i in 0..3 {
        create_post!(app, &alice, &format!("Post {i}"));
    }

    let (status, body) = get_json!(app, "/api/v1/posts?page=1&page_items=2");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["title"], "Post 2");
    assert_eq!(
        body["meta"],
        json!({"page": 1, "pageItems": 2, "total": 3, "totalPages": 2})
    );
}

#[actix_rt::test]
async fn test_list_posts_ignores_invalid_token() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");
    create_post!(app, &alice, "T");

    let req = test::TestRequest::get()
        .uri("/api/v1/posts")
        .insert_header((header::AUTHORIZATION, "Bearer expired-or-bogus"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"][0].get("is_liked").is_none());
}

#[actix_rt::test]
async fn test_comments_second_page() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");
    let post = create_post!(app, &alice, "T");
    let uri = format!("/api/v1/posts/{post}/comments");

    for i in 0..15 {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&alice))
            .set_json(json!({"content": format!("comment {i}")}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let (status, body) = get_json!(app, &format!("{uri}?page=2&page_items=5"));

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["content"], "comment 9");
    assert_eq!(data[0]["post_id"], post.as_str());
    assert_eq!(data[0]["user"]["email"], "alice@example.com");
    assert_eq!(body["meta"]["total"], 15);
    assert_eq!(body["meta"]["totalPages"], 3);

    let (_, post_body) = get_json!(app, &format!("/api/v1/posts/{post}"));
    assert_eq!(post_body["comments_count"], 15);
}

#[actix_rt::test]
async fn test_comment_on_missing_post() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/00000000-0000-4000-8000-000000000000/comments")
        .insert_header(bearer(&alice))
        .set_json(json!({"content": "hello"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_update_other_user_is_forbidden() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");
    let bob = register!(app, "Bob", "bob@example.com");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/users/{}", bob.id))
        .insert_header(bearer(&alice))
        .set_json(json!({"name": "Mallory"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "FORBIDDEN");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/users/{}", alice.id))
        .insert_header(bearer(&alice))
        .set_json(json!({"name": "Alicia"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Alicia");
    assert!(body.get("password").is_none());
}

#[actix_rt::test]
async fn test_get_unknown_user() {
    let app = app!();
    let alice = register!(app, "Alice", "alice@example.com");

    let (status, body) = get_json!(
        app,
        "/api/v1/users/00000000-0000-4000-8000-000000000000",
        &alice
    );

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], "USER_NOT_FOUND");
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_rate_limit_rejects_excess_requests() {
    use std::sync::Arc;
    use std::time::Duration;

    use api_server::middleware::rate_limit::RateLimitMiddleware;
    use quill_infra::{InMemoryRateLimiter, RateLimitConfig};

    let limiter = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: 2,
        window: Duration::from_secs(60),
    }));
    let app = test::init_service(
        App::new()
            .wrap(RateLimitMiddleware::new(limiter))
            .app_data(web::Data::new(test_state()))
            .configure(configure_app),
    )
    .await;

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("Retry-After"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], "TOO_MANY_REQUESTS");
}
