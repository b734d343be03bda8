//! Integration tests for the GraphQL authentication flow

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use taskly_api::{models::HealthResponse, ApiServer, ApiServerConfig};
use taskly_store::{SeaOrmUserStore, UserFilter, UserStore};
use tower::ServiceExt; // For `oneshot` method

const JWT_SECRET: &str = "test-secret";

/// Helper to create an in-memory database with migrations applied
async fn create_test_store() -> Arc<SeaOrmUserStore> {
    let db = taskly_store::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    taskly_store::migrate(&db)
        .await
        .expect("Failed to run migrations");

    Arc::new(SeaOrmUserStore::new(db))
}

/// Helper to create a test router over `store`
fn create_test_app(store: Arc<SeaOrmUserStore>) -> Router {
    let config = ApiServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(), // Random port
        enable_cors: true,
        jwt_secret: JWT_SECRET.to_string(),
    };

    ApiServer::new(config, store).build_router()
}

/// POST a GraphQL document, optionally with an Authorization header
async fn graphql(
    app: Router,
    query: &str,
    variables: Value,
    authorization: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .uri("/graphql")
        .method("POST")
        .header("content-type", "application/json");
    if let Some(authorization) = authorization {
        request = request.header("authorization", authorization);
    }

    let body = json!({ "query": query, "variables": variables });
    let response = app
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&body).unwrap())
}

const SIGN_UP: &str = r#"
    mutation SignUp($input: SignUpInput!) {
        signUp(input: $input) { token user { id name email avatar } }
    }
"#;

const SIGN_IN: &str = r#"
    mutation SignIn($input: SignInInput!) {
        signIn(input: $input) { token user { id email } }
    }
"#;

const ME: &str = "{ me { id email name } myTaskLists { id title } }";

async fn sign_up(app: Router, email: &str, password: &str) -> Value {
    let (status, body) = graphql(
        app,
        SIGN_UP,
        json!({ "input": { "email": email, "password": password, "name": "A" } }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_sign_up_success() {
    let store = create_test_store().await;
    let app = create_test_app(store.clone());

    let body = sign_up(app, "a@x.com", "pw").await;

    assert!(body.get("errors").is_none(), "unexpected errors: {}", body);
    let auth = &body["data"]["signUp"];
    assert_eq!(auth["user"]["email"], "a@x.com");
    assert_eq!(auth["user"]["name"], "A");
    assert!(auth["token"].as_str().is_some_and(|t| !t.is_empty()));

    // The stored record carries a hash, never the plaintext
    let stored = store
        .find_one(&UserFilter::Email("a@x.com".to_string()))
        .await
        .unwrap()
        .expect("User should be stored");
    assert_ne!(stored.password_hash, "pw");
    assert_eq!(auth["user"]["id"], stored.id.to_string());
}

#[tokio::test]
async fn test_sign_up_duplicate_email() {
    let store = create_test_store().await;

    sign_up(create_test_app(store.clone()), "dup@x.com", "pw").await;
    let body = sign_up(create_test_app(store), "dup@x.com", "pw").await;

    assert_eq!(body["data"], Value::Null);
    assert_eq!(
        body["errors"][0]["extensions"]["code"],
        "EMAIL_ALREADY_REGISTERED"
    );
}

#[tokio::test]
async fn test_sign_up_missing_field_rejected_by_schema() {
    let store = create_test_store().await;
    let app = create_test_app(store.clone());

    let (_, body) = graphql(
        app,
        SIGN_UP,
        json!({ "input": { "email": "a@x.com", "password": "pw" } }),
        None,
    )
    .await;

    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
    assert!(store
        .find_one(&UserFilter::Email("a@x.com".to_string()))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_sign_in_success() {
    let store = create_test_store().await;
    let signed_up = sign_up(create_test_app(store.clone()), "a@x.com", "pw").await;

    let (status, body) = graphql(
        create_test_app(store),
        SIGN_IN,
        json!({ "input": { "email": "a@x.com", "password": "pw" } }),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("errors").is_none(), "unexpected errors: {}", body);
    assert_eq!(
        body["data"]["signIn"]["user"]["id"],
        signed_up["data"]["signUp"]["user"]["id"]
    );
}

#[tokio::test]
async fn test_sign_in_wrong_password_and_unknown_email_match() {
    let store = create_test_store().await;
    sign_up(create_test_app(store.clone()), "a@x.com", "pw").await;

    let (_, wrong_password) = graphql(
        create_test_app(store.clone()),
        SIGN_IN,
        json!({ "input": { "email": "a@x.com", "password": "wrong" } }),
        None,
    )
    .await;
    let (_, unknown_email) = graphql(
        create_test_app(store),
        SIGN_IN,
        json!({ "input": { "email": "never@x.com", "password": "pw" } }),
        None,
    )
    .await;

    assert_eq!(wrong_password["errors"][0]["message"], "Invalid Credentials");
    assert_eq!(
        wrong_password["errors"][0]["extensions"]["code"],
        "INVALID_CREDENTIALS"
    );
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn test_me_with_session_token() {
    let store = create_test_store().await;
    let signed_up = sign_up(create_test_app(store.clone()), "a@x.com", "pw").await;
    let token = signed_up["data"]["signUp"]["token"].as_str().unwrap();

    let (status, bearer) = graphql(
        create_test_app(store.clone()),
        ME,
        json!({}),
        Some(&format!("Bearer {}", token)),
    )
    .await;
    let (_, raw) = graphql(create_test_app(store), ME, json!({}), Some(token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(bearer["data"]["me"]["email"], "a@x.com");
    assert_eq!(bearer["data"]["myTaskLists"], json!([]));
    assert_eq!(bearer, raw);
}

#[tokio::test]
async fn test_invalid_token_is_anonymous() {
    let store = create_test_store().await;

    let (status, body) = graphql(
        create_test_app(store),
        ME,
        json!({}),
        Some("Bearer definitely.not.valid"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("errors").is_none(), "unexpected errors: {}", body);
    assert_eq!(body["data"]["me"], Value::Null);
}

#[tokio::test]
async fn test_health_check() {
    let store = create_test_store().await;
    let app = create_test_app(store);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "ok");
}
