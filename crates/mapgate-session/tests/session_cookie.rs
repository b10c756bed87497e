//! Cookie behaviour of the session layer, driven through a small router.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::{get, post},
    Router,
};
use mapgate_session::{session_layer, ApiKey, ApiKeySession, MemorySessionStore};
use mapgate_shared::config::SessionSettings;
use tower::ServiceExt;
use tower_sessions::Session;

fn settings() -> SessionSettings {
    SessionSettings {
        secret: Some("test-secret".to_string()),
        cookie_name: "mapgate.sid".to_string(),
        ttl_hours: 24,
        sweep_interval_secs: 300,
    }
}

async fn store_key(session: Session) -> StatusCode {
    match session.set_api_key(ApiKey::parse("ABC123").unwrap()).await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn key_exists(session: Session) -> String {
    session.has_api_key().await.unwrap_or(false).to_string()
}

fn app(store: MemorySessionStore, secure: bool) -> Router {
    Router::new()
        .route("/set", post(store_key))
        .route("/exists", get(key_exists))
        .layer(session_layer(store, &settings(), secure))
}

fn session_cookie(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().to_string()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn exists_with_cookie(app: Router, cookie: Option<&str>) -> String {
    let mut request = Request::builder().uri("/exists");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    body_text(response).await
}

async fn set_key(app: Router) -> String {
    let response = app
        .oneshot(Request::post("/set").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie should be issued")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_cookie_attributes_in_development() {
    let set_cookie = set_key(app(MemorySessionStore::new(), false)).await;

    assert!(set_cookie.starts_with("mapgate.sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=86400"));
    assert!(!set_cookie.contains("Secure"));
    assert!(!set_cookie.contains("ABC123"));
}

#[tokio::test]
async fn test_cookie_is_secure_in_production() {
    let set_cookie = set_key(app(MemorySessionStore::new(), true)).await;
    assert!(set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_key_survives_across_requests() {
    let store = MemorySessionStore::new();
    let cookie = session_cookie(&set_key(app(store.clone(), false)).await);

    assert_eq!(store.len(), 1);
    assert_eq!(exists_with_cookie(app(store.clone(), false), Some(&cookie)).await, "true");
    assert_eq!(exists_with_cookie(app(store, false), None).await, "false");
}

#[tokio::test]
async fn test_tampered_cookie_is_ignored() {
    let store = MemorySessionStore::new();
    let cookie = session_cookie(&set_key(app(store.clone(), false)).await);

    let (name, value) = cookie.split_once('=').unwrap();
    let mut forged: Vec<char> = value.chars().collect();
    let last = forged.len() - 1;
    forged[last] = if forged[last] == 'A' { 'B' } else { 'A' };
    let forged = format!("{}={}", name, forged.into_iter().collect::<String>());

    assert_eq!(exists_with_cookie(app(store, false), Some(&forged)).await, "false");
}
