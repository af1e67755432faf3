use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, MockConfig, User, API_KEY_HEADER};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(API_KEY_HEADER, "test-key")
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(API_KEY_HEADER, "test-key")
        .body(body.to_string())
        .unwrap()
}

fn seeded() -> axum::Router {
    app_with(MockConfig {
        api_key: None,
        users: vec![
            User::new("1", "Ada", "London"),
            User::new("2", "Grace", "NYC"),
            User::new("3", "Edsger", "NYC"),
        ],
    })
}

// --- auth ---

#[tokio::test]
async fn missing_api_key_returns_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/v1/users").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "invalid api key");
}

#[tokio::test]
async fn fixed_api_key_rejects_others() {
    let config = MockConfig {
        api_key: Some("right".to_string()),
        users: Vec::new(),
    };
    let resp = app_with(config.clone())
        .oneshot(request("GET", "/v1/users"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app_with(config)
        .oneshot(
            Request::builder()
                .uri("/v1/users")
                .header(API_KEY_HEADER, "right")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- list ---

#[tokio::test]
async fn list_users_empty() {
    let resp = app().oneshot(request("GET", "/v1/users")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert!(users.is_empty());
}

#[tokio::test]
async fn list_users_filters_by_query() {
    let resp = seeded().oneshot(request("GET", "/v1/users?city=NYC")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3"]);
}

// --- get ---

#[tokio::test]
async fn get_user_found() {
    let resp = seeded().oneshot(request("GET", "/v1/users/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user, User::new("1", "Ada", "London"));
}

#[tokio::test]
async fn get_user_not_found() {
    let resp = app().oneshot(request("GET", "/v1/users/missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "user not found");
}

// --- create ---

#[tokio::test]
async fn create_user_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/users", r#"{"name":"Barbara","city":"Boston"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: User = body_json(resp).await;
    assert_eq!(user.name, "Barbara");
    assert_eq!(user.city.as_deref(), Some("Boston"));
    assert!(!user.id.is_empty());
}

#[tokio::test]
async fn create_user_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/users", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- update / delete ---

#[tokio::test]
async fn update_user_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/v1/users/missing", r#"{"name":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_then_delete_user() {
    use tower::Service;

    let mut app = seeded().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/v1/users/1", r#"{"city":"Paris"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: User = body_json(resp).await;
    assert_eq!(updated.name, "Ada"); // unchanged
    assert_eq!(updated.city.as_deref(), Some("Paris"));

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", "/v1/users/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/v1/users/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- diagnostics ---

#[tokio::test]
async fn echo_describes_request() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/echo?a=1&tags%5B0%5D=x", r#"{"k":"v"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["method"], "POST");
    assert_eq!(body["path"], "/v1/echo");
    assert_eq!(body["query"], serde_json::json!([["a", "1"], ["tags[0]", "x"]]));
    assert_eq!(body["headers"][API_KEY_HEADER], "test-key");
    assert_eq!(body["headers"]["content-type"], "application/json");
    assert_eq!(body["body"], serde_json::json!({"k": "v"}));
}

#[tokio::test]
async fn status_route_returns_requested_status() {
    let resp = app().oneshot(request("GET", "/v1/status/503")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 503);
}

#[tokio::test]
async fn text_route_returns_plain_body() {
    let resp = app().oneshot(request("GET", "/v1/text/500")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_bytes(resp).await, "status 500");
}
