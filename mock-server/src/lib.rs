use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{OriginalUri, Path, Query, Request, State},
    http::{HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::warn;
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-roomping-api-key";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: &str, name: &str, city: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            city: Some(city.to_string()),
            email: None,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
}

/// Seed data and auth settings for a mock instance.
#[derive(Clone, Debug, Default)]
pub struct MockConfig {
    /// When set, only this key is accepted; otherwise any non-empty key is.
    pub api_key: Option<String>,
    pub users: Vec<User>,
}

pub type Db = Arc<RwLock<HashMap<String, User>>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    api_key: Option<Arc<str>>,
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let users = config.users.into_iter().map(|u| (u.id.clone(), u)).collect();
    let state = AppState {
        db: Arc::new(RwLock::new(users)),
        api_key: config.api_key.map(Arc::from),
    };

    let api = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/echo", any(echo))
        .route("/status/{code}", any(respond_with_status))
        .route("/text/{code}", any(respond_with_text))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state);

    Router::new().nest("/v1", api)
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let accepted = match state.api_key.as_deref() {
        Some(expected) => presented == expected,
        None => !presented.is_empty(),
    };
    if !accepted {
        warn!(path = %request.uri().path(), "rejected request with invalid api key");
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid api key"}))).into_response();
    }
    next.run(request).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "user not found"})))
}

/// A user matches when every filter value equals the field's text form.
fn matches_filter(user: &User, filter: &HashMap<String, String>) -> bool {
    let Ok(Value::Object(fields)) = serde_json::to_value(user) else {
        return false;
    };
    filter.iter().all(|(key, wanted)| match fields.get(key) {
        Some(Value::String(s)) => s == wanted,
        Some(other) => other.to_string() == *wanted,
        None => false,
    })
}

async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<HashMap<String, String>>,
) -> Json<Vec<User>> {
    let users = state.db.read().await;
    let mut found: Vec<User> = users
        .values()
        .filter(|u| matches_filter(u, &filter))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.id.cmp(&b.id));
    Json(found)
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        city: input.city,
        email: input.email,
    };
    state.db.write().await.insert(user.id.clone(), user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    let users = state.db.read().await;
    users.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    let mut users = state.db.write().await;
    let user = users.get_mut(&id).ok_or_else(not_found)?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if input.city.is_some() {
        user.city = input.city;
    }
    if input.email.is_some() {
        user.email = input.email;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut users = state.db.write().await;
    users.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or_else(not_found)
}

/// Describe the received request so clients can assert what went on the wire.
async fn echo(
    method: Method,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    let headers: serde_json::Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_string(), Value::String(value))
        })
        .collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::String(body))
    };
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": query,
        "headers": headers,
        "body": body,
    }))
}

async fn respond_with_status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, Json(json!({"status": code}))).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn respond_with_text(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}
