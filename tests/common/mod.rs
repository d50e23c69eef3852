//! In-process stand-in for the data-quality backend.

use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const TOKEN: &str = "tok-123";

#[derive(Clone, Default)]
pub struct Backend {
    /// `Authorization` header of every request, in arrival order
    pub auth_headers: Arc<Mutex<Vec<(String, Option<String>)>>>,
    pub timeseries_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub users: Arc<Mutex<Vec<Value>>>,
}

impl Backend {
    fn record(&self, route: &str, headers: &HeaderMap) {
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().push((route.to_string(), auth));
    }

    pub fn auth_header_for(&self, route: &str) -> Vec<Option<String>> {
        self.auth_headers
            .lock()
            .iter()
            .filter(|(r, _)| r == route)
            .map(|(_, auth)| auth.clone())
            .collect()
    }
}

fn detail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn check_auth(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")),
    }
}

fn dataset_id(params: &HashMap<String, String>) -> i64 {
    params
        .get("dataset_id")
        .and_then(|id| id.parse().ok())
        .unwrap_or_default()
}

async fn login(State(backend): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    backend.record("/auth/login", &headers);
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some(ADMIN_EMAIL), Some(ADMIN_PASSWORD)) => {
            Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
        }
        (Some("silent@example.com"), _) => StatusCode::UNAUTHORIZED.into_response(),
        _ => detail(StatusCode::UNAUTHORIZED, "Incorrect email or password"),
    }
}

async fn datasets(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record("/datasets", &headers);
    if let Err(rejection) = check_auth(&headers) {
        return rejection;
    }
    Json(json!([
        { "id": 1, "key": "orders", "name": "Orders", "description": "Order events", "is_active": true },
        { "id": 2, "key": "customers", "name": "Customers", "description": null, "is_active": true },
        { "id": 3, "key": "legacy", "name": "Legacy", "is_active": false }
    ]))
    .into_response()
}

async fn latest(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/metrics/latest", &headers);
    if let Err(rejection) = check_auth(&headers) {
        return rejection;
    }
    match dataset_id(&params) {
        1 => Json(json!([
            { "dimension": "completeness", "latest_value": 0.97, "latest_at": "2024-01-02T00:00:00" },
            { "dimension": "timeliness", "latest_value": null, "latest_at": null },
            { "dimension": "validity", "latest_value": 0.81, "latest_at": "2024-01-02T00:00:00" },
            { "dimension": "accuracy", "latest_value": null, "latest_at": null },
            { "dimension": "consistency", "latest_value": 1.0, "latest_at": "2024-01-01T00:00:00" }
        ]))
        .into_response(),
        2 => detail(StatusCode::FORBIDDEN, "No access to dataset"),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn timeseries(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/metrics/timeseries", &headers);
    if let Err(rejection) = check_auth(&headers) {
        return rejection;
    }
    backend.timeseries_queries.lock().push(params.clone());
    match dataset_id(&params) {
        1 | 2 => Json(json!([
            { "metric_name": "null_rate", "points": [
                { "recorded_at": "2024-01-02T00:00:00", "value": 0.03 },
                { "recorded_at": "2024-01-01T00:00:00", "value": 0.05 }
            ]},
            { "metric_name": "schema_errors", "points": [
                { "recorded_at": "2024-01-01T12:00:00", "value": 0.0 }
            ]}
        ]))
        .into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn list_users(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.record("/users", &headers);
    if let Err(rejection) = check_auth(&headers) {
        return rejection;
    }
    Json(Value::Array(backend.users.lock().clone())).into_response()
}

async fn create_user(State(backend): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    backend.record("/users", &headers);
    if let Err(rejection) = check_auth(&headers) {
        return rejection;
    }
    if body["password"].as_str().map(str::len).unwrap_or(0) < 8 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{ "loc": ["body", "password"], "msg": "too short" }] })),
        )
            .into_response();
    }

    let mut users = backend.users.lock();
    if users.iter().any(|u| u["email"] == body["email"]) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let user = json!({
        "id": users.len() + 1,
        "email": body["email"],
        "full_name": body.get("full_name").cloned().unwrap_or(Value::Null),
        "is_active": body["is_active"],
        "is_admin": body["is_admin"],
    });
    users.push(user.clone());
    Json(user).into_response()
}

/// Serve the mock backend on an ephemeral port; returns its base URL
pub async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/datasets", get(datasets))
        .route("/metrics/latest", get(latest))
        .route("/metrics/timeseries", get(timeseries))
        .route("/users", get(list_users).post(create_user))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), backend)
}
