#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use rental_api::{Client, CredentialStore, MemoryCredentialStore, Session};
use serde_json::{Value, json};

pub const USERNAME: &str = "landlord";
pub const PASSWORD: &str = "s3cret";
pub const REFRESH_TOKEN: &str = "R1";

/// Shared state of the mock backend, inspected by the tests
#[derive(Default)]
pub struct MockState {
    /// Access token currently accepted on protected routes
    valid_access: Mutex<String>,
    refresh_calls: AtomicUsize,
    refresh_delay_ms: AtomicU64,
    reject_refresh: AtomicBool,
    reject_all: AtomicBool,
    authorization: Mutex<Vec<Option<String>>>,
    last_query: Mutex<HashMap<String, String>>,
}

impl MockState {
    pub fn set_valid_access(&self, token: &str) {
        *self.valid_access.lock().unwrap() = token.to_string();
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn delay_refresh(&self, delay: Duration) {
        self.refresh_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn reject_refresh(&self) {
        self.reject_refresh.store(true, Ordering::SeqCst);
    }

    /// Answer 401 on every protected route, whatever the token
    pub fn reject_all(&self) {
        self.reject_all.store(true, Ordering::SeqCst);
    }

    /// `Authorization` headers seen on protected routes, in arrival order
    pub fn authorization(&self) -> Vec<Option<String>> {
        self.authorization.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> HashMap<String, String> {
        self.last_query.lock().unwrap().clone()
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.authorization.lock().unwrap().push(auth.clone());

        let expected = format!("Bearer {}", self.valid_access.lock().unwrap());
        if self.reject_all.load(Ordering::SeqCst) || auth.as_deref() != Some(expected.as_str()) {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "detail": "Given token not valid for any token type",
                    "code": "token_not_valid"
                })),
            )
                .into_response());
        }
        Ok(())
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let state = Arc::new(MockState::default());
        state.set_valid_access("A1");

        let app = Router::new()
            .route("/api/auth/login/", post(login))
            .route("/api/auth/refresh/", post(refresh))
            .route("/api/auth/user/", get(current_user))
            .route("/api/auth/user/update/", put(update_user))
            .route("/api/dashboard/stats/", get(dashboard_stats))
            .route("/api/units/", get(list_units))
            .route(
                "/api/units/{id}/",
                get(get_unit)
                    .put(replace_unit)
                    .patch(patch_unit)
                    .delete(delete_unit),
            )
            .route("/api/properties/", get(list_properties))
            .route("/api/leases/", post(create_lease))
            .route("/api/documents/", get(forbidden))
            .route("/api/expenses/", get(server_error))
            .route("/api/notifications/{id}/respond/", post(respond))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind mock backend")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            base_url: format!("http://{}/api", addr),
            state,
        })
    }

    pub fn client(&self, store: Arc<dyn CredentialStore>) -> Result<Client> {
        Ok(Client::new(&self.base_url, store)?)
    }
}

/// A store already holding the `A1`/`R1` pair and a cached profile
pub fn signed_in_store(access: &str) -> Arc<MemoryCredentialStore> {
    let profile = serde_json::from_value(user_json()).unwrap();
    Arc::new(MemoryCredentialStore::with_session(Session::new(
        access.to_string(),
        REFRESH_TOKEN.to_string(),
        Some(profile),
    )))
}

pub fn user_json() -> Value {
    json!({
        "id": 7,
        "username": USERNAME,
        "email": "landlord@example.com",
        "first_name": "Grace",
        "last_name": "Hopper",
        "role": "landlord",
        "phone": "+1 555 0100",
        "profile_picture": null,
        "must_change_password": false,
        "last_login_at": "2026-10-01T09:30:00Z",
        "created_at": "2026-01-15T12:00:00Z"
    })
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        state.set_valid_access("A1");
        Json(json!({"access": "A1", "refresh": REFRESH_TOKEN})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response()
    }
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let calls = state.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if state.reject_refresh.load(Ordering::SeqCst) || body["refresh"] != REFRESH_TOKEN {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"})),
        )
            .into_response();
    }

    let access = format!("A{}", calls + 1);
    state.set_valid_access(&access);
    Json(json!({"access": access})).into_response()
}

async fn current_user(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    Json(user_json()).into_response()
}

async fn update_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }

    if body.get("email").and_then(Value::as_str) == Some("") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"email": ["Enter a valid email address."]})),
        )
            .into_response();
    }

    let mut user = user_json();
    if let (Value::Object(user), Value::Object(changes)) = (&mut user, body) {
        user.extend(changes);
    }
    Json(json!({"message": "Profile updated successfully", "user": user})).into_response()
}

async fn dashboard_stats(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    Json(json!({
        "total_properties": 3,
        "total_units": 12,
        "occupied_units": 10,
        "monthly_income": "18250.00"
    }))
    .into_response()
}

async fn list_units(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    *state.last_query.lock().unwrap() = query;
    Json(json!({
        "count": 12,
        "next": "http://testserver/api/units/?page=2",
        "previous": null,
        "results": [
            {"id": 1, "unit_number": "1A", "rent_amount": "1450.00"},
            {"id": 2, "unit_number": "1B", "rent_amount": "1500.00"}
        ]
    }))
    .into_response()
}

async fn get_unit(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    if id != 1 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    }
    Json(json!({"id": 1, "unit_number": "1A", "rent_amount": "1450.00"})).into_response()
}

/// PUT needs every writable field
async fn replace_unit(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }

    let missing: serde_json::Map<String, Value> = ["unit_number", "rent_amount"]
        .into_iter()
        .filter(|field| body.get(*field).is_none())
        .map(|field| (field.to_string(), json!(["This field is required."])))
        .collect();
    if !missing.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(Value::Object(missing))).into_response();
    }

    let mut unit = body;
    unit["id"] = json!(id);
    Json(unit).into_response()
}

/// PATCH changes only the fields it is given
async fn patch_unit(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }

    let mut unit = json!({"id": id, "unit_number": "1A", "rent_amount": "1450.00"});
    if let (Value::Object(unit), Value::Object(changes)) = (&mut unit, body) {
        unit.extend(changes);
    }
    Json(unit).into_response()
}

async fn delete_unit(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_properties(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    Json(json!([
        {"id": 1, "name": "Oak Court"},
        {"id": 2, "name": "Maple House"}
    ]))
    .into_response()
}

async fn create_lease(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }

    let rent = body
        .get("rent_amount")
        .and_then(Value::as_str)
        .and_then(|rent| rent.parse::<f64>().ok());
    match rent {
        Some(rent) if rent > 0.0 => {
            let mut lease = body;
            lease["id"] = json!(31);
            (StatusCode::CREATED, Json(lease)).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "rent_amount": ["Ensure this value is greater than 0."],
                "non_field_errors": ["Lease end date must be after start date."]
            })),
        )
            .into_response(),
    }
}

async fn forbidden(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    (
        StatusCode::FORBIDDEN,
        Json(json!({"detail": "You do not have permission to perform this action."})),
    )
        .into_response()
}

async fn server_error(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

async fn respond(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    Json(json!({
        "id": id,
        "response": body["response"],
        "status": "responded"
    }))
    .into_response()
}
