//! Test helpers for marketplace-frontend integration tests.
//!
//! Spawns an in-process stand-in for the marketplace REST backend on an
//! ephemeral port and builds an [`AppState`] wired against it.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use marketplace_frontend::config::ApiSettings;
use marketplace_frontend::services::AuthClient;
use marketplace_frontend::session::{KeyValueStorage, MemoryStorage};
use marketplace_frontend::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const PASSWORD: &str = "secret123";
pub const USER_EMAIL: &str = "user@example.com";
pub const CHEF_EMAIL: &str = "rina@example.com";
pub const ADMIN_EMAIL: &str = "admin@example.com";
/// Logins for this account take [`SLOW_LOGIN`] to answer.
pub const SLOW_EMAIL: &str = "slow@example.com";
pub const TAKEN_EMAIL: &str = "taken@example.com";
/// A chef whose chef id has not been assigned yet.
pub const NEW_CHEF_EMAIL: &str = "new-chef@example.com";
pub const SLOW_LOGIN: Duration = Duration::from_millis(400);

/// Profiles the fake backend knows, keyed by email. Tests may edit them to
/// simulate an admin changing someone's role.
#[derive(Clone)]
pub struct Backend {
    pub profiles: Arc<Mutex<HashMap<String, Value>>>,
}

impl Backend {
    fn new() -> Self {
        let profiles = [
            json!({"email": USER_EMAIL, "name": "Uma User", "role": "user", "status": "active"}),
            json!({"email": CHEF_EMAIL, "name": "Rina Das", "role": "chef", "status": "active", "chefId": "chef-4821"}),
            json!({"email": ADMIN_EMAIL, "name": "Ada Admin", "role": "admin", "status": "active"}),
            json!({"email": NEW_CHEF_EMAIL, "name": "Nila Sen", "role": "chef", "status": "active"}),
            json!({"email": SLOW_EMAIL, "name": "Sam Slow", "role": "user", "status": "active"}),
        ]
        .into_iter()
        .map(|profile| (profile["email"].as_str().unwrap_or_default().to_string(), profile))
        .collect();

        Self {
            profiles: Arc::new(Mutex::new(profiles)),
        }
    }

    pub fn set_role(&self, email: &str, role: &str) {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.get_mut(email).unwrap();
        profile["role"] = json!(role);
    }

    pub fn set_status(&self, email: &str, status: &str) {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.get_mut(email).unwrap();
        profile["status"] = json!(status);
    }

    fn profile(&self, email: &str) -> Option<Value> {
        self.profiles.lock().unwrap().get(email).cloned()
    }
}

pub fn token_for(email: &str) -> String {
    format!("token-{}", email)
}

async fn login(State(backend): State<Backend>, Json(body): Json<Value>) -> impl IntoResponse {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if email == SLOW_EMAIL {
        tokio::time::sleep(SLOW_LOGIN).await;
    }

    match backend.profile(&email) {
        Some(user) if body["password"] == PASSWORD => (
            StatusCode::OK,
            Json(json!({"user": user, "token": token_for(&email)})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password"})),
        ),
    }
}

async fn register(State(backend): State<Backend>, Json(body): Json<Value>) -> impl IntoResponse {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if email == TAKEN_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "User already exists"})),
        );
    }

    let user = json!({
        "email": email,
        "name": body["name"],
        "role": "user",
        "status": "active",
        "profileImage": body["profileImage"],
    });
    backend
        .profiles
        .lock()
        .unwrap()
        .insert(email.clone(), user.clone());

    (
        StatusCode::CREATED,
        Json(json!({"user": user, "token": token_for(&email)})),
    )
}

async fn user_profile(
    State(backend): State<Backend>,
    Path(email): Path<String>,
) -> impl IntoResponse {
    match backend.profile(&email) {
        Some(user) => (StatusCode::OK, Json(user)),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "User not found"})),
        ),
    }
}

async fn echo_auth(headers: HeaderMap) -> Json<Value> {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());
    Json(json!({ "authorization": authorization }))
}

async fn expired() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Token expired"})),
    )
}

async fn broken() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "Database unavailable"})),
    )
}

async fn invalid() -> impl IntoResponse {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"message": "Quantity must be at least 1", "field": "quantity"})),
    )
}

fn catalogue() -> Value {
    json!([
        {
            "_id": "meal-1",
            "foodName": "Shorshe Ilish",
            "chefName": "Rina Das",
            "chefId": "chef-4821",
            "foodImage": "https://img.example.com/ilish.png",
            "price": 12.5,
            "rating": 4.8,
            "ingredients": ["hilsa", "mustard"],
            "estimatedDeliveryTime": "45 minutes",
            "deliveryArea": "Dhanmondi"
        },
        {
            "_id": "meal-2",
            "foodName": "Khichuri",
            "chefName": "Rina Das",
            "chefId": "chef-4821",
            "price": 6.0
        }
    ])
}

async fn meals() -> Json<Value> {
    Json(catalogue())
}

async fn meal(Path(id): Path<String>) -> impl IntoResponse {
    let found = catalogue()
        .as_array()
        .and_then(|meals| meals.iter().find(|meal| meal["_id"] == id.as_str()).cloned());

    match found {
        Some(meal) => (StatusCode::OK, Json(meal)),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Meal not found"})),
        ),
    }
}

async fn place_order(Json(order): Json<Value>) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(json!({"insertedId": "order-2", "paymentStatus": order["paymentStatus"]})),
    )
}

async fn orders() -> Json<Value> {
    Json(json!([
        {"_id": "order-1", "mealName": "Khichuri", "quantity": 2, "orderStatus": "pending"}
    ]))
}

pub struct MockBackend {
    pub address: SocketAddr,
    pub backend: Backend,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let backend = Backend::new();
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/users/:email", get(user_profile))
            .route("/echo-auth", get(echo_auth))
            .route("/expired", get(expired))
            .route("/broken", get(broken))
            .route("/invalid", get(invalid))
            .route("/meals", get(meals))
            .route("/meals/:id", get(meal))
            .route("/orders", get(orders).post(place_order))
            .with_state(backend.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let address = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend failed");
        });

        Self { address, backend }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url(),
            request_timeout_secs: 5,
        }
    }
}

/// Application state wired against a running [`MockBackend`].
pub struct TestApp {
    pub state: AppState,
    pub storage: Arc<dyn KeyValueStorage>,
    pub mock: MockBackend,
}

impl TestApp {
    /// Fresh app whose session is still hydrating.
    pub async fn spawn() -> Self {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        Self::with_storage(storage).await
    }

    pub async fn with_storage(storage: Arc<dyn KeyValueStorage>) -> Self {
        let mock = MockBackend::spawn().await;
        let state = app_state(&mock.api_settings(), storage.clone());
        Self {
            state,
            storage,
            mock,
        }
    }

    /// Fresh app with the (empty) persisted session already restored.
    pub async fn hydrated() -> Self {
        let app = Self::spawn().await;
        app.state.session.hydrate().await;
        app
    }

    pub async fn signed_in(email: &str) -> Self {
        let app = Self::hydrated().await;
        app.state
            .session
            .login(email, PASSWORD)
            .await
            .expect("Login against the mock backend failed");
        app
    }
}

pub fn app_state(settings: &ApiSettings, storage: Arc<dyn KeyValueStorage>) -> AppState {
    let auth_client = Arc::new(AuthClient::new(settings).expect("Failed to build auth client"));
    AppState::new(settings, storage, auth_client).expect("Failed to build app state")
}
