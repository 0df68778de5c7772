#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web};
use serde_json::{json, Value};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use talent_directory::app::{bootstrap_admin, AppState};
use talent_directory::auth::{AuthResponse, TokenKeys};
use talent_directory::config::AdminBootstrap;
use talent_directory::messaging::{LogMessenger, Messenger, MessengerError};
use talent_directory::store::{MemoryStore, Store};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const PASSWORD: &str = "password123";

/// Builds the test service the same way `main.rs` does, minus CORS and logging.
#[allow(unused_macros)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .configure(talent_directory::app::configure),
        )
        .await
    };
}

/// Application state over a fresh in-memory store with a bootstrapped admin.
pub async fn test_state() -> web::Data<AppState> {
    test_state_with(Arc::new(LogMessenger)).await
}

/// Like [`test_state`], delivering contact messages through `messenger`.
pub async fn test_state_with(messenger: Arc<dyn Messenger>) -> web::Data<AppState> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    bootstrap_admin(
        store.as_ref(),
        &AdminBootstrap {
            email: ADMIN_EMAIL.into(),
            password: ADMIN_PASSWORD.into(),
        },
    )
    .await
    .expect("admin bootstrap");
    web::Data::new(
        AppState::new(store, TokenKeys::new("test-secret", 1)).with_messenger(messenger),
    )
}

/// Keeps every message it is asked to deliver.
#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<(Uuid, String, String)>>,
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, recipient: Uuid, subject: &str, body: &str) -> Result<(), MessengerError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient, subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// A transport that is always down.
pub struct FailingMessenger;

#[async_trait]
impl Messenger for FailingMessenger {
    async fn send(&self, _: Uuid, _: &str, _: &str) -> Result<(), MessengerError> {
        Err(MessengerError::Transport("connection refused".into()))
    }
}

/// Authenticated account used by the tests.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

/// Sends a request and returns the status with the parsed JSON body
/// (`Value::Null` for empty bodies).
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
        })
    };
    (status, body)
}

async fn authenticate<S, B>(app: &S, uri: &str, payload: Value) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .set_json(&payload)
        .to_request();
    let (status, body) = send(app, req).await;
    assert!(status.is_success(), "{} failed: {} {}", uri, status, body);
    let auth: AuthResponse = serde_json::from_value(body).expect("auth response");
    TestUser {
        id: auth.user.id,
        token: auth.token,
    }
}

pub fn talent_payload(name: &str, email: &str, role: &str, category: &str, location: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": PASSWORD,
        "purpose": "talent",
        "talentRole": role,
        "category": category,
        "experience": "3+ years",
        "location": location,
        "skills": ["Teamwork"],
        "bio": format!("{} based in {}", category, location),
    })
}

pub async fn register_talent<S, B>(
    app: &S,
    name: &str,
    email: &str,
    role: &str,
    category: &str,
    location: &str,
) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    authenticate(
        app,
        "/api/auth/register",
        talent_payload(name, email, role, category, location),
    )
    .await
}

pub async fn register_client<S, B>(app: &S, email: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    authenticate(
        app,
        "/api/auth/register",
        json!({
            "name": "Studio Owner",
            "email": email,
            "password": PASSWORD,
            "purpose": "professional",
            "companyName": "Indie Co",
        }),
    )
    .await
}

pub async fn login_admin<S, B>(app: &S) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    authenticate(
        app,
        "/api/auth/admin/login",
        json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await
}

pub fn project_payload(status: &str) -> Value {
    json!({
        "title": "Night Shift",
        "type": "film",
        "status": status,
        "description": "A short film shot over three weekends",
        "location": "Austin, TX",
        "budget": { "min": 1000, "max": 5000 },
        "timeline": {
            "startDate": "2030-01-01T00:00:00Z",
            "endDate": "2030-03-01T00:00:00Z",
            "castingDeadline": "2030-01-15T00:00:00Z"
        },
        "roles": [{
            "title": "Sound Designer",
            "description": "Foley and final mix",
            "type": "production",
            "category": "Sound Design",
            "experience": "3+ years",
            "skills": ["Foley"],
            "budget": { "min": 500, "max": 1500 }
        }],
        "companyName": "Indie Co",
        "tags": ["short", "indie"]
    })
}

/// Creates a project as `owner` and returns its JSON representation.
pub async fn create_project<S, B>(app: &S, owner: &TestUser, status: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(owner.bearer())
        .set_json(&project_payload(status))
        .to_request();
    let (status_code, body) = send(app, req).await;
    assert_eq!(status_code, StatusCode::CREATED, "{}", body);
    body["data"].clone()
}

/// Files an application for the first role of `project` and returns it.
pub async fn apply<S, B>(app: &S, talent: &TestUser, project: &Value) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/applications")
        .insert_header(talent.bearer())
        .set_json(&json!({
            "projectId": project["id"],
            "roleId": project["requirements"]["roles"][0]["id"],
            "coverLetter": "I would love to work on this",
            "proposedRate": 900
        }))
        .to_request();
    send(app, req).await
}
