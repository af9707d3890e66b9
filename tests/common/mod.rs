//! Test helpers for integration tests.
//!
//! Provides `FakeDrive`, an in-process stand-in for the drive REST API that
//! records every request it receives, and helpers to build clients against it.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::async_trait;
use axum::extract::{FromRequestParts, Multipart, Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use tokio::sync::broadcast;

use mydrive::{Config, DriveClient, MemoryTokenStore, Notice, TokenStore, UiEvent};

/// Account every fake drive starts with.
pub const SEEDED_EMAIL: &str = "alice@example.org";
/// Password of the seeded account.
pub const SEEDED_PASSWORD: &str = "secret1";
/// Contents served for `GET /api/download/file1`.
pub const FILE1_CONTENT: &[u8] = b"hello from the drive";

const SIGNING_SECRET: &[u8] = b"fake-drive-secret";

/// A request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Path plus query string.
    pub path: String,
    /// Raw Authorization header.
    pub authorization: Option<String>,
}

/// A multipart upload as the fake server saw it.
#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Default)]
pub struct FakeState {
    requests: Mutex<Vec<RecordedRequest>>,
    tokens: Mutex<HashSet<String>>,
    users: Mutex<HashMap<String, String>>,
    uploads: Mutex<Vec<ReceivedUpload>>,
    json_bodies: Mutex<Vec<Value>>,
    reject_all: AtomicBool,
}

#[derive(Serialize)]
struct Claims {
    sub: String,
    email: String,
    exp: u64,
}

impl FakeState {
    fn mint(&self, email: &str) -> String {
        let claims = Claims {
            sub: email.to_string(),
            email: email.to_string(),
            exp: 4_102_444_800,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SIGNING_SECRET),
        )
        .expect("failed to sign token");
        self.tokens.lock().unwrap().insert(token.clone());
        token
    }

    fn is_valid(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| self.tokens.lock().unwrap().contains(token))
            .unwrap_or(false)
    }
}

/// Extractor that records the request before the handler runs, and answers
/// 401 itself when the server is rejecting everything.
struct Recorded;

#[async_trait]
impl FromRequestParts<Arc<FakeState>> for Recorded {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<FakeState>,
    ) -> Result<Self, Self::Rejection> {
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        state.requests.lock().unwrap().push(RecordedRequest {
            method: parts.method.to_string(),
            path,
            authorization,
        });
        if state.reject_all.load(Ordering::SeqCst) {
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(Recorded)
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "Unauthorized")
}

#[derive(Deserialize)]
struct CredentialsBody {
    email: String,
    password: String,
}

async fn login(
    State(state): State<Arc<FakeState>>,
    _: Recorded,
    Json(body): Json<CredentialsBody>,
) -> Response {
    let known = state.users.lock().unwrap().get(&body.email).cloned();
    match known {
        Some(password) if password == body.password => {
            Json(json!({ "token": state.mint(&body.email) })).into_response()
        }
        _ => error(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn register(
    State(state): State<Arc<FakeState>>,
    _: Recorded,
    Json(body): Json<CredentialsBody>,
) -> Response {
    let mut users = state.users.lock().unwrap();
    if users.contains_key(&body.email) {
        return error(StatusCode::CONFLICT, "Email already in use");
    }
    users.insert(body.email.clone(), body.password);
    drop(users);
    (
        StatusCode::CREATED,
        Json(json!({ "token": state.mint(&body.email) })),
    )
        .into_response()
}

fn root_listing() -> Value {
    json!({
        "files": [
            {"id": "file1", "name": "Project Proposal.pdf", "size": 2621440, "createdAt": "2023-06-15T10:30:00Z"},
            {"id": "file2", "name": "Budget.xlsx", "size": 524288}
        ],
        "folders": [
            {"id": "docs", "name": "Documents", "parentId": null, "createdAt": "2023-06-10T08:00:00Z"}
        ]
    })
}

async fn list_files(State(state): State<Arc<FakeState>>, _: Recorded, headers: HeaderMap) -> Response {
    if !state.is_valid(&headers) {
        return unauthorized();
    }
    Json(root_listing()).into_response()
}

async fn get_folder(
    State(state): State<Arc<FakeState>>,
    _: Recorded,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.is_valid(&headers) {
        return unauthorized();
    }
    match id.as_str() {
        "docs" => Json(json!({
            "folder": {"id": "docs", "name": "Documents", "parentId": null},
            "files": [{"id": "file3", "name": "Meeting Notes.docx", "size": 262144}],
            "folders": []
        }))
        .into_response(),
        "bare-folder-id" => Json(json!({ "files": [], "folders": [] })).into_response(),
        "legacy" => Json(json!({
            "folder": {"id": "legacy", "name": "Archive", "createdAt": "2019-01-02 03:04:05"},
            "files": [{"id": "old1", "name": "x.pdf", "size": 10, "createdAt": "2023-06-15 10:30:00"}],
            "folders": [{"id": "old2", "name": "Scans", "createdAt": "sometime"}]
        }))
        .into_response(),
        _ => error(StatusCode::NOT_FOUND, "Folder not found"),
    }
}

async fn create_folder(
    State(state): State<Arc<FakeState>>,
    _: Recorded,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.is_valid(&headers) {
        return unauthorized();
    }
    state.json_bodies.lock().unwrap().push(body.clone());
    let name = body["name"].as_str().unwrap_or_default().to_string();
    match name.as_str() {
        "Documents" => {
            return error(StatusCode::CONFLICT, "A folder with this name already exists")
        }
        "Quiet" => return StatusCode::NO_CONTENT.into_response(),
        _ => {}
    }
    (
        StatusCode::CREATED,
        Json(json!({ "id": "new-folder", "name": name, "parentId": body["parentId"] })),
    )
        .into_response()
}

async fn upload(
    State(state): State<Arc<FakeState>>,
    _: Recorded,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !state.is_valid(&headers) {
        return unauthorized();
    }
    let mut last_name = String::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let received = ReceivedUpload {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            content: Vec::new(),
        };
        let content = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        last_name = received.file_name.clone().unwrap_or_default();
        state.uploads.lock().unwrap().push(ReceivedUpload {
            content,
            ..received
        });
    }
    if last_name == "ack.txt" {
        return Json(json!({ "success": true })).into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "id": "uploaded-1", "name": last_name, "size": 5 })),
    )
        .into_response()
}

async fn download(
    State(state): State<Arc<FakeState>>,
    _: Recorded,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.is_valid(&headers) {
        return unauthorized();
    }
    if id == "file1" {
        FILE1_CONTENT.into_response()
    } else {
        error(StatusCode::NOT_FOUND, "File not found")
    }
}

async fn preview(
    State(state): State<Arc<FakeState>>,
    _: Recorded,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.is_valid(&headers) {
        return unauthorized();
    }
    Json(json!({ "previewUrl": format!("https://cdn.example.test/preview/{}", id) }))
        .into_response()
}

async fn rename(
    State(state): State<Arc<FakeState>>,
    _: Recorded,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !state.is_valid(&headers) {
        return unauthorized();
    }
    state.json_bodies.lock().unwrap().push(body.clone());
    let new_name = body["newName"].as_str().unwrap_or_default().to_string();
    match new_name.as_str() {
        "taken.pdf" => return error(StatusCode::CONFLICT, "Name already exists"),
        "no-content.txt" => return StatusCode::NO_CONTENT.into_response(),
        "wrapped.txt" => {
            return Json(json!({ "success": true, "item": { "id": id, "name": new_name } }))
                .into_response()
        }
        _ => {}
    }
    Json(json!({ "id": id, "name": new_name })).into_response()
}

async fn not_found(_: Recorded) -> Response {
    error(StatusCode::NOT_FOUND, "Not found")
}

/// In-process fake of the drive REST API.
pub struct FakeDrive {
    pub addr: SocketAddr,
    pub state: Arc<FakeState>,
}

impl FakeDrive {
    /// Start a fake server on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        state
            .users
            .lock()
            .unwrap()
            .insert(SEEDED_EMAIL.to_string(), SEEDED_PASSWORD.to_string());

        let app = Router::new()
            .route("/api/login", post(login))
            .route("/api/register", post(register))
            .route("/api/files", get(list_files))
            .route("/api/folder", post(create_folder))
            .route("/api/folder/:id", get(get_folder))
            .route("/api/upload", post(upload))
            .route("/api/download/:id", get(download))
            .route("/api/preview/:id", get(preview))
            .route("/api/rename/:id", put(rename))
            .fallback(not_found)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake drive");
        let addr = listener.local_addr().expect("no local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, state }
    }

    /// Base URL to configure clients with.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Issue a token the server will accept.
    pub fn issue_token(&self, email: &str) -> String {
        self.state.mint(email)
    }

    /// Make every issued token invalid, as if they all expired.
    pub fn revoke_all_tokens(&self) {
        self.state.tokens.lock().unwrap().clear();
    }

    /// Answer 401 to every request from now on, login and register included.
    pub fn reject_everything(&self) {
        self.state.reject_all.store(true, Ordering::SeqCst);
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .last()
            .cloned()
            .expect("no request recorded")
    }

    /// Every multipart part received so far.
    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.uploads.lock().unwrap().clone()
    }

    /// Every JSON body received by folder creation and rename.
    pub fn json_bodies(&self) -> Vec<Value> {
        self.state.json_bodies.lock().unwrap().clone()
    }
}

/// Configuration pointing at a fake drive.
pub fn config_for(drive: &FakeDrive) -> Config {
    let mut config = Config::default();
    config.api.base_url = drive.base_url();
    config.api.timeout_secs = 5;
    config
}

/// Client over an in-memory store, optionally seeded with a token.
pub fn client_for(drive: &FakeDrive, token: Option<String>) -> (DriveClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let client = DriveClient::with_store(config_for(drive), store.clone() as Arc<dyn TokenStore>)
        .expect("failed to build client");
    (client, store)
}

/// Every event already published on a subscription.
pub fn drain_events(rx: &mut broadcast::Receiver<UiEvent>) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Only the notices among `events`.
pub fn notices(events: &[UiEvent]) -> Vec<Notice> {
    events
        .iter()
        .filter_map(|event| match event {
            UiEvent::Notify(notice) => Some(notice.clone()),
            _ => None,
        })
        .collect()
}
