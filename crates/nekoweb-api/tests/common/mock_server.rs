//! In-process stand-in for the Nekoweb API and a published site.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::GOOD_TOKEN;

/// One multipart field as received by the upload endpoint.
#[derive(Debug, Clone)]
pub struct ReceivedField {
    pub name: String,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Default)]
pub struct MockState {
    pub hits: AtomicUsize,
    pub upload_posts: AtomicUsize,
    pub auth_headers: Mutex<Vec<String>>,
    pub folder_queries: Mutex<Vec<String>>,
    pub upload_fields: Mutex<Vec<ReceivedField>>,
    pub folder_listing: Mutex<serde_json::Value>,
    pub site_files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockState {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn set_folder(&self, listing: serde_json::Value) {
        *self.folder_listing.lock().unwrap() = listing;
    }

    pub fn publish(&self, path: &str, data: Vec<u8>) {
        self.site_files.lock().unwrap().insert(path.to_string(), data);
    }

    pub fn fields(&self) -> Vec<ReceivedField> {
        self.upload_fields.lock().unwrap().clone()
    }
}

pub struct MockServer {
    pub base: String,
    pub state: Arc<MockState>,
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.auth_headers.lock().unwrap().push(auth.clone());
    auth == GOOD_TOKEN
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "Invalid API key" })),
    )
        .into_response()
}

async fn site_info(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    Json(serde_json::json!({
        "title": "My Site",
        "username": "alice",
        "views": 1234,
    }))
    .into_response()
}

async fn read_folder(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    state
        .folder_queries
        .lock()
        .unwrap()
        .push(params.get("pathname").cloned().unwrap_or_default());
    Json(state.folder_listing.lock().unwrap().clone()).into_response()
}

async fn upload(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    state.upload_posts.fetch_add(1, Ordering::SeqCst);
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(String::from);
        let data = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.upload_fields.lock().unwrap().push(ReceivedField {
            name,
            file_name,
            data,
        });
    }
    "File uploaded".into_response()
}

async fn site_file(
    State(state): State<Arc<MockState>>,
    Path((user, file)): Path<(String, String)>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let key = format!("{}/{}", user, file.trim_start_matches('/'));
    match state.site_files.lock().unwrap().get(&key) {
        Some(data) => Bytes::from(data.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        state.set_folder(serde_json::json!([]));

        let app = Router::new()
            .route("/api/site/info", get(site_info))
            .route("/api/files/readfolder", get(read_folder))
            .route("/api/files/upload", post(upload))
            .route("/sites/:user/*file", get(site_file))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base: format!("http://{}", addr),
            state,
        }
    }
}
