//! In-process fake of the catalog REST resource
//!
//! Serves `GET/POST /api/products/` and `DELETE /api/products/{id}` from an
//! in-memory list. The server is stopped when the handle is dropped.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

const COLLECTION_PATH: &str = "/api/products/";

/// One request as seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string, still percent-encoded
    pub query: Option<String>,
}

#[derive(Debug)]
struct Failure {
    remaining: usize,
    status: StatusCode,
    body: String,
}

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Value>,
    requests: Vec<RecordedRequest>,
    failure: Option<Failure>,
    next_id: i64,
}

type SharedState = Arc<Mutex<CatalogState>>;

/// Fake catalog bound to an ephemeral port on 127.0.0.1
pub struct CatalogServer {
    addr: SocketAddr,
    state: SharedState,
    handle: JoinHandle<()>,
}

impl CatalogServer {
    /// Start serving `products` (wire JSON objects, in response order).
    ///
    /// # Panics
    /// Panics when no local port can be bound.
    pub async fn start(products: Vec<Value>) -> Self {
        let next_id = products
            .iter()
            .filter_map(|p| p.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;

        let state: SharedState = Arc::new(Mutex::new(CatalogState {
            products,
            next_id,
            ..CatalogState::default()
        }));

        let router = Router::new()
            .route(COLLECTION_PATH, get(list_products).post(create_product))
            .route("/api/products/{id}", delete(delete_product))
            .fallback(not_found)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake catalog listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake catalog address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Fake catalog stopped: {:?}", e);
            }
        });

        tracing::debug!(%addr, "Fake catalog ready");

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Collection URL with trailing slash, e.g. `http://127.0.0.1:4321/api/products/`
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, COLLECTION_PATH)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Answer the next `count` requests with `status` and `body`.
    pub fn fail_next(&self, count: usize, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.lock().failure = Some(Failure {
            remaining: count,
            status,
            body: body.to_string(),
        });
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Current contents of the fake collection
    pub fn products(&self) -> Vec<Value> {
        self.lock().products.clone()
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        lock(&self.state)
    }
}

impl Drop for CatalogServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn lock(state: &SharedState) -> MutexGuard<'_, CatalogState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Record the request and consume one injected failure, if any.
fn admit(state: &SharedState, method: Method, uri: &Uri) -> Result<(), Response> {
    let mut guard = lock(state);
    guard.requests.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
    });

    if let Some(failure) = guard.failure.as_mut() {
        if failure.remaining > 0 {
            failure.remaining -= 1;
            return Err((failure.status, failure.body.clone()).into_response());
        }
    }
    Ok(())
}

async fn list_products(State(state): State<SharedState>, uri: Uri) -> Response {
    if let Err(response) = admit(&state, Method::GET, &uri) {
        return response;
    }
    Json(lock(&state).products.clone()).into_response()
}

async fn create_product(
    State(state): State<SharedState>,
    uri: Uri,
    Json(mut payload): Json<Value>,
) -> Response {
    if let Err(response) = admit(&state, Method::POST, &uri) {
        return response;
    }

    let mut guard = lock(&state);
    let id = guard.next_id;
    guard.next_id += 1;

    if let Some(object) = payload.as_object_mut() {
        object.insert("id".to_string(), Value::from(id));
    }
    // Newest first, like the modified-date ordering of the real resource
    guard.products.insert(0, payload.clone());

    (StatusCode::CREATED, Json(payload)).into_response()
}

async fn delete_product(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Response {
    if let Err(response) = admit(&state, Method::DELETE, &uri) {
        return response;
    }

    let mut guard = lock(&state);
    let before = guard.products.len();
    guard
        .products
        .retain(|p| p.get("id").and_then(Value::as_i64) != Some(id));

    if guard.products.len() < before {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::NOT_FOUND, format!("Product {} not found", id)).into_response()
    }
}

async fn not_found(State(state): State<SharedState>, method: Method, uri: Uri) -> Response {
    if let Err(response) = admit(&state, method, &uri) {
        return response;
    }
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
