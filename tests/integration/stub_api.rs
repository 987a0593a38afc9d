//! Minimal HTTP stub of the Gcore API for integration tests.
//!
//! Serves canned responses keyed by method and path on a background thread with its own
//! runtime, and records every request it sees.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Canned response for one (method, path) pair.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub status: u16,
    pub body: String,
}

/// Request metadata captured by the stub.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
struct StubState {
    fixtures: Arc<HashMap<(String, String), Fixture>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Builder for the stub's fixture table.
#[derive(Default)]
pub struct StubApi {
    fixtures: HashMap<(String, String), Fixture>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn respond(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.fixtures.insert(
            (method.to_uppercase(), path.to_string()),
            Fixture {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn spawn(self) -> Result<StubHandle, String> {
        let listener = StdTcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("stub bind failed: {err}"))?;
        listener
            .set_nonblocking(true)
            .map_err(|err| format!("stub listener nonblocking failed: {err}"))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("stub local addr failed: {err}"))?;

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            fixtures: Arc::new(self.fixtures),
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(handle).with_state(state);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let join = thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(_) => return,
            };
            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(listener) {
                    Ok(listener) => listener,
                    Err(_) => return,
                };
                let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });
                let _ = server.await;
            });
        });

        Ok(StubHandle {
            base_url: format!("http://{addr}"),
            shutdown: Some(shutdown_tx),
            join: Some(join),
            requests,
        })
    }
}

/// Running stub server; stops on drop.
pub struct StubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubHandle {
    /// API root, without any family suffix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Recorded requests matching `method path`.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

impl Drop for StubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: body.to_vec(),
    };
    if let Ok(mut entries) = state.requests.lock() {
        entries.push(recorded);
    }

    let key = (method.as_str().to_string(), uri.path().to_string());
    let (status, body) = match state.fixtures.get(&key) {
        Some(fixture) => (
            StatusCode::from_u16(fixture.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            fixture.body.clone(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            format!(r#"{{"message":"no fixture for {} {}"}}"#, key.0, key.1),
        ),
    };
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}
