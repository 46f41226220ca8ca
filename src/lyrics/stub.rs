//! In-process stand-in for the LRCLIB API, bound to an ephemeral port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

pub(crate) struct StubApi {
    candidates: Value,
    records: HashMap<String, Value>,
    search_fails: bool,
    malformed: bool,
    get_delay: Duration,
    search_hits: AtomicUsize,
    get_hits: AtomicUsize,
    last_search: Mutex<Option<HashMap<String, String>>>,
}

pub(crate) struct StubServer {
    pub base_url: String,
    pub api: Arc<StubApi>,
}

impl StubApi {
    /// `candidates` is returned verbatim by every search.
    pub fn new(candidates: Value) -> Self {
        Self {
            candidates,
            records: HashMap::new(),
            search_fails: false,
            malformed: false,
            get_delay: Duration::ZERO,
            search_hits: AtomicUsize::new(0),
            get_hits: AtomicUsize::new(0),
            last_search: Mutex::new(None),
        }
    }

    pub fn with_record(mut self, id: &str, body: Value) -> Self {
        self.records.insert(id.to_string(), body);
        self
    }

    pub fn with_search_failure(mut self) -> Self {
        self.search_fails = true;
        self
    }

    /// Both endpoints answer 200 with a body that is not JSON.
    pub fn with_malformed_bodies(mut self) -> Self {
        self.malformed = true;
        self
    }

    pub fn with_get_delay(mut self, delay: Duration) -> Self {
        self.get_delay = delay;
        self
    }

    pub fn search_hits(&self) -> usize {
        self.search_hits.load(Ordering::SeqCst)
    }

    pub fn get_hits(&self) -> usize {
        self.get_hits.load(Ordering::SeqCst)
    }

    pub fn last_search(&self) -> Option<HashMap<String, String>> {
        self.last_search.lock().unwrap().clone()
    }

    pub async fn spawn(self) -> StubServer {
        let api = Arc::new(self);
        let app = Router::new()
            .route("/api/search", get(search))
            .route("/api/get/{id}", get(get_record))
            .with_state(api.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        StubServer {
            base_url: format!("http://{addr}"),
            api,
        }
    }
}

async fn search(
    State(api): State<Arc<StubApi>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    api.search_hits.fetch_add(1, Ordering::SeqCst);
    *api.last_search.lock().unwrap() = Some(params);
    if api.search_fails {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if api.malformed {
        return malformed_body();
    }
    Json(api.candidates.clone()).into_response()
}

async fn get_record(State(api): State<Arc<StubApi>>, Path(id): Path<String>) -> Response {
    api.get_hits.fetch_add(1, Ordering::SeqCst);
    if !api.get_delay.is_zero() {
        tokio::time::sleep(api.get_delay).await;
    }
    if api.malformed {
        return malformed_body();
    }
    match api.records.get(&id) {
        Some(body) => Json(body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn malformed_body() -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        "{\"syncedLyrics\": [00:01.00]",
    )
        .into_response()
}
