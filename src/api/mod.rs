use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    Router,
    extract::{Json, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::compute;
use crate::core::FallbackDefaults;
use crate::wire::{
    ChatRequestBody, ErrorBody, GapCheckRequestBody, LifetimeFailureBody, LifetimeRequestBody,
    SimulateRequestBody,
};

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone)]
pub struct AppState {
    defaults: FallbackDefaults,
    chat_seed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(defaults: FallbackDefaults) -> Self {
        Self {
            defaults,
            chat_seed: Arc::new(AtomicU64::new(1)),
        }
    }

    fn next_chat_seed(&self) -> u64 {
        self.chat_seed.fetch_add(1, Ordering::Relaxed)
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    project: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/simulate", post(simulate_handler))
        .route("/api/lifetime", post(lifetime_handler))
        .route("/api/gap-check", post(gap_check_handler))
        .route("/api/chat", post(chat_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(port: u16, defaults: FallbackDefaults) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(AppState::new(defaults)).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    info!("Equity Gap API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "running",
            project: "The Equity Gap",
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_handler(
    State(state): State<AppState>,
    Json(payload): Json<SimulateRequestBody>,
) -> Response {
    let request = match payload.to_request(&state.defaults) {
        Ok(request) => request,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    match compute::simulate(&request) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

async fn lifetime_handler(
    State(state): State<AppState>,
    Json(payload): Json<LifetimeRequestBody>,
) -> Response {
    let result = payload
        .to_request()
        .and_then(|request| compute::lifetime(&request, &state.defaults));
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => json_response(
            StatusCode::BAD_REQUEST,
            LifetimeFailureBody::new(err.to_string()),
        ),
    }
}

async fn gap_check_handler(Json(payload): Json<GapCheckRequestBody>) -> Response {
    match compute::gap_check(&payload) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequestBody>,
) -> Response {
    json_response(
        StatusCode::OK,
        compute::chat(&payload, state.next_chat_seed()),
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorBody {
            error: msg.to_string(),
        },
    )
}
