//! HTTP boundary. Requests are routed by [routes::route_request]; axum only carries bytes in
//! and out, and fights run on the blocking pool so the runtime threads stay free.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, Response, StatusCode, Uri};
use axum::Router;
use tracing::{error, info};

use crate::data::loader::load_game_data;
use crate::parallel::WorkerPool;

pub mod api;
pub mod routes;

use routes::{route_request, AppState, HttpResponse};

pub const BIND_ENV: &str = "DUELSIM_BIND";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

impl AppState {
    /// Game data and worker count from the environment.
    pub fn from_env() -> Self {
        Self {
            data: load_game_data(),
            pool: WorkerPool::from_env(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().fallback(dispatch).with_state(Arc::new(state))
}

async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response<Body> {
    let path = uri.path().to_string();
    let routed = tokio::task::spawn_blocking(move || {
        route_request(&state, method.as_str(), &path, &body)
    })
    .await;
    match routed {
        Ok(response) => into_response(response),
        Err(err) => {
            error!(error = %err, "request handler failed");
            into_response(HttpResponse {
                status_code: 500,
                status_text: "Internal Server Error",
                content_type: "application/json",
                body: "{\n  \"status\": \"error\",\n  \"message\": \"Internal error\"\n}"
                    .to_string(),
            })
        }
    }
}

fn into_response(response: HttpResponse) -> Response<Body> {
    let mut http = Response::new(Body::from(response.body));
    *http.status_mut() =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    http.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(response.content_type),
    );
    http
}

pub async fn serve(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("duelsim server listening on http://{bind_addr}");
    axum::serve(listener, router(state)).await
}

pub fn run_server(bind_addr: &str) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(bind_addr, AppState::from_env()))
}
