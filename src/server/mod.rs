//! HTTP surface over [`TestService`]

use crate::error::Error;
use crate::service::{GenerateRequest, RunRequest, TestService};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Routes served under `/tests`, as (path, method)
pub const ROUTES: &[(&str, &str)] = &[
    ("/tests/generate", "POST"),
    ("/tests/run", "POST"),
    ("/tests/:id", "GET"),
    ("/tests/generated/:id", "GET"),
    ("/tests/debug", "GET"),
];

pub fn build_router(service: Arc<TestService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/tests/generate", post(generate))
        .route("/tests/run", post(run))
        .route("/tests/debug", get(debug))
        .route("/tests/generated/:id", get(generated))
        .route("/tests/:id", get(suite_result))
        .with_state(service)
}

/// Serves the API until Ctrl-C
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn serve(service: Arc<TestService>, addr: SocketAddr) -> Result<(), Error> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = build_router(service).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(target: "apiprobe::server", "Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(target: "apiprobe::server", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed
        std::future::pending::<()>().await;
    }
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "apiprobe",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| Error::invalid_request(rejection.body_text()))
}

async fn generate(
    State(service): State<Arc<TestService>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let response = service.generate(body(payload)?).await?;
    Ok(Json(response))
}

async fn run(
    State(service): State<Arc<TestService>>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let result = service.run(body(payload)?).await?;
    Ok(Json(result))
}

async fn suite_result(
    State(service): State<Arc<TestService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    Ok(Json(service.suite_result(&id).await?))
}

async fn generated(
    State(service): State<Arc<TestService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    Ok(Json(service.generated(&id).await?))
}

async fn debug(State(service): State<Arc<TestService>>) -> impl IntoResponse {
    Json(service.debug().await)
}
