use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone)]
pub struct HealthState {
    backend_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub generation: HealthCheck,
    pub checked_at: String,
}

pub fn router(backend_count: usize) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { backend_count })
}

pub async fn spawn(bind_address: &str, port: u16, backend_count: usize) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router(backend_count)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %err,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let generation = if state.backend_count > 0 {
        HealthCheck {
            status: "ready",
            detail: format!("{} generation backends configured", state.backend_count),
        }
    } else {
        HealthCheck { status: "degraded", detail: "no generation backends configured".to_string() }
    };
    let ready = generation.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "sokoni-server runtime initialized".to_string(),
        },
        generation,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
