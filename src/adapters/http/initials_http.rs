//! Initials HTTP Server.
//!
//! Accepts an employee name and answers with freshly allocated initials.
//! Exhaustion and store timeouts map to distinct status codes so callers can
//! tell "no code for this name" apart from "try again later".

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::errors::AllocationError;
use crate::domain::models::{AllocationOutcome, ServerConfig};
use crate::domain::ports::InitialsStore;
use crate::services::AllocationService;

/// Request to allocate initials.
#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    #[serde(default, alias = "EmployeeName")]
    pub employee_name: String,
}

/// Response with allocated initials.
#[derive(Debug, Serialize, Deserialize)]
pub struct AllocateResponse {
    pub employee_initials: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
}

/// Shared state for the initials HTTP server.
struct AppState<S: InitialsStore + ?Sized> {
    service: AllocationService<S>,
}

/// Initials HTTP Server.
pub struct InitialsHttpServer<S: InitialsStore + ?Sized + 'static> {
    config: ServerConfig,
    service: AllocationService<S>,
}

impl<S: InitialsStore + ?Sized + 'static> InitialsHttpServer<S> {
    pub const fn new(service: AllocationService<S>, config: ServerConfig) -> Self {
        Self { config, service }
    }

    /// Build the router.
    pub fn build_router(self) -> Router {
        let state = Arc::new(AppState {
            service: self.service,
        });

        let app = Router::new()
            .route("/api/v1/initials", post(allocate_initials::<S>))
            .route("/health", get(health_check))
            .with_state(state);

        if self.config.enable_cors {
            app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        tracing::info!("Initials HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

async fn allocate_initials<S: InitialsStore + ?Sized + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<AllocateRequest>,
) -> Result<Json<AllocateResponse>, ApiError> {
    let name = req.employee_name.trim();
    if name.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "EmployeeName is required.",
            "NAME_REQUIRED",
        ));
    }

    tracing::info!("Processing initials request");

    match state.service.execute(name).await {
        Ok(AllocationOutcome::Allocated(allocation)) => Ok(Json(AllocateResponse {
            employee_initials: allocation.initials,
        })),
        Ok(AllocationOutcome::Exhausted { .. }) => Err(api_error(
            StatusCode::CONFLICT,
            "Unable to generate unique initials after multiple attempts.",
            "EXHAUSTED",
        )),
        Ok(AllocationOutcome::TransientFailure { .. }) => Err(api_error(
            StatusCode::REQUEST_TIMEOUT,
            "Store timed out, try again",
            "STORE_TIMEOUT",
        )),
        Err(AllocationError::DeadlineExceeded(_)) => Err(api_error(
            StatusCode::GATEWAY_TIMEOUT,
            "Allocation did not finish in time, try again",
            "DEADLINE_EXCEEDED",
        )),
        Err(e) => {
            tracing::error!("Allocation failed: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
                "ALLOCATION_ERROR",
            ))
        }
    }
}
