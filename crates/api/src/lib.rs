//! # Timetable API
//!
//! HTTP server for building school timetables: accounts and sessions,
//! reference data (classes, sections, subjects, teachers, time slots),
//! timetables with their settings, and the per-class grid of entries.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths, one module per resource
//! - **Handlers**: request processing on top of the `timetable-db` stores
//! - **Middleware**: authentication and error mapping
//! - **Config**: environment configuration
//!
//! Storage is reached through a shared [`Repository`](timetable_db::Repository),
//! either PostgreSQL or the in-memory implementation.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use timetable_db::SharedRepository;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// State shared by every request handler.
pub struct ApiState {
    pub repo: SharedRepository,
    /// Lifetime of a newly issued login session.
    pub session_ttl: chrono::Duration,
}

impl ApiState {
    pub fn new(repo: SharedRepository, session_ttl_hours: i64) -> Self {
        Self {
            repo,
            session_ttl: chrono::Duration::hours(session_ttl_hours),
        }
    }
}

/// All routes with the shared state attached.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::auth::routes())
        .merge(routes::timetables::routes())
        .merge(routes::classes::routes())
        .merge(routes::staff::routes())
        .merge(routes::time_slots::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Sets up logging and serves the API until the process is stopped.
pub async fn start_server(config: config::ApiConfig, repo: SharedRepository) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(repo, config.session_ttl_hours));
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(
                |_: tower::BoxError| async { axum::http::StatusCode::REQUEST_TIMEOUT },
            ))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
