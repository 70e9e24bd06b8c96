//! # podbox-api: Generic Issuance Server
//!
//! Hosts issuance pipelines loaded from a definition file and serves the
//! credential-gated feed protocol.
//!
//! ## API Surface
//!
//! | Path                                               | Module                  | Auth              |
//! |----------------------------------------------------|-------------------------|-------------------|
//! | `/generic-issuance/api/feed/{pipelineId}/{feedId}` | [`routes::feeds`]       | signed credential |
//! | `/generic-issuance/api/check-in`                   | [`routes::checkin`]     | signed credential |
//! | `/generic-issuance/api/pipeline-info`              | [`routes::pipelines`]   | admin bearer      |
//! | `/openapi.json`                                    | [`openapi`]             | none              |
//! | `/health/*`                                        | this module             | none              |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//!                                → AuthMiddleware → pipeline info
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod verifier;

use axum::middleware::from_fn;
use axum::Router;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the application router with a fresh metrics instance.
pub fn app(state: AppState) -> Router {
    app_with_metrics(state, ApiMetrics::new())
}

/// Assemble the application router, recording into `metrics`.
///
/// Health probes are mounted outside the metrics and trace layers.
pub fn app_with_metrics(state: AppState, metrics: ApiMetrics) -> Router {
    let auth_config = AuthConfig {
        token: state.config.admin_token.clone(),
    };

    let admin = routes::pipelines::router().route_layer(from_fn(auth::auth_middleware));

    let api = Router::new()
        .merge(routes::feeds::router())
        .merge(routes::checkin::router())
        .merge(admin)
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once pipelines are loaded, which happens before the
/// listener is bound.
async fn readiness() -> &'static str {
    "ready"
}
