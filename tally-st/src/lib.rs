//! tally-st library - Session Tracker service
//!
//! Aggregates recruitment session statistics, ranks leaders, filters
//! people against target profiles, and runs the staged approval pipeline
//! for leader-submitted session reports.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod actor;
pub mod api;
pub mod criteria;
pub mod error;
pub mod leaderboard;
pub mod metrics;
pub mod people;
pub mod sessions;
pub mod stats;
pub mod submissions;

#[cfg(test)]
pub(crate) mod testutil;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build the application router.
///
/// Everything under /api resolves the caller through the X-Actor-Id
/// header; /health stays open for monitoring.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/people", get(api::list_people))
        .route("/api/people/leaders", get(api::list_leaders))
        .route("/api/people/:id/stats", get(api::person_stats))
        .route("/api/leaderboard", get(api::get_leaderboard))
        .route("/api/regions", get(api::list_regions))
        .route("/api/sessions", get(api::list_sessions))
        .route("/api/sessions/:id", get(api::get_session))
        .route("/api/submissions", post(api::create_submission))
        .route("/api/submissions/inbox", get(api::get_inbox))
        .route("/api/submissions/:id/approve", post(api::approve_submission))
        .route("/api/submissions/:id/reject", post(api::reject_submission))
        .route(
            "/api/criteria",
            get(api::list_criteria).post(api::create_criteria),
        )
        .route("/api/users", get(api::list_users).post(api::create_user))
        .route("/api/users/:id", get(api::get_user))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            actor::identity_middleware,
        ));

    let public = Router::new().merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
