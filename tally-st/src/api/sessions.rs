//! Session read endpoints

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_common::db::models::Session;

use crate::actor::Actor;
use crate::error::{ApiError, ApiResult};
use crate::sessions::{self, SessionDetail};
use crate::AppState;

fn default_sessions_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    #[serde(default = "default_sessions_limit")]
    pub limit: i64,
}

#[derive(Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<Session>,
}

/// GET /api/sessions/:id - One session with participants and metrics
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    _actor: Actor,
) -> ApiResult<Json<SessionDetail>> {
    let detail = sessions::session_detail(&state.db, session_id).await?;
    Ok(Json(detail))
}

/// GET /api/sessions - Recent sessions across everyone (admin)
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<SessionsQuery>,
    actor: Actor,
) -> ApiResult<Json<SessionsResponse>> {
    if !actor.role.can_administer() {
        return Err(ApiError::Forbidden(
            "Listing all sessions requires admin role".to_string(),
        ));
    }

    let sessions = sessions::list_sessions(&state.db, params.limit.max(0)).await?;
    Ok(Json(SessionsResponse { sessions }))
}
