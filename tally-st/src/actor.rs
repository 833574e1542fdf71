//! Caller identity resolution
//!
//! Authentication lives in front of this service. Requests arrive with an
//! X-Actor-Id header naming the already-authenticated person; the
//! middleware resolves it to a people row and hands handlers an Actor.
//! Role checks belong to the operations themselves, not to this layer.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use sqlx::Row;
use uuid::Uuid;

use tally_common::db::models::Role;

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the authenticated person id
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub region: String,
}

/// Resolve X-Actor-Id into an Actor and stash it in request extensions
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing X-Actor-Id header".to_string()))?;

    let actor_id = Uuid::parse_str(header)
        .map_err(|_| ApiError::Unauthorized(format!("Invalid actor id: {}", header)))?;

    let row = sqlx::query("SELECT role, region FROM people WHERE id = ?")
        .bind(actor_id.to_string())
        .fetch_optional(&state.db)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::Unauthorized(format!("Unknown actor: {}", actor_id)))?;

    let role_str: String = row.get("role");
    let role = Role::parse(&role_str).map_err(|e| ApiError::Internal(e.to_string()))?;

    let actor = Actor {
        id: actor_id,
        role,
        region: row.get("region"),
    };

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("No identity on request".to_string()))
    }
}
