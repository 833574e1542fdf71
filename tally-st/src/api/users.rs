//! Account administration endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use tally_common::audit::{self, AuditAction};
use tally_common::db::models::Person;

use crate::actor::Actor;
use crate::error::{ApiError, ApiResult};
use crate::people::{self, NewPerson};
use crate::AppState;

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<Person>,
}

fn require_admin(actor: &Actor) -> ApiResult<()> {
    if actor.role.can_administer() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Managing accounts requires admin role".to_string(),
        ))
    }
}

/// GET /api/users - Every account (admin)
pub async fn list_users(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<UsersResponse>> {
    require_admin(&actor)?;
    let users = people::list_people(&state.db).await?;
    Ok(Json(UsersResponse { users }))
}

/// GET /api/users/:id - One account (admin)
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    actor: Actor,
) -> ApiResult<Json<Person>> {
    require_admin(&actor)?;
    let person = people::person(&state.db, user_id).await?;
    Ok(Json(person))
}

/// POST /api/users - Create an account (admin)
pub async fn create_user(
    State(state): State<AppState>,
    actor: Actor,
    Json(new): Json<NewPerson>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    require_admin(&actor)?;

    let created = people::create_person(&state.db, &new).await?;

    audit::record(
        &state.db,
        Some(actor.id),
        AuditAction::UserSignup,
        serde_json::json!({
            "person_id": created.id.to_string(),
            "username": created.username,
            "role": created.role.as_str(),
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(created)))
}
