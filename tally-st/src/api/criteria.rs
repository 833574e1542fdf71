//! Criteria administration endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use tally_common::audit::{self, AuditAction};
use tally_common::db::models::Criteria;

use crate::actor::Actor;
use crate::criteria::{self, NewCriteria};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Serialize)]
pub struct CriteriaListResponse {
    pub criteria: Vec<Criteria>,
}

/// GET /api/criteria - Every stored criteria row
pub async fn list_criteria(
    State(state): State<AppState>,
    _actor: Actor,
) -> ApiResult<Json<CriteriaListResponse>> {
    let criteria = criteria::list(&state.db).await?;
    Ok(Json(CriteriaListResponse { criteria }))
}

/// POST /api/criteria - Create a target profile (admin)
pub async fn create_criteria(
    State(state): State<AppState>,
    actor: Actor,
    Json(new): Json<NewCriteria>,
) -> ApiResult<(StatusCode, Json<Criteria>)> {
    if !actor.role.can_administer() {
        return Err(ApiError::Forbidden(
            "Creating criteria requires admin role".to_string(),
        ));
    }

    let created = criteria::create(&state.db, &new).await?;

    audit::record(
        &state.db,
        Some(actor.id),
        AuditAction::CriteriaCreated,
        serde_json::json!({
            "criteria_id": created.id.to_string(),
            "person_id": created.person_id.map(|id| id.to_string()),
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(created)))
}
