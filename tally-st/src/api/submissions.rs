//! Submission pipeline endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use tally_common::db::models::{PendingSubmission, SubmissionPayload, SubmissionStatus};

use crate::actor::Actor;
use crate::error::ApiResult;
use crate::submissions::{self, ApprovedSession};
use crate::AppState;

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
}

#[derive(Serialize)]
pub struct InboxResponse {
    pub submissions: Vec<PendingSubmission>,
}

#[derive(Serialize)]
pub struct RejectResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
}

/// POST /api/submissions - Stage a session report for review
pub async fn create_submission(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<SubmissionPayload>,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    let staged = submissions::submit(&state.db, &actor, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            submission_id: staged.id,
            status: staged.status,
        }),
    ))
}

/// GET /api/submissions/inbox - Pending submissions, oldest first (staff)
pub async fn get_inbox(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<InboxResponse>> {
    let submissions = submissions::inbox(&state.db, &actor).await?;
    Ok(Json(InboxResponse { submissions }))
}

/// POST /api/submissions/:id/approve - Promote a pending submission
pub async fn approve_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<Uuid>,
    actor: Actor,
) -> ApiResult<Json<ApprovedSession>> {
    let approved = submissions::approve(&state.db, submission_id, &actor).await?;
    Ok(Json(approved))
}

/// POST /api/submissions/:id/reject - Discard a pending submission
pub async fn reject_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<Uuid>,
    actor: Actor,
) -> ApiResult<Json<RejectResponse>> {
    submissions::reject(&state.db, submission_id, &actor).await?;
    Ok(Json(RejectResponse {
        submission_id,
        status: SubmissionStatus::Rejected,
    }))
}
