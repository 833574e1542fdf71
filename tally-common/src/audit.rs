//! Audit trail sink
//!
//! Records who did what. A failed audit write must never fail the
//! operation it annotates, so `record` swallows errors after logging
//! them. Callers invoke it only after their own transaction committed.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

/// Actions reported to the audit trail.
///
/// The signup/login/logout entries are written by the authentication
/// front-end through this same sink; the tracker emits the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserSignup,
    UserLogin,
    UserLogout,
    CriteriaCreated,
    SessionCreated,
    ApproveStatistic,
    RejectStatistic,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserSignup => "user_signup",
            AuditAction::UserLogin => "user_login",
            AuditAction::UserLogout => "user_logout",
            AuditAction::CriteriaCreated => "criteria_created",
            AuditAction::SessionCreated => "session_created",
            AuditAction::ApproveStatistic => "approve_statistic",
            AuditAction::RejectStatistic => "reject_statistic",
        }
    }
}

/// Write one audit row. Never returns an error.
pub async fn record(
    pool: &SqlitePool,
    actor_id: Option<Uuid>,
    action: AuditAction,
    payload: serde_json::Value,
) {
    let result = sqlx::query(
        r#"
        INSERT INTO audit_log (id, actor_id, action, payload, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(actor_id.map(|id| id.to_string()))
    .bind(action.as_str())
    .bind(payload.to_string())
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await;

    if let Err(e) = result {
        warn!("Failed to write audit entry '{}': {}", action.as_str(), e);
    }
}
