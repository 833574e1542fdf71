//! Submission staging pipeline
//!
//! Leader-submitted session reports stage here until staff resolve them.
//! pending -> approved and pending -> rejected are the only transitions;
//! both are terminal and the row is kept afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::info;
use uuid::Uuid;

use tally_common::audit::{self, AuditAction};
use tally_common::db::models::{
    ParticipationRole, PendingSubmission, SubmissionPayload, SubmissionStatus,
};
use tally_common::{Error, Result};

use crate::actor::Actor;

/// Outcome of an approval: the staging row and the authoritative session
/// it produced
#[derive(Debug, Clone, Serialize)]
pub struct ApprovedSession {
    pub submission_id: Uuid,
    pub session_id: Uuid,
}

/// Validate a payload and stage it for review. No authoritative rows are
/// touched here.
pub async fn submit(
    pool: &SqlitePool,
    submitter: &Actor,
    payload: SubmissionPayload,
) -> Result<PendingSubmission> {
    validate_payload(pool, &payload).await?;

    let submission = PendingSubmission {
        id: Uuid::new_v4(),
        payload,
        submitted_by: submitter.id,
        status: SubmissionStatus::Pending,
        submitted_at: Utc::now(),
    };

    let payload_json = serde_json::to_string(&submission.payload)?;

    sqlx::query(
        r#"
        INSERT INTO pending_submissions (id, payload, submitted_by, status, submitted_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(submission.id.to_string())
    .bind(payload_json)
    .bind(submission.submitted_by.to_string())
    .bind(submission.status.as_str())
    .bind(submission.submitted_at.to_rfc3339())
    .execute(pool)
    .await?;

    info!(submission_id = %submission.id, "Session report staged for review");
    Ok(submission)
}

/// All payload validation happens at submit time, before any write.
/// Approval later trusts the stored payload.
async fn validate_payload(pool: &SqlitePool, payload: &SubmissionPayload) -> Result<()> {
    if payload.location.trim().is_empty() {
        return Err(Error::Validation("location must not be empty".to_string()));
    }
    if payload.participants.is_empty() {
        return Err(Error::Validation(
            "At least one participant is required".to_string(),
        ));
    }
    if payload.guests_count < 0 || payload.registrations_count < 0 {
        return Err(Error::Validation(
            "Counts must be non-negative".to_string(),
        ));
    }
    if payload.registrations_count > payload.guests_count {
        return Err(Error::Validation(
            "Registrations count cannot exceed guests count".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for person_id in &payload.participants {
        if !seen.insert(*person_id) {
            return Err(Error::Validation(format!(
                "Duplicate participant: {}",
                person_id
            )));
        }
        ensure_person_exists(pool, *person_id).await?;
    }

    if let Some(captain_id) = payload.room_captain_id {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM people WHERE id = ?")
            .bind(captain_id.to_string())
            .fetch_optional(pool)
            .await?;
        match role.as_deref() {
            None => return Err(Error::NotFound(format!("Person not found: {}", captain_id))),
            Some("leader") => {}
            Some(_) => {
                return Err(Error::Validation(
                    "Room captain must be a leader".to_string(),
                ))
            }
        }
    }

    Ok(())
}

async fn ensure_person_exists(pool: &SqlitePool, person_id: Uuid) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM people WHERE id = ?)")
        .bind(person_id.to_string())
        .fetch_one(pool)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(Error::NotFound(format!("Person not found: {}", person_id)))
    }
}

/// Promote a pending submission into authoritative rows.
///
/// The status flip is the first statement of the transaction, so it takes
/// the write lock before any read. Of two concurrent approvals exactly one
/// sees an affected row; the other gets InvalidState and inserts nothing.
pub async fn approve(
    pool: &SqlitePool,
    submission_id: Uuid,
    approver: &Actor,
) -> Result<ApprovedSession> {
    if !approver.role.can_approve() {
        return Err(Error::Forbidden(
            "Approving submissions requires staff or admin role".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let flipped = flip_status(&mut tx, submission_id, SubmissionStatus::Approved).await?;
    if flipped == 0 {
        return Err(unresolvable_submission(&mut tx, submission_id).await?);
    }

    let submission = load_submission_tx(&mut tx, submission_id).await?;
    let session_id = insert_authoritative_rows(&mut tx, &submission).await?;

    tx.commit().await?;

    info!(
        submission_id = %submission_id,
        session_id = %session_id,
        approver_id = %approver.id,
        "Submission approved"
    );

    audit::record(
        pool,
        Some(approver.id),
        AuditAction::ApproveStatistic,
        serde_json::json!({ "statistic_id": submission_id.to_string() }),
    )
    .await;
    audit::record(
        pool,
        Some(submission.submitted_by),
        AuditAction::SessionCreated,
        serde_json::json!({
            "session_id": session_id.to_string(),
            "date": submission.payload.date.to_string(),
            "guests_count": submission.payload.guests_count,
            "registrations_count": submission.payload.registrations_count,
        }),
    )
    .await;

    Ok(ApprovedSession {
        submission_id,
        session_id,
    })
}

/// Discard a pending submission. Terminal; the row is kept for history.
pub async fn reject(pool: &SqlitePool, submission_id: Uuid, approver: &Actor) -> Result<()> {
    if !approver.role.can_approve() {
        return Err(Error::Forbidden(
            "Rejecting submissions requires staff or admin role".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let flipped = flip_status(&mut tx, submission_id, SubmissionStatus::Rejected).await?;
    if flipped == 0 {
        return Err(unresolvable_submission(&mut tx, submission_id).await?);
    }

    tx.commit().await?;

    info!(
        submission_id = %submission_id,
        approver_id = %approver.id,
        "Submission rejected"
    );

    audit::record(
        pool,
        Some(approver.id),
        AuditAction::RejectStatistic,
        serde_json::json!({ "statistic_id": submission_id.to_string() }),
    )
    .await;

    Ok(())
}

/// Pending submissions, oldest first: the staff review queue
pub async fn inbox(pool: &SqlitePool, viewer: &Actor) -> Result<Vec<PendingSubmission>> {
    if !viewer.role.can_approve() {
        return Err(Error::Forbidden(
            "Viewing the inbox requires staff or admin role".to_string(),
        ));
    }

    let rows = sqlx::query(
        "SELECT id, payload, submitted_by, status, submitted_at
         FROM pending_submissions WHERE status = ? ORDER BY submitted_at ASC, id ASC",
    )
    .bind(SubmissionStatus::Pending.as_str())
    .fetch_all(pool)
    .await?;
    rows.iter().map(submission_from_row).collect()
}

/// Fetch one staging row regardless of status
pub async fn submission(pool: &SqlitePool, id: Uuid) -> Result<PendingSubmission> {
    let row = sqlx::query(
        "SELECT id, payload, submitted_by, status, submitted_at
         FROM pending_submissions WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Submission not found: {}", id)))?;
    submission_from_row(&row)
}

/// Guarded pending -> `to` flip; returns the affected row count
async fn flip_status(
    tx: &mut Transaction<'_, Sqlite>,
    submission_id: Uuid,
    to: SubmissionStatus,
) -> Result<u64> {
    let result = sqlx::query("UPDATE pending_submissions SET status = ? WHERE id = ? AND status = ?")
        .bind(to.as_str())
        .bind(submission_id.to_string())
        .bind(SubmissionStatus::Pending.as_str())
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

/// Why did the flip hit nothing: missing row or already resolved?
async fn unresolvable_submission(
    tx: &mut Transaction<'_, Sqlite>,
    submission_id: Uuid,
) -> Result<Error> {
    let status: Option<String> =
        sqlx::query_scalar("SELECT status FROM pending_submissions WHERE id = ?")
            .bind(submission_id.to_string())
            .fetch_optional(&mut **tx)
            .await?;

    Ok(match status {
        None => Error::NotFound(format!("Submission not found: {}", submission_id)),
        Some(status) => Error::InvalidState(format!(
            "Submission {} is already {}",
            submission_id, status
        )),
    })
}

async fn load_submission_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
) -> Result<PendingSubmission> {
    let row = sqlx::query(
        "SELECT id, payload, submitted_by, status, submitted_at
         FROM pending_submissions WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_one(&mut **tx)
    .await?;
    submission_from_row(&row)
}

/// Materialize the staged payload as session + participations + metrics.
/// The submitter leads; every other listed participant is a registration
/// expert. Provenance (creator, timestamps) comes from the submission,
/// not from the approval.
async fn insert_authoritative_rows(
    tx: &mut Transaction<'_, Sqlite>,
    submission: &PendingSubmission,
) -> Result<Uuid> {
    let session_id = Uuid::new_v4();
    let payload = &submission.payload;

    sqlx::query(
        r#"
        INSERT INTO sessions (id, date, location, notes, created_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session_id.to_string())
    .bind(payload.date.to_string())
    .bind(&payload.location)
    .bind(payload.notes.as_deref())
    .bind(submission.submitted_by.to_string())
    .bind(submission.submitted_at.to_rfc3339())
    .execute(&mut **tx)
    .await?;

    insert_participation(tx, session_id, submission.submitted_by, ParticipationRole::Leader)
        .await?;
    for person_id in &payload.participants {
        // The submitter already holds the leader slot
        if *person_id == submission.submitted_by {
            continue;
        }
        insert_participation(tx, session_id, *person_id, ParticipationRole::RegistrationExpert)
            .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO session_metrics
            (session_id, guests_count, registrations_count, room_captain_id, submitted_by, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session_id.to_string())
    .bind(payload.guests_count)
    .bind(payload.registrations_count)
    .bind(payload.room_captain_id.map(|id| id.to_string()))
    .bind(submission.submitted_by.to_string())
    .bind(submission.submitted_at.to_rfc3339())
    .execute(&mut **tx)
    .await?;

    Ok(session_id)
}

async fn insert_participation(
    tx: &mut Transaction<'_, Sqlite>,
    session_id: Uuid,
    person_id: Uuid,
    role: ParticipationRole,
) -> Result<()> {
    sqlx::query("INSERT INTO participations (id, session_id, person_id, role) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(session_id.to_string())
        .bind(person_id.to_string())
        .bind(role.as_str())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

fn submission_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PendingSubmission> {
    let id_str: String = row.get("id");
    let payload_json: String = row.get("payload");
    let submitted_by_str: String = row.get("submitted_by");
    let status_str: String = row.get("status");
    let submitted_at_str: String = row.get("submitted_at");

    Ok(PendingSubmission {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid submission id in database: {}", e)))?,
        payload: serde_json::from_str(&payload_json)
            .map_err(|e| Error::Internal(format!("Invalid stored payload: {}", e)))?,
        submitted_by: Uuid::parse_str(&submitted_by_str)
            .map_err(|e| Error::Internal(format!("Invalid submitter id in database: {}", e)))?,
        status: SubmissionStatus::parse(&status_str)?,
        submitted_at: DateTime::parse_from_rfc3339(&submitted_at_str)
            .map_err(|e| Error::Internal(format!("Invalid submission timestamp: {}", e)))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;
    use crate::testutil::{date, insert_person, memory_pool};
    use tally_common::db::models::Role;

    fn actor(id: Uuid, role: Role) -> Actor {
        Actor {
            id,
            role,
            region: "north".to_string(),
        }
    }

    fn payload(participants: Vec<Uuid>, guests: i64, registrations: i64) -> SubmissionPayload {
        SubmissionPayload {
            date: date("2026-03-14"),
            location: "Community Hall".to_string(),
            participants,
            room_captain_id: None,
            guests_count: guests,
            registrations_count: registrations,
            notes: None,
        }
    }

    async fn pending_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM pending_submissions")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn session_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn submit_stages_without_touching_sessions() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;

        let staged = submit(&pool, &actor(leader, Role::Leader), payload(vec![leader], 10, 4))
            .await
            .unwrap();
        assert_eq!(staged.status, SubmissionStatus::Pending);
        assert_eq!(pending_count(&pool).await, 1);
        assert_eq!(session_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn submit_rejects_invalid_payloads() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let submitter = actor(leader, Role::Leader);

        // Registrations above guests
        let result = submit(&pool, &submitter, payload(vec![leader], 10, 12)).await;
        assert!(matches!(result, Err(Error::Validation(_))));

        // Negative counts
        let result = submit(&pool, &submitter, payload(vec![leader], -1, 0)).await;
        assert!(matches!(result, Err(Error::Validation(_))));

        // No participants
        let result = submit(&pool, &submitter, payload(vec![], 10, 4)).await;
        assert!(matches!(result, Err(Error::Validation(_))));

        // Blank location
        let mut blank = payload(vec![leader], 10, 4);
        blank.location = "   ".to_string();
        let result = submit(&pool, &submitter, blank).await;
        assert!(matches!(result, Err(Error::Validation(_))));

        // Duplicate participant
        let result = submit(&pool, &submitter, payload(vec![leader, leader], 10, 4)).await;
        assert!(matches!(result, Err(Error::Validation(_))));

        // Unknown participant
        let result = submit(&pool, &submitter, payload(vec![Uuid::new_v4()], 10, 4)).await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        // Nothing staged by any of the failures
        assert_eq!(pending_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn submit_enforces_room_captain_is_leader() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let staffer = insert_person(&pool, "sam", "Sam", "north", Role::Staff).await;
        let submitter = actor(leader, Role::Leader);

        let mut bad = payload(vec![leader], 10, 4);
        bad.room_captain_id = Some(staffer);
        assert!(matches!(
            submit(&pool, &submitter, bad).await,
            Err(Error::Validation(_))
        ));

        let other_leader = insert_person(&pool, "bo", "Bo", "north", Role::Leader).await;
        let mut good = payload(vec![leader], 10, 4);
        good.room_captain_id = Some(other_leader);
        assert!(submit(&pool, &submitter, good).await.is_ok());
    }

    #[tokio::test]
    async fn approve_materializes_session_with_submitter_provenance() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let expert = insert_person(&pool, "bo", "Bo", "north", Role::Leader).await;
        let staffer = insert_person(&pool, "sam", "Sam", "north", Role::Staff).await;

        // Submitter listed among participants; must not be inserted twice
        let staged = submit(
            &pool,
            &actor(leader, Role::Leader),
            payload(vec![leader, expert], 10, 4),
        )
        .await
        .unwrap();

        let approved = approve(&pool, staged.id, &actor(staffer, Role::Staff))
            .await
            .unwrap();
        assert_eq!(approved.submission_id, staged.id);

        let (created_by, created_at): (String, String) =
            sqlx::query_as("SELECT created_by, created_at FROM sessions WHERE id = ?")
                .bind(approved.session_id.to_string())
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(created_by, leader.to_string());
        assert_eq!(created_at, staged.submitted_at.to_rfc3339());

        let roles: Vec<(String, String)> = sqlx::query_as(
            "SELECT person_id, role FROM participations WHERE session_id = ? ORDER BY role",
        )
        .bind(approved.session_id.to_string())
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(roles.len(), 2);
        assert!(roles.contains(&(leader.to_string(), "LEADER".to_string())));
        assert!(roles.contains(&(expert.to_string(), "REGISTRATION_EXPERT".to_string())));

        let totals = stats::person_totals(&pool, leader, None, None).await.unwrap();
        assert_eq!(totals.total_guests, 10);
        assert_eq!(totals.total_registrations, 4);
        assert_eq!(totals.effectiveness_pct, 40.0);
        assert_eq!(totals.sessions_led_count, 1);
    }

    #[tokio::test]
    async fn approve_requires_staff_or_admin() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;

        let staged = submit(&pool, &actor(leader, Role::Leader), payload(vec![leader], 5, 2))
            .await
            .unwrap();

        let result = approve(&pool, staged.id, &actor(leader, Role::Leader)).await;
        assert!(matches!(result, Err(Error::Forbidden(_))));
        assert_eq!(session_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn approve_is_terminal() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let staffer = insert_person(&pool, "sam", "Sam", "north", Role::Staff).await;
        let reviewer = actor(staffer, Role::Staff);

        let staged = submit(&pool, &actor(leader, Role::Leader), payload(vec![leader], 5, 2))
            .await
            .unwrap();

        approve(&pool, staged.id, &reviewer).await.unwrap();

        let again = approve(&pool, staged.id, &reviewer).await;
        assert!(matches!(again, Err(Error::InvalidState(_))));
        assert_eq!(session_count(&pool).await, 1);

        let reject_after = reject(&pool, staged.id, &reviewer).await;
        assert!(matches!(reject_after, Err(Error::InvalidState(_))));
    }

    #[tokio::test]
    async fn reject_keeps_the_row_and_creates_nothing() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let staffer = insert_person(&pool, "sam", "Sam", "north", Role::Staff).await;
        let reviewer = actor(staffer, Role::Staff);

        let staged = submit(&pool, &actor(leader, Role::Leader), payload(vec![leader], 5, 2))
            .await
            .unwrap();

        reject(&pool, staged.id, &reviewer).await.unwrap();
        assert_eq!(session_count(&pool).await, 0);

        let stored = submission(&pool, staged.id).await.unwrap();
        assert_eq!(stored.status, SubmissionStatus::Rejected);

        let approve_after = approve(&pool, staged.id, &reviewer).await;
        assert!(matches!(approve_after, Err(Error::InvalidState(_))));
    }

    #[tokio::test]
    async fn resolving_unknown_submission_is_not_found() {
        let pool = memory_pool().await;
        let staffer = insert_person(&pool, "sam", "Sam", "north", Role::Staff).await;
        let reviewer = actor(staffer, Role::Staff);

        assert!(matches!(
            approve(&pool, Uuid::new_v4(), &reviewer).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            reject(&pool, Uuid::new_v4(), &reviewer).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_approvals_produce_one_session() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let staffer = insert_person(&pool, "sam", "Sam", "north", Role::Staff).await;

        let staged = submit(&pool, &actor(leader, Role::Leader), payload(vec![leader], 10, 4))
            .await
            .unwrap();

        let first = {
            let pool = pool.clone();
            let reviewer = actor(staffer, Role::Staff);
            tokio::spawn(async move { approve(&pool, staged.id, &reviewer).await })
        };
        let second = {
            let pool = pool.clone();
            let reviewer = actor(staffer, Role::Staff);
            tokio::spawn(async move { approve(&pool, staged.id, &reviewer).await })
        };

        let outcomes = [first.await.unwrap(), second.await.unwrap()];
        let wins = outcomes.iter().filter(|r| r.is_ok()).count();
        let conflicts = outcomes
            .iter()
            .filter(|r| matches!(r, Err(Error::InvalidState(_))))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(conflicts, 1);
        assert_eq!(session_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn inbox_lists_pending_oldest_first() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let staffer = insert_person(&pool, "sam", "Sam", "north", Role::Staff).await;
        let submitter = actor(leader, Role::Leader);

        let first = submit(&pool, &submitter, payload(vec![leader], 5, 1)).await.unwrap();
        let second = submit(&pool, &submitter, payload(vec![leader], 6, 2)).await.unwrap();
        let third = submit(&pool, &submitter, payload(vec![leader], 7, 3)).await.unwrap();

        reject(&pool, second.id, &actor(staffer, Role::Staff)).await.unwrap();

        let queue = inbox(&pool, &actor(staffer, Role::Staff)).await.unwrap();
        let ids: Vec<Uuid> = queue.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.id, third.id]);
    }

    #[tokio::test]
    async fn inbox_requires_staff_or_admin() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;

        let result = inbox(&pool, &actor(leader, Role::Leader)).await;
        assert!(matches!(result, Err(Error::Forbidden(_))));
    }

    #[tokio::test]
    async fn approve_writes_audit_entries_after_commit() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let staffer = insert_person(&pool, "sam", "Sam", "north", Role::Staff).await;

        let staged = submit(&pool, &actor(leader, Role::Leader), payload(vec![leader], 10, 4))
            .await
            .unwrap();
        approve(&pool, staged.id, &actor(staffer, Role::Staff))
            .await
            .unwrap();

        let actions: Vec<String> =
            sqlx::query_scalar("SELECT action FROM audit_log ORDER BY created_at")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert!(actions.contains(&"approve_statistic".to_string()));
        assert!(actions.contains(&"session_created".to_string()));
    }

    #[tokio::test]
    async fn audit_failure_does_not_fail_rejection() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let staffer = insert_person(&pool, "sam", "Sam", "north", Role::Staff).await;

        let staged = submit(&pool, &actor(leader, Role::Leader), payload(vec![leader], 5, 2))
            .await
            .unwrap();

        sqlx::query("DROP TABLE audit_log").execute(&pool).await.unwrap();

        reject(&pool, staged.id, &actor(staffer, Role::Staff))
            .await
            .unwrap();
        let stored = submission(&pool, staged.id).await.unwrap();
        assert_eq!(stored.status, SubmissionStatus::Rejected);
    }
}
