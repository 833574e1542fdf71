//! Authoritative session reads

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use tally_common::db::models::{ParticipationRole, Session, SessionMetrics};
use tally_common::{Error, Result};

/// One participant with display name
#[derive(Debug, Clone, Serialize)]
pub struct SessionParticipant {
    pub person_id: Uuid,
    pub person_name: String,
    pub role: ParticipationRole,
}

/// Full session view: base fields, participants, metrics
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    pub participants: Vec<SessionParticipant>,
    pub metrics: Option<SessionMetrics>,
}

/// Load one session with its participants and metrics
pub async fn session_detail(pool: &SqlitePool, session_id: Uuid) -> Result<SessionDetail> {
    let row = sqlx::query(
        "SELECT id, date, location, notes, created_by, created_at FROM sessions WHERE id = ?",
    )
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Session not found: {}", session_id)))?;

    let session = session_from_row(&row)?;

    let participant_rows = sqlx::query(
        r#"
        SELECT p.person_id, pe.name AS person_name, p.role
        FROM participations p
        JOIN people pe ON pe.id = p.person_id
        WHERE p.session_id = ?
        ORDER BY p.role ASC, pe.name ASC
        "#,
    )
    .bind(session_id.to_string())
    .fetch_all(pool)
    .await?;

    let participants = participant_rows
        .iter()
        .map(participant_from_row)
        .collect::<Result<Vec<_>>>()?;

    let metrics = sqlx::query(
        "SELECT session_id, guests_count, registrations_count, room_captain_id, submitted_by, submitted_at
         FROM session_metrics WHERE session_id = ?",
    )
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?
    .map(|row| metrics_from_row(&row))
    .transpose()?;

    Ok(SessionDetail {
        session,
        participants,
        metrics,
    })
}

/// Recent sessions across everyone, newest first
pub async fn list_sessions(pool: &SqlitePool, limit: i64) -> Result<Vec<Session>> {
    let rows = sqlx::query(
        "SELECT id, date, location, notes, created_by, created_at
         FROM sessions ORDER BY date DESC, created_at DESC, id ASC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    rows.iter().map(session_from_row).collect()
}

fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Session> {
    let id_str: String = row.get("id");
    let date_str: String = row.get("date");
    let created_by_str: String = row.get("created_by");
    let created_at_str: String = row.get("created_at");

    Ok(Session {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid session id in database: {}", e)))?,
        date: date_str
            .parse()
            .map_err(|e| Error::Internal(format!("Invalid session date in database: {}", e)))?,
        location: row.get("location"),
        notes: row.get("notes"),
        created_by: Uuid::parse_str(&created_by_str)
            .map_err(|e| Error::Internal(format!("Invalid creator id in database: {}", e)))?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| Error::Internal(format!("Invalid session timestamp: {}", e)))?
            .with_timezone(&Utc),
    })
}

fn participant_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SessionParticipant> {
    let person_id_str: String = row.get("person_id");
    let role_str: String = row.get("role");

    Ok(SessionParticipant {
        person_id: Uuid::parse_str(&person_id_str)
            .map_err(|e| Error::Internal(format!("Invalid person id in database: {}", e)))?,
        person_name: row.get("person_name"),
        role: ParticipationRole::parse(&role_str)
            .map_err(|e| Error::Internal(format!("Invalid stored participation role: {}", e)))?,
    })
}

fn metrics_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SessionMetrics> {
    let session_id_str: String = row.get("session_id");
    let room_captain_str: Option<String> = row.get("room_captain_id");
    let submitted_by_str: String = row.get("submitted_by");
    let submitted_at_str: String = row.get("submitted_at");

    Ok(SessionMetrics {
        session_id: Uuid::parse_str(&session_id_str)
            .map_err(|e| Error::Internal(format!("Invalid session id in database: {}", e)))?,
        guests_count: row.get("guests_count"),
        registrations_count: row.get("registrations_count"),
        room_captain_id: room_captain_str
            .map(|s| Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| Error::Internal(format!("Invalid room captain id: {}", e)))?,
        submitted_by: Uuid::parse_str(&submitted_by_str)
            .map_err(|e| Error::Internal(format!("Invalid submitter id in database: {}", e)))?,
        submitted_at: DateTime::parse_from_rfc3339(&submitted_at_str)
            .map_err(|e| Error::Internal(format!("Invalid metrics timestamp: {}", e)))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{date, insert_led_session, insert_person, memory_pool};
    use tally_common::db::models::Role;

    #[tokio::test]
    async fn detail_includes_participants_and_metrics() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        let session_id = insert_led_session(&pool, leader, date("2026-01-10"), 10, 4).await;

        let detail = session_detail(&pool, session_id).await.unwrap();
        assert_eq!(detail.session.id, session_id);
        assert_eq!(detail.participants.len(), 1);
        assert_eq!(detail.participants[0].role, ParticipationRole::Leader);
        assert_eq!(detail.participants[0].person_name, "Ada");

        let metrics = detail.metrics.unwrap();
        assert_eq!(metrics.guests_count, 10);
        assert_eq!(metrics.registrations_count, 4);
    }

    #[tokio::test]
    async fn detail_unknown_session_is_not_found() {
        let pool = memory_pool().await;
        assert!(matches!(
            session_detail(&pool, Uuid::new_v4()).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_orders_newest_first_with_limit() {
        let pool = memory_pool().await;
        let leader = insert_person(&pool, "ada", "Ada", "north", Role::Leader).await;
        insert_led_session(&pool, leader, date("2026-01-01"), 4, 1).await;
        insert_led_session(&pool, leader, date("2026-02-01"), 4, 1).await;
        insert_led_session(&pool, leader, date("2026-03-01"), 4, 1).await;

        let sessions = list_sessions(&pool, 2).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].date, date("2026-03-01"));
        assert_eq!(sessions[1].date, date("2026-02-01"));
    }
}
