//! Per-person aggregation over the authoritative session dataset

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use tally_common::db::models::ParticipationRole;
use tally_common::{Error, Result};

use crate::metrics::effectiveness;

/// Summed totals across every session a person led
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonTotals {
    pub total_guests: i64,
    pub total_registrations: i64,
    pub effectiveness_pct: f64,
    pub sessions_led_count: i64,
}

/// One led session with its reported counts
#[derive(Debug, Clone, Serialize)]
pub struct SessionWithMetrics {
    pub id: Uuid,
    pub date: NaiveDate,
    pub location: String,
    pub guests_count: i64,
    pub registrations_count: i64,
    pub effectiveness_pct: f64,
}

/// Sum guests and registrations across all sessions the person led in the
/// optional inclusive date range.
///
/// The percentage derives from the summed totals, not from averaging
/// per-session percentages, so large sessions weigh in proportionally.
/// A person with no matching sessions gets all-zero totals.
pub async fn person_totals(
    pool: &SqlitePool,
    person_id: Uuid,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> Result<PersonTotals> {
    let mut sql = String::from(
        r#"
        SELECT
            COALESCE(SUM(m.guests_count), 0) AS total_guests,
            COALESCE(SUM(m.registrations_count), 0) AS total_registrations,
            COUNT(DISTINCT s.id) AS sessions_led_count
        FROM sessions s
        JOIN participations p ON p.session_id = s.id
        JOIN session_metrics m ON m.session_id = s.id
        WHERE p.person_id = ? AND p.role = ?
        "#,
    );
    if date_from.is_some() {
        sql.push_str(" AND s.date >= ?");
    }
    if date_to.is_some() {
        sql.push_str(" AND s.date <= ?");
    }

    let mut query = sqlx::query(&sql)
        .bind(person_id.to_string())
        .bind(ParticipationRole::Leader.as_str());
    if let Some(date) = date_from {
        query = query.bind(date.to_string());
    }
    if let Some(date) = date_to {
        query = query.bind(date.to_string());
    }

    let row = query.fetch_one(pool).await?;

    let total_guests: i64 = row.get("total_guests");
    let total_registrations: i64 = row.get("total_registrations");
    let sessions_led_count: i64 = row.get("sessions_led_count");

    Ok(PersonTotals {
        total_guests,
        total_registrations,
        effectiveness_pct: effectiveness(total_guests, total_registrations),
        sessions_led_count,
    })
}

/// Most recent sessions the person led, newest first. Date ties fall back
/// to created_at and id so truncation is stable.
pub async fn recent_sessions_for_person(
    pool: &SqlitePool,
    person_id: Uuid,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    limit: i64,
) -> Result<Vec<SessionWithMetrics>> {
    let mut sql = String::from(
        r#"
        SELECT s.id, s.date, s.location, m.guests_count, m.registrations_count
        FROM sessions s
        JOIN participations p ON p.session_id = s.id
        JOIN session_metrics m ON m.session_id = s.id
        WHERE p.person_id = ? AND p.role = ?
        "#,
    );
    if date_from.is_some() {
        sql.push_str(" AND s.date >= ?");
    }
    if date_to.is_some() {
        sql.push_str(" AND s.date <= ?");
    }
    sql.push_str(" ORDER BY s.date DESC, s.created_at DESC, s.id ASC LIMIT ?");

    let mut query = sqlx::query(&sql)
        .bind(person_id.to_string())
        .bind(ParticipationRole::Leader.as_str());
    if let Some(date) = date_from {
        query = query.bind(date.to_string());
    }
    if let Some(date) = date_to {
        query = query.bind(date.to_string());
    }
    query = query.bind(limit);

    let rows = query.fetch_all(pool).await?;
    rows.iter().map(session_from_row).collect()
}

fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SessionWithMetrics> {
    let id_str: String = row.get("id");
    let date_str: String = row.get("date");
    let guests_count: i64 = row.get("guests_count");
    let registrations_count: i64 = row.get("registrations_count");

    Ok(SessionWithMetrics {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid session id in database: {}", e)))?,
        date: date_str
            .parse()
            .map_err(|e| Error::Internal(format!("Invalid session date in database: {}", e)))?,
        location: row.get("location"),
        guests_count,
        registrations_count,
        effectiveness_pct: effectiveness(guests_count, registrations_count),
    })
}
