//! Leaderboard ranking by summed counts or derived effectiveness

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use tally_common::db::models::ParticipationRole;
use tally_common::{Error, Result};

use crate::metrics::effectiveness;

/// Ranking metric selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Registrations,
    Guests,
    Effectiveness,
}

impl Metric {
    /// Parse a metric name. Unrecognized input is an error, never a
    /// silent default.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "registrations" => Ok(Metric::Registrations),
            "guests" => Ok(Metric::Guests),
            "effectiveness" => Ok(Metric::Effectiveness),
            other => Err(Error::InvalidArgument(format!(
                "Invalid metric: {}. Use registrations, guests, or effectiveness",
                other
            ))),
        }
    }
}

/// One ranked row
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub person_id: Uuid,
    pub name: String,
    pub region: String,
    pub total_guests: i64,
    pub total_registrations: i64,
    pub effectiveness_pct: f64,
}

/// Rank people who led sessions, by the chosen metric, over the filtered
/// session set.
///
/// Count metrics sort and truncate in SQL. Effectiveness is derived, so
/// all qualifying groups (summed guests > 0) are materialized first and
/// ranked here; the database never orders by a value it did not compute.
pub async fn leaderboard(
    pool: &SqlitePool,
    region: Option<&str>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    metric: Metric,
    limit: i64,
) -> Result<Vec<LeaderboardEntry>> {
    let mut sql = String::from(
        r#"
        SELECT
            pe.id AS person_id,
            pe.name,
            pe.region,
            SUM(m.guests_count) AS total_guests,
            SUM(m.registrations_count) AS total_registrations
        FROM people pe
        JOIN participations p ON p.person_id = pe.id
        JOIN sessions s ON s.id = p.session_id
        JOIN session_metrics m ON m.session_id = s.id
        WHERE p.role = ?
        "#,
    );
    if region.is_some() {
        sql.push_str(" AND pe.region = ?");
    }
    if date_from.is_some() {
        sql.push_str(" AND s.date >= ?");
    }
    if date_to.is_some() {
        sql.push_str(" AND s.date <= ?");
    }
    sql.push_str(" GROUP BY pe.id, pe.name, pe.region");

    match metric {
        Metric::Registrations => {
            sql.push_str(" ORDER BY total_registrations DESC, pe.id ASC LIMIT ?");
        }
        Metric::Guests => {
            sql.push_str(" ORDER BY total_guests DESC, pe.id ASC LIMIT ?");
        }
        Metric::Effectiveness => {
            // Zero-guest groups are excluded outright, not ranked last
            sql.push_str(" HAVING SUM(m.guests_count) > 0");
        }
    }

    let mut query = sqlx::query(&sql).bind(ParticipationRole::Leader.as_str());
    if let Some(r) = region {
        query = query.bind(r);
    }
    if let Some(d) = date_from {
        query = query.bind(d.to_string());
    }
    if let Some(d) = date_to {
        query = query.bind(d.to_string());
    }
    if metric != Metric::Effectiveness {
        query = query.bind(limit);
    }

    let rows = query.fetch_all(pool).await?;
    let mut entries = rows
        .iter()
        .map(entry_from_row)
        .collect::<Result<Vec<_>>>()?;

    if metric == Metric::Effectiveness {
        entries.sort_by(|a, b| {
            b.effectiveness_pct
                .partial_cmp(&a.effectiveness_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.person_id.cmp(&b.person_id))
        });
        entries.truncate(limit.max(0) as usize);
    }

    Ok(entries)
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<LeaderboardEntry> {
    let id_str: String = row.get("person_id");
    let total_guests: i64 = row.get("total_guests");
    let total_registrations: i64 = row.get("total_registrations");

    Ok(LeaderboardEntry {
        person_id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid person id in database: {}", e)))?,
        name: row.get("name"),
        region: row.get("region"),
        total_guests,
        total_registrations,
        effectiveness_pct: effectiveness(total_guests, total_registrations),
    })
}
