//! Person store and the leader filter engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use tally_common::db::models::{ParticipationRole, Person, Role};
use tally_common::{Error, Result};

use crate::criteria;
use crate::metrics::normalized_distance;
use crate::stats::{self, PersonTotals};

/// Named leader filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeopleFilter {
    CloseToTarget,
    NotLedInMonths,
}

impl PeopleFilter {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "close_to_target" => Ok(PeopleFilter::CloseToTarget),
            "not_led_in_months" => Ok(PeopleFilter::NotLedInMonths),
            other => Err(Error::InvalidArgument(format!(
                "Invalid filter: {}. Use close_to_target or not_led_in_months",
                other
            ))),
        }
    }
}

/// Plain leader row
#[derive(Debug, Clone, Serialize)]
pub struct LeaderSummary {
    pub person_id: Uuid,
    pub name: String,
    pub region: String,
}

/// Leader row scored against the applicable target profile
#[derive(Debug, Clone, Serialize)]
pub struct RankedLeader {
    pub person_id: Uuid,
    pub name: String,
    pub region: String,
    pub distance_to_target: f64,
    pub totals: PersonTotals,
}

/// New account input
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
    pub username: String,
    pub name: String,
    pub region: String,
    pub role: Role,
}

/// Leader accounts, name-ordered, optionally restricted to a region and
/// truncated
pub async fn leaders(
    pool: &SqlitePool,
    region: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<LeaderSummary>> {
    let mut sql = String::from("SELECT id, name, region FROM people WHERE role = ?");
    if region.is_some() {
        sql.push_str(" AND region = ?");
    }
    sql.push_str(" ORDER BY name ASC, id ASC");
    if limit.is_some() {
        sql.push_str(" LIMIT ?");
    }

    let mut query = sqlx::query(&sql).bind(Role::Leader.as_str());
    if let Some(r) = region {
        query = query.bind(r);
    }
    if let Some(n) = limit {
        query = query.bind(n);
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter().map(summary_from_row).collect()
}

/// Leaders closest to their applicable target profile, best match first.
/// Leaders with no applicable criteria, or whose criteria define no usable
/// target, are excluded rather than ranked.
pub async fn close_to_target(
    pool: &SqlitePool,
    region: Option<&str>,
    limit: i64,
) -> Result<Vec<RankedLeader>> {
    // Every candidate is scored; truncation happens after ranking
    let candidates = leaders(pool, region, None).await?;

    let mut ranked = Vec::new();
    for leader in candidates {
        let Some(criteria_row) = criteria::applicable_for(pool, leader.person_id).await? else {
            continue;
        };
        let totals = stats::person_totals(pool, leader.person_id, None, None).await?;
        if let Some(distance) = normalized_distance(&totals, &criteria_row) {
            ranked.push(RankedLeader {
                person_id: leader.person_id,
                name: leader.name,
                region: leader.region,
                distance_to_target: distance,
                totals,
            });
        }
    }

    ranked.sort_by(|a, b| {
        a.distance_to_target
            .partial_cmp(&b.distance_to_target)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.person_id.cmp(&b.person_id))
    });
    ranked.truncate(limit.max(0) as usize);
    Ok(ranked)
}

/// Leaders with no led session dated on or after today minus months * 30
/// days. Months use the fixed 30-day approximation; negative or
/// oversized month values are rejected.
pub async fn not_led_in_months(
    pool: &SqlitePool,
    months: i64,
    region: Option<&str>,
    limit: i64,
) -> Result<Vec<LeaderSummary>> {
    if months < 0 {
        return Err(Error::InvalidArgument(
            "months must be non-negative".to_string(),
        ));
    }
    let cutoff = months
        .checked_mul(30)
        .and_then(chrono::Duration::try_days)
        .and_then(|span| Utc::now().date_naive().checked_sub_signed(span))
        .ok_or_else(|| Error::InvalidArgument(format!("months out of range: {}", months)))?;

    let mut sql = String::from("SELECT pe.id, pe.name, pe.region FROM people pe WHERE pe.role = ?");
    if region.is_some() {
        sql.push_str(" AND pe.region = ?");
    }
    sql.push_str(
        r#"
        AND NOT EXISTS (
            SELECT 1
            FROM participations p
            JOIN sessions s ON s.id = p.session_id
            WHERE p.person_id = pe.id AND p.role = ? AND s.date >= ?
        )
        ORDER BY pe.name ASC, pe.id ASC
        LIMIT ?
        "#,
    );

    let mut query = sqlx::query(&sql).bind(Role::Leader.as_str());
    if let Some(r) = region {
        query = query.bind(r);
    }
    let query = query
        .bind(ParticipationRole::Leader.as_str())
        .bind(cutoff.to_string())
        .bind(limit);

    let rows = query.fetch_all(pool).await?;
    rows.iter().map(summary_from_row).collect()
}

/// Create an account. Usernames are unique; the role is fixed here and
/// never escalated afterwards.
pub async fn create_person(pool: &SqlitePool, new: &NewPerson) -> Result<Person> {
    if new.username.trim().is_empty() {
        return Err(Error::Validation("username must not be empty".to_string()));
    }
    if new.name.trim().is_empty() {
        return Err(Error::Validation("name must not be empty".to_string()));
    }
    if new.region.trim().is_empty() {
        return Err(Error::Validation("region must not be empty".to_string()));
    }

    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM people WHERE username = ?)")
        .bind(&new.username)
        .fetch_one(pool)
        .await?;
    if taken {
        return Err(Error::Validation(format!(
            "Username already taken: {}",
            new.username
        )));
    }

    let person = Person {
        id: Uuid::new_v4(),
        username: new.username.clone(),
        name: new.name.clone(),
        region: new.region.clone(),
        role: new.role,
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO people (id, username, name, region, role, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(person.id.to_string())
    .bind(&person.username)
    .bind(&person.name)
    .bind(&person.region)
    .bind(person.role.as_str())
    .bind(person.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(person)
}

/// Fetch one account
pub async fn person(pool: &SqlitePool, id: Uuid) -> Result<Person> {
    let row = sqlx::query(
        "SELECT id, username, name, region, role, created_at FROM people WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Person not found: {}", id)))?;

    person_from_row(&row)
}

/// Every account, username-ordered
pub async fn list_people(pool: &SqlitePool) -> Result<Vec<Person>> {
    let rows = sqlx::query(
        "SELECT id, username, name, region, role, created_at FROM people ORDER BY username ASC",
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(person_from_row).collect()
}

/// Distinct region tags in use
pub async fn regions(pool: &SqlitePool) -> Result<Vec<String>> {
    let regions: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT region FROM people ORDER BY region ASC")
            .fetch_all(pool)
            .await?;
    Ok(regions)
}

fn summary_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<LeaderSummary> {
    let id_str: String = row.get("id");
    Ok(LeaderSummary {
        person_id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid person id in database: {}", e)))?,
        name: row.get("name"),
        region: row.get("region"),
    })
}

fn person_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Person> {
    let id_str: String = row.get("id");
    let role_str: String = row.get("role");
    let created_at_str: String = row.get("created_at");

    Ok(Person {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid person id in database: {}", e)))?,
        username: row.get("username"),
        name: row.get("name"),
        region: row.get("region"),
        role: Role::parse(&role_str)
            .map_err(|e| Error::Internal(format!("Invalid stored role: {}", e)))?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| Error::Internal(format!("Invalid person timestamp: {}", e)))?
            .with_timezone(&Utc),
    })
}
