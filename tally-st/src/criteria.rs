//! Target criteria storage and resolution

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use tally_common::db::models::Criteria;
use tally_common::{Error, Result};

const CRITERIA_COLUMNS: &str =
    "id, person_id, guests_target, registrations_target, effectiveness_target_pct, created_at";

/// Admin-supplied criteria input
#[derive(Debug, Clone, Deserialize)]
pub struct NewCriteria {
    #[serde(default)]
    pub person_id: Option<Uuid>,
    #[serde(default)]
    pub guests_target: Option<i64>,
    #[serde(default)]
    pub registrations_target: Option<i64>,
    #[serde(default)]
    pub effectiveness_target_pct: Option<f64>,
}

/// Validate and insert a criteria row
pub async fn create(pool: &SqlitePool, new: &NewCriteria) -> Result<Criteria> {
    if let Some(target) = new.guests_target {
        if target < 0 {
            return Err(Error::Validation(
                "guests_target must be non-negative".to_string(),
            ));
        }
    }
    if let Some(target) = new.registrations_target {
        if target < 0 {
            return Err(Error::Validation(
                "registrations_target must be non-negative".to_string(),
            ));
        }
    }
    if let Some(pct) = new.effectiveness_target_pct {
        if !(0.0..=100.0).contains(&pct) {
            return Err(Error::Validation(
                "effectiveness_target_pct must be between 0 and 100".to_string(),
            ));
        }
    }

    if let Some(person_id) = new.person_id {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM people WHERE id = ?)")
            .bind(person_id.to_string())
            .fetch_one(pool)
            .await?;
        if !exists {
            return Err(Error::NotFound(format!("Person not found: {}", person_id)));
        }
    }

    let criteria = Criteria {
        id: Uuid::new_v4(),
        person_id: new.person_id,
        guests_target: new.guests_target,
        registrations_target: new.registrations_target,
        effectiveness_target_pct: new.effectiveness_target_pct,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO criteria
            (id, person_id, guests_target, registrations_target, effectiveness_target_pct, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(criteria.id.to_string())
    .bind(criteria.person_id.map(|id| id.to_string()))
    .bind(criteria.guests_target)
    .bind(criteria.registrations_target)
    .bind(criteria.effectiveness_target_pct)
    .bind(criteria.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(criteria)
}

/// All criteria rows, grouped by scope with newest first within each
pub async fn list(pool: &SqlitePool) -> Result<Vec<Criteria>> {
    let sql = format!(
        "SELECT {} FROM criteria ORDER BY person_id, created_at DESC",
        CRITERIA_COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(criteria_from_row).collect()
}

/// The criteria row governing one person: the latest row scoped to them,
/// else the latest global row, else none.
pub async fn applicable_for(pool: &SqlitePool, person_id: Uuid) -> Result<Option<Criteria>> {
    let sql = format!(
        "SELECT {} FROM criteria WHERE person_id = ? ORDER BY created_at DESC, id ASC LIMIT 1",
        CRITERIA_COLUMNS
    );
    let person_specific = sqlx::query(&sql)
        .bind(person_id.to_string())
        .fetch_optional(pool)
        .await?;

    if let Some(row) = person_specific {
        return Ok(Some(criteria_from_row(&row)?));
    }

    let sql = format!(
        "SELECT {} FROM criteria WHERE person_id IS NULL ORDER BY created_at DESC, id ASC LIMIT 1",
        CRITERIA_COLUMNS
    );
    let global = sqlx::query(&sql).fetch_optional(pool).await?;

    global.map(|row| criteria_from_row(&row)).transpose()
}

fn criteria_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Criteria> {
    let id_str: String = row.get("id");
    let person_id_str: Option<String> = row.get("person_id");
    let created_at_str: String = row.get("created_at");

    Ok(Criteria {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid criteria id in database: {}", e)))?,
        person_id: person_id_str
            .map(|s| Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| Error::Internal(format!("Invalid person id in database: {}", e)))?,
        guests_target: row.get("guests_target"),
        registrations_target: row.get("registrations_target"),
        effectiveness_target_pct: row.get("effectiveness_target_pct"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| Error::Internal(format!("Invalid criteria timestamp: {}", e)))?
            .with_timezone(&Utc),
    })
}
