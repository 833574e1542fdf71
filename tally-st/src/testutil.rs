//! Shared helpers for service-level tests

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use tally_common::db::init_memory_database;
use tally_common::db::models::{ParticipationRole, Role};

pub async fn memory_pool() -> SqlitePool {
    init_memory_database().await.expect("in-memory database")
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("date literal")
}

pub async fn insert_person(
    pool: &SqlitePool,
    username: &str,
    name: &str,
    region: &str,
    role: Role,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO people (id, username, name, region, role, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind(username)
    .bind(name)
    .bind(region)
    .bind(role.as_str())
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await
    .expect("insert person");
    id
}

/// Seed one approved session: session row, leader participation, metrics
pub async fn insert_led_session(
    pool: &SqlitePool,
    leader_id: Uuid,
    date: NaiveDate,
    guests: i64,
    registrations: i64,
) -> Uuid {
    let session_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO sessions (id, date, location, notes, created_by, created_at)
         VALUES (?, ?, ?, NULL, ?, ?)",
    )
    .bind(session_id.to_string())
    .bind(date.to_string())
    .bind("Hall A")
    .bind(leader_id.to_string())
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await
    .expect("insert session");

    sqlx::query("INSERT INTO participations (id, session_id, person_id, role) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(session_id.to_string())
        .bind(leader_id.to_string())
        .bind(ParticipationRole::Leader.as_str())
        .execute(pool)
        .await
        .expect("insert participation");

    sqlx::query(
        "INSERT INTO session_metrics
             (session_id, guests_count, registrations_count, room_captain_id, submitted_by, submitted_at)
         VALUES (?, ?, ?, NULL, ?, ?)",
    )
    .bind(session_id.to_string())
    .bind(guests)
    .bind(registrations)
    .bind(leader_id.to_string())
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await
    .expect("insert metrics");

    session_id
}

/// Insert a criteria row directly, bypassing validation
pub async fn insert_criteria(
    pool: &SqlitePool,
    person_id: Option<Uuid>,
    guests_target: Option<i64>,
    registrations_target: Option<i64>,
    effectiveness_target_pct: Option<f64>,
    created_at: &str,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO criteria
             (id, person_id, guests_target, registrations_target, effectiveness_target_pct, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind(person_id.map(|p| p.to_string()))
    .bind(guests_target)
    .bind(registrations_target)
    .bind(effectiveness_target_pct)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("insert criteria");
    id
}
