//! Person endpoints: stats, leader listings, filters, regions

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::Actor;
use crate::api::parse_date_param;
use crate::error::ApiResult;
use crate::people::{self, LeaderSummary, PeopleFilter, RankedLeader};
use crate::stats::{self, PersonTotals, SessionWithMetrics};
use crate::AppState;

/// Recent sessions included in a person stats response
const RECENT_SESSIONS_LIMIT: i64 = 10;

fn default_months() -> i64 {
    3
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeadersQuery {
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PeopleQuery {
    pub filter: Option<String>,
    #[serde(default = "default_months")]
    pub months: i64,
    pub region: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Serialize)]
pub struct PersonStatsResponse {
    pub person_id: Uuid,
    pub name: String,
    pub region: String,
    pub totals: PersonTotals,
    pub recent_sessions: Vec<SessionWithMetrics>,
}

#[derive(Serialize)]
pub struct LeadersResponse {
    pub leaders: Vec<LeaderSummary>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum FilteredPeople {
    Ranked(Vec<RankedLeader>),
    Plain(Vec<LeaderSummary>),
}

#[derive(Serialize)]
pub struct PeopleResponse {
    pub people: FilteredPeople,
}

#[derive(Serialize)]
pub struct RegionsResponse {
    pub regions: Vec<String>,
}

/// GET /api/people/:id/stats - Totals and recent sessions for one person
pub async fn person_stats(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
    Query(params): Query<StatsQuery>,
    _actor: Actor,
) -> ApiResult<Json<PersonStatsResponse>> {
    let date_from = parse_date_param(params.date_from.as_deref(), "date_from")?;
    let date_to = parse_date_param(params.date_to.as_deref(), "date_to")?;

    let person = people::person(&state.db, person_id).await?;
    let totals = stats::person_totals(&state.db, person_id, date_from, date_to).await?;
    let recent_sessions = stats::recent_sessions_for_person(
        &state.db,
        person_id,
        date_from,
        date_to,
        RECENT_SESSIONS_LIMIT,
    )
    .await?;

    Ok(Json(PersonStatsResponse {
        person_id,
        name: person.name,
        region: person.region,
        totals,
        recent_sessions,
    }))
}

/// GET /api/people/leaders - Leader accounts, name-ordered
pub async fn list_leaders(
    State(state): State<AppState>,
    Query(params): Query<LeadersQuery>,
    _actor: Actor,
) -> ApiResult<Json<LeadersResponse>> {
    let region = params.region.as_deref().filter(|r| !r.is_empty());
    let leaders = people::leaders(&state.db, region, None).await?;
    Ok(Json(LeadersResponse { leaders }))
}

/// GET /api/people - Leaders, optionally through a named filter
pub async fn list_people(
    State(state): State<AppState>,
    Query(params): Query<PeopleQuery>,
    _actor: Actor,
) -> ApiResult<Json<PeopleResponse>> {
    let region = params.region.as_deref().filter(|r| !r.is_empty());
    // SQLite reads a negative LIMIT as unlimited; clamp so it reads as empty
    let limit = params.limit.max(0);

    let people = match params.filter.as_deref().filter(|f| !f.is_empty()) {
        None => FilteredPeople::Plain(people::leaders(&state.db, region, Some(limit)).await?),
        Some(raw) => match PeopleFilter::parse(raw)? {
            PeopleFilter::CloseToTarget => {
                FilteredPeople::Ranked(people::close_to_target(&state.db, region, limit).await?)
            }
            PeopleFilter::NotLedInMonths => FilteredPeople::Plain(
                people::not_led_in_months(&state.db, params.months, region, limit).await?,
            ),
        },
    };

    Ok(Json(PeopleResponse { people }))
}

/// GET /api/regions - Distinct region tags
pub async fn list_regions(
    State(state): State<AppState>,
    _actor: Actor,
) -> ApiResult<Json<RegionsResponse>> {
    let regions = people::regions(&state.db).await?;
    Ok(Json(RegionsResponse { regions }))
}
