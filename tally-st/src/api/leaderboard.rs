//! Leaderboard endpoint

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::api::parse_date_param;
use crate::error::ApiResult;
use crate::leaderboard::{self, LeaderboardEntry, Metric};
use crate::AppState;

fn default_metric() -> String {
    "registrations".to_string()
}

fn default_leaderboard_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub region: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default = "default_leaderboard_limit")]
    pub limit: i64,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub metric: String,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// GET /api/leaderboard - Ranked leaders for the chosen metric
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardQuery>,
    _actor: Actor,
) -> ApiResult<Json<LeaderboardResponse>> {
    let metric = Metric::parse(&params.metric)?;
    let region = params.region.as_deref().filter(|r| !r.is_empty());
    let date_from = parse_date_param(params.date_from.as_deref(), "date_from")?;
    let date_to = parse_date_param(params.date_to.as_deref(), "date_to")?;
    let limit = params.limit.max(0);

    let entries =
        leaderboard::leaderboard(&state.db, region, date_from, date_to, metric, limit).await?;

    Ok(Json(LeaderboardResponse {
        metric: params.metric,
        leaderboard: entries,
    }))
}
