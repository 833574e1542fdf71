//! HTTP API handlers for tally-st

use chrono::NaiveDate;

use crate::error::{ApiError, ApiResult};

pub mod criteria;
pub mod health;
pub mod leaderboard;
pub mod people;
pub mod sessions;
pub mod submissions;
pub mod users;

pub use criteria::*;
pub use health::*;
pub use leaderboard::*;
pub use people::*;
pub use sessions::*;
pub use submissions::*;
pub use users::*;

/// Parse an optional YYYY-MM-DD query parameter. Empty values count as
/// absent.
pub(crate) fn parse_date_param(value: Option<&str>, name: &str) -> ApiResult<Option<NaiveDate>> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<NaiveDate>().map(Some).map_err(|_| {
            ApiError::BadRequest(format!("Invalid {}: {}. Expected YYYY-MM-DD", name, raw))
        }),
    }
}
