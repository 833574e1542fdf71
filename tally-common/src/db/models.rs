//! Shared database models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Account role. Fixed at account creation; no operation escalates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Leader,
    Staff,
    Admin,
}

impl Role {
    /// Stored and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Leader => "leader",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "leader" => Ok(Role::Leader),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(Error::InvalidArgument(format!("Unknown role: {}", other))),
        }
    }

    /// Leaders run sessions and appear in rankings
    pub fn is_leader(&self) -> bool {
        matches!(self, Role::Leader)
    }

    /// Staff and admins review the submission inbox
    pub fn can_approve(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }

    /// Admins manage criteria and accounts
    pub fn can_administer(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Role a person held within a single session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipationRole {
    Leader,
    RegistrationExpert,
    RoomCaptain,
}

impl ParticipationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationRole::Leader => "LEADER",
            ParticipationRole::RegistrationExpert => "REGISTRATION_EXPERT",
            ParticipationRole::RoomCaptain => "ROOM_CAPTAIN",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "LEADER" => Ok(ParticipationRole::Leader),
            "REGISTRATION_EXPERT" => Ok(ParticipationRole::RegistrationExpert),
            "ROOM_CAPTAIN" => Ok(ParticipationRole::RoomCaptain),
            other => Err(Error::InvalidArgument(format!(
                "Unknown participation role: {}",
                other
            ))),
        }
    }
}

/// Lifecycle status of a staged submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            other => Err(Error::InvalidArgument(format!(
                "Unknown submission status: {}",
                other
            ))),
        }
    }

    /// Approved and rejected are terminal; no transition leaves them
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Approved | SubmissionStatus::Rejected)
    }
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub region: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// One recruitment event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub date: NaiveDate,
    pub location: String,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Links a person to a session with a role tag.
/// (session_id, person_id, role) is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
    pub id: Uuid,
    pub session_id: Uuid,
    pub person_id: Uuid,
    pub role: ParticipationRole,
}

/// Reported counts for one session, 1:1 with the session row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub session_id: Uuid,
    pub guests_count: i64,
    pub registrations_count: i64,
    pub room_captain_id: Option<Uuid>,
    pub submitted_by: Uuid,
    pub submitted_at: DateTime<Utc>,
}

/// Target profile, either global (person_id = None) or scoped to one person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criteria {
    pub id: Uuid,
    pub person_id: Option<Uuid>,
    pub guests_target: Option<i64>,
    pub registrations_target: Option<i64>,
    pub effectiveness_target_pct: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to materialize a session on approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub date: NaiveDate,
    pub location: String,
    /// Participant person ids; the submitter need not be listed
    pub participants: Vec<Uuid>,
    #[serde(default)]
    pub room_captain_id: Option<Uuid>,
    pub guests_count: i64,
    pub registrations_count: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A staged session report awaiting staff review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingSubmission {
    pub id: Uuid,
    pub payload: SubmissionPayload,
    pub submitted_by: Uuid,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
}
