use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::interactions;

// --- SwipeAction ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Dislike,
    Superlike,
}

impl SwipeAction {
    pub const POSITIVE: [&'static str; 2] = ["like", "superlike"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "like",
            SwipeAction::Dislike => "dislike",
            SwipeAction::Superlike => "superlike",
        }
    }

    /// Like and superlike can turn into a match; dislike never does.
    pub fn is_positive(&self) -> bool {
        !matches!(self, SwipeAction::Dislike)
    }

    pub fn initial_status(&self) -> InteractionStatus {
        if self.is_positive() {
            InteractionStatus::Pending
        } else {
            InteractionStatus::Rejected
        }
    }
}

impl std::fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SwipeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(SwipeAction::Like),
            "dislike" => Ok(SwipeAction::Dislike),
            "superlike" => Ok(SwipeAction::Superlike),
            _ => Err(format!("unknown swipe action: {s}")),
        }
    }
}

// --- InteractionStatus ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionStatus {
    Pending,
    Rejected,
    Matched,
}

impl InteractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionStatus::Pending => "pending",
            InteractionStatus::Rejected => "rejected",
            InteractionStatus::Matched => "matched",
        }
    }
}

impl std::fmt::Display for InteractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InteractionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InteractionStatus::Pending),
            "rejected" => Ok(InteractionStatus::Rejected),
            "matched" => Ok(InteractionStatus::Matched),
            _ => Err(format!("unknown interaction status: {s}")),
        }
    }
}

// --- Swipe ---

/// One user's decision about another, as submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swipe {
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub action: SwipeAction,
}

impl Swipe {
    pub fn new(actor_id: Uuid, target_id: Uuid, action: SwipeAction) -> Self {
        Self {
            actor_id,
            target_id,
            action,
        }
    }

    /// Both users of the swipe, smaller id first. Identical for A→B and B→A.
    pub fn unordered_pair(&self) -> (Uuid, Uuid) {
        if self.actor_id <= self.target_id {
            (self.actor_id, self.target_id)
        } else {
            (self.target_id, self.actor_id)
        }
    }
}

// --- Interaction ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub action: SwipeAction,
    pub status: InteractionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = interactions)]
pub struct InteractionRow {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub action: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = String;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            actor_id: row.actor_id,
            target_id: row.target_id,
            action: row.action.parse()?,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = interactions)]
pub struct NewInteraction {
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub action: String,
    pub status: String,
}

impl From<&Swipe> for NewInteraction {
    fn from(swipe: &Swipe) -> Self {
        Self {
            actor_id: swipe.actor_id,
            target_id: swipe.target_id,
            action: swipe.action.as_str().to_string(),
            status: swipe.action.initial_status().as_str().to_string(),
        }
    }
}
