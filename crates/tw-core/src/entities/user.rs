use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A registered learner or mentor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub handle: String,
    pub created_at: DateTime<Utc>,
}

/// An opaque access credential issued to a user at registration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthToken {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Grant of access to a track. At most one per (user, track).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserTrack {
    pub id: String,
    pub user_id: String,
    pub track_id: String,
    pub created_at: DateTime<Utc>,
}
