use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An ordered curriculum of exercises.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// One exercise in a track's curriculum.
///
/// `position` is unique within the track; higher means later. Core exercises
/// gate progression, side exercises do not.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Exercise {
    pub id: String,
    pub track_id: String,
    pub slug: String,
    pub title: String,
    pub position: i64,
    pub core: bool,
}
