use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A user's work on one exercise.
///
/// Only the stored facts live here; the lifecycle status is derived from them
/// by [`crate::status::resolve`]. `uuid` is the external identifier and never
/// changes, including across `migrate_to_v2`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Solution {
    pub id: String,
    pub uuid: String,
    pub user_id: String,
    pub exercise_id: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub reflection: Option<String>,
    pub last_updated_by_user_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One submitted attempt at a solution.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Iteration {
    pub id: String,
    pub solution_id: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
