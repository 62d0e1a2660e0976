use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A comment on an iteration. Its author becomes a mentor of the solution.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DiscussionPost {
    pub id: String,
    pub iteration_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One reviewer's relationship to one solution.
///
/// Created on the reviewer's first discussion post, rated by the solution's
/// owner when they submit a reflection. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SolutionMentorship {
    pub id: String,
    pub solution_id: String,
    pub user_id: String,
    pub rating: Option<u8>,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
