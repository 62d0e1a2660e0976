//! Response types for operations that touch more than one row.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AuthToken, Solution, UserTrack};

/// A rating and review left by a solution's owner for one mentor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MentorReview {
    pub rating: u8,
    pub review: String,
}

/// A review entry that was not applied.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RejectedReview {
    pub reviewer_id: String,
    pub reason: String,
}

/// Result of submitting a reflection with mentor reviews.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReflectionOutcome {
    pub solution: Solution,
    /// Mentorships on this solution that now carry a rating.
    pub rated_mentorships: u32,
    pub rejected: Vec<RejectedReview>,
    /// Shell created for the next core exercise, if one was due.
    pub unlocked_solution: Option<Solution>,
}

/// Result of bootstrapping a newly registered user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub token: AuthToken,
    pub user_track: Option<UserTrack>,
}

/// Result of migrating a solution to the v2 shape.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MigrationResponse {
    pub solution: Solution,
    /// Location of the migrated resource, addressed by uuid.
    pub redirect_to: String,
}

impl MigrationResponse {
    #[must_use]
    pub fn for_solution(solution: Solution) -> Self {
        let redirect_to = solution_path(&solution.uuid);
        Self {
            solution,
            redirect_to,
        }
    }
}

/// Path at which a solution is addressed by external callers.
#[must_use]
pub fn solution_path(uuid: &str) -> String {
    format!("solutions/{uuid}")
}
