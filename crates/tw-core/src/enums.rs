//! Status enums, entity types, and audit actions for Trackway.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `SolutionStatus` is never stored; it is derived on every read by
//! [`crate::status::resolve`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SolutionStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a solution, ordered from earliest to latest.
///
/// ```text
/// unlocked ⇄ iterating ⇄ completed_unapproved ⇄ completed_approved
///                 ↑                                      │
///                 └────────── migrate_to_v2 ─────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    Unlocked,
    Iterating,
    CompletedUnapproved,
    CompletedApproved,
}

impl SolutionStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Unlocked,
        Self::Iterating,
        Self::CompletedUnapproved,
        Self::CompletedApproved,
    ];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Unlocked => &[Self::Iterating],
            Self::Iterating => &[Self::Unlocked, Self::CompletedUnapproved],
            Self::CompletedUnapproved => &[Self::Iterating, Self::CompletedApproved],
            Self::CompletedApproved => &[Self::CompletedUnapproved, Self::Iterating],
        }
    }

    /// Check whether moving to `next` is allowed. Staying put always is.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::CompletedUnapproved | Self::CompletedApproved)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unlocked => "unlocked",
            Self::Iterating => "iterating",
            Self::CompletedUnapproved => "completed_unapproved",
            Self::CompletedApproved => "completed_approved",
        }
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    Deleted,
    Joined,
    TokenIssued,
    Reflected,
    Reviewed,
    MigratedV2,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::Deleted => "deleted",
            Self::Joined => "joined",
            Self::TokenIssued => "token_issued",
            Self::Reflected => "reflected",
            Self::Reviewed => "reviewed",
            Self::MigratedV2 => "migrated_v2",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used in errors and the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    AuthToken,
    Track,
    Exercise,
    UserTrack,
    Solution,
    Iteration,
    DiscussionPost,
    Mentorship,
    Audit,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::AuthToken => "auth_token",
            Self::Track => "track",
            Self::Exercise => "exercise",
            Self::UserTrack => "user_track",
            Self::Solution => "solution",
            Self::Iteration => "iteration",
            Self::DiscussionPost => "discussion_post",
            Self::Mentorship => "mentorship",
            Self::Audit => "audit",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        status_completed_unapproved,
        SolutionStatus,
        SolutionStatus::CompletedUnapproved,
        "completed_unapproved"
    );
    test_serde_roundtrip!(
        audit_migrated_v2,
        AuditAction,
        AuditAction::MigratedV2,
        "migrated_v2"
    );
    test_serde_roundtrip!(
        entity_type_user_track,
        EntityType,
        EntityType::UserTrack,
        "user_track"
    );

    #[test]
    fn as_str_matches_serde() {
        for status in SolutionStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn statuses_are_ordered_by_lifecycle() {
        let mut sorted = SolutionStatus::ALL;
        sorted.sort();
        assert_eq!(sorted, SolutionStatus::ALL);
        assert!(SolutionStatus::Unlocked < SolutionStatus::CompletedApproved);
    }

    #[test]
    fn forward_and_reverse_transitions_allowed() {
        for pair in SolutionStatus::ALL.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
            assert!(pair[1].can_transition_to(pair[0]), "{} -> {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn cannot_skip_to_completion_without_iterating() {
        assert!(!SolutionStatus::Unlocked.can_transition_to(SolutionStatus::CompletedUnapproved));
        assert!(!SolutionStatus::Unlocked.can_transition_to(SolutionStatus::CompletedApproved));
        assert!(!SolutionStatus::CompletedApproved.can_transition_to(SolutionStatus::Unlocked));
    }

    #[test]
    fn migration_path_from_approved_to_iterating() {
        assert!(SolutionStatus::CompletedApproved.can_transition_to(SolutionStatus::Iterating));
    }
}
