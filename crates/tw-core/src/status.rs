//! Solution status resolution.
//!
//! The status shown for a solution is a pure projection of three facts:
//! whether it has iterations, whether `completed_at` is set, and whether
//! `approved_by` is set. Every reachable combination maps to exactly one
//! [`SolutionStatus`]; the remaining combinations are integrity violations.
//!
//! | iterations | completed_at | approved_by | status                 |
//! |------------|--------------|-------------|------------------------|
//! | none       | null         | null        | `unlocked`             |
//! | ≥1         | null         | null        | `iterating`            |
//! | ≥1         | set          | null        | `completed_unapproved` |
//! | ≥1         | set          | set         | `completed_approved`   |
//! | any        | null         | set         | violation              |
//! | none       | set          | any         | violation              |

use crate::entities::Solution;
use crate::enums::{EntityType, SolutionStatus};
use crate::errors::CoreError;

/// The facts the resolver looks at, detached from the full entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFacts {
    pub has_iterations: bool,
    pub completed: bool,
    pub approved: bool,
}

impl StatusFacts {
    #[must_use]
    pub const fn of(solution: &Solution, has_iterations: bool) -> Self {
        Self {
            has_iterations,
            completed: solution.completed_at.is_some(),
            approved: solution.approved_by.is_some(),
        }
    }

    /// Map the facts to a status, or explain why they cannot be mapped.
    ///
    /// # Errors
    ///
    /// Returns the reason string when the combination is unreachable.
    pub const fn status(self) -> Result<SolutionStatus, &'static str> {
        match (self.has_iterations, self.completed, self.approved) {
            (_, false, true) => Err("approved_by is set but completed_at is null"),
            (false, true, _) => Err("completed_at is set but the solution has no iterations"),
            (false, false, false) => Ok(SolutionStatus::Unlocked),
            (true, false, false) => Ok(SolutionStatus::Iterating),
            (true, true, false) => Ok(SolutionStatus::CompletedUnapproved),
            (true, true, true) => Ok(SolutionStatus::CompletedApproved),
        }
    }
}

/// Derive the lifecycle status of `solution`.
///
/// Pure and deterministic: the solution is never mutated and the same inputs
/// always give the same answer.
///
/// # Errors
///
/// Returns `CoreError::IntegrityViolation` when the stored facts do not match
/// exactly one status.
pub fn resolve(solution: &Solution, has_iterations: bool) -> Result<SolutionStatus, CoreError> {
    StatusFacts::of(solution, has_iterations)
        .status()
        .map_err(|reason| CoreError::IntegrityViolation {
            entity_type: EntityType::Solution,
            id: solution.uuid.clone(),
            reason: reason.to_string(),
        })
}
