//! Caller-dependent projections of tracks and solutions.
//!
//! The projection is chosen once per request by the service layer: callers
//! without an identity get the signed-out variant, callers who have not
//! unlocked the track get the locked variant, everyone else gets full data.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Exercise, Iteration, Solution, SolutionMentorship, Track};
use crate::enums::SolutionStatus;

/// Everything the owner of an unlocked solution may see.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SolutionDetail {
    pub status: SolutionStatus,
    pub solution: Solution,
    pub exercise: Exercise,
    pub iterations: Vec<Iteration>,
    pub mentorships: Vec<SolutionMentorship>,
}

/// Projection of a solution for one caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SolutionView {
    Full(Box<SolutionDetail>),
    Locked { uuid: String, track: Track },
    SignedOut { uuid: String, exercise: Exercise },
}

impl SolutionView {
    /// The resolved status, present only on the full view.
    #[must_use]
    pub fn status(&self) -> Option<SolutionStatus> {
        match self {
            Self::Full(detail) => Some(detail.status),
            Self::Locked { .. } | Self::SignedOut { .. } => None,
        }
    }
}

/// Per-exercise progress within a track, from the caller's point of view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExerciseProgress {
    pub exercise: Exercise,
    pub unlocked: bool,
    pub solution_uuid: Option<String>,
    pub status: Option<SolutionStatus>,
}

/// Projection of a track for one caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum TrackView {
    Full {
        track: Track,
        exercises: Vec<ExerciseProgress>,
    },
    Locked {
        track: Track,
    },
    SignedOut {
        track: Track,
    },
}

impl TrackView {
    #[must_use]
    pub const fn track(&self) -> &Track {
        match self {
            Self::Full { track, .. } | Self::Locked { track } | Self::SignedOut { track } => track,
        }
    }
}
