//! Entity structs for all Trackway domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `tw-db/migrations`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod audit;
mod catalog;
mod mentorship;
mod solution;
mod user;

pub use audit::AuditEntry;
pub use catalog::{Exercise, Track};
pub use mentorship::{DiscussionPost, SolutionMentorship};
pub use solution::{Iteration, Solution};
pub use user::{AuthToken, User, UserTrack};
