//! ID prefix constants.
//!
//! Internal ids are `{prefix}-{8 hex chars}`, generated by the database layer.
//! Solutions additionally carry a uuid, which is the only identifier exposed
//! to callers.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_AUTH_TOKEN: &str = "tok";
pub const PREFIX_TRACK: &str = "trk";
pub const PREFIX_EXERCISE: &str = "exr";
pub const PREFIX_USER_TRACK: &str = "utk";
pub const PREFIX_SOLUTION: &str = "sol";
pub const PREFIX_ITERATION: &str = "itr";
pub const PREFIX_DISCUSSION_POST: &str = "dsc";
pub const PREFIX_MENTORSHIP: &str = "mnt";
pub const PREFIX_AUDIT: &str = "aud";

/// All prefixes, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_USER,
    PREFIX_AUTH_TOKEN,
    PREFIX_TRACK,
    PREFIX_EXERCISE,
    PREFIX_USER_TRACK,
    PREFIX_SOLUTION,
    PREFIX_ITERATION,
    PREFIX_DISCUSSION_POST,
    PREFIX_MENTORSHIP,
    PREFIX_AUDIT,
];

/// Lowest rating a mentor review may carry.
pub const MIN_RATING: u8 = 1;
/// Highest rating a mentor review may carry.
pub const MAX_RATING: u8 = 5;
