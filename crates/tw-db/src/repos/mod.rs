//! Repository modules implementing the progression rules.
//!
//! Each module adds methods to `ProgressService` via `impl ProgressService` blocks.

pub mod audit;
pub mod bootstrap;
pub mod catalog;
pub mod discussion;
pub mod iteration;
pub mod reflection;
pub mod solution;
pub mod user;
pub mod user_track;
pub mod views;
