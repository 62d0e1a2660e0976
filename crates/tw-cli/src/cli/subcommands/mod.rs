mod audit;
mod exercise;
mod post;
mod solution;
mod track;
mod user;

pub use audit::AuditArgs;
pub use exercise::ExerciseCommands;
pub use post::PostCommands;
pub use solution::SolutionCommands;
pub use track::TrackCommands;
pub use user::UserCommands;
