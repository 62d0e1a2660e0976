use clap::Subcommand;

use crate::cli::subcommands::{
    AuditArgs, ExerciseCommands, PostCommands, SolutionCommands, TrackCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Users and registration.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Tracks and membership.
    Track {
        #[command(subcommand)]
        action: TrackCommands,
    },
    /// Track curriculum.
    Exercise {
        #[command(subcommand)]
        action: ExerciseCommands,
    },
    /// Solution lifecycle.
    Solution {
        #[command(subcommand)]
        action: SolutionCommands,
    },
    /// Discussion on iterations.
    Post {
        #[command(subcommand)]
        action: PostCommands,
    },
    /// Query the audit trail, newest first.
    Audit(AuditArgs),
}
