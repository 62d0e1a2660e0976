use clap::Subcommand;

/// Track commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TrackCommands {
    /// Create a track.
    Add {
        slug: String,
        #[arg(long)]
        title: String,
    },
    /// List tracks.
    List,
    /// Join a track and start its first core exercise.
    Join {
        track: String,
        #[arg(long = "as")]
        user: String,
    },
    /// Show a track with the viewer's progress.
    Show {
        track: String,
        /// Viewing user; omit for the signed-out view.
        #[arg(long = "as")]
        user: Option<String>,
    },
}
