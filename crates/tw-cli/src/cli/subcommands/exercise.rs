use clap::Subcommand;

/// Exercise commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExerciseCommands {
    /// Add an exercise to a track.
    Add {
        track: String,
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        position: i64,
        /// Side exercise, outside the core progression.
        #[arg(long)]
        side: bool,
    },
    /// List a track's exercises in order.
    List { track: String },
}
