use clap::Subcommand;

/// Solution commands. Solutions are addressed by uuid.
#[derive(Clone, Debug, Subcommand)]
pub enum SolutionCommands {
    /// Show a solution as the given viewer sees it.
    Show {
        uuid: String,
        #[arg(long = "as")]
        user: Option<String>,
    },
    /// Submit a new iteration.
    Iterate {
        uuid: String,
        #[arg(long)]
        code: String,
    },
    /// Mark a solution completed.
    Complete { uuid: String },
    /// Publish a completed solution for mentoring.
    Publish { uuid: String },
    /// Approve a completed solution.
    Approve {
        uuid: String,
        #[arg(long)]
        by: String,
    },
    /// Clear completion or approval to reverse a transition.
    Reopen {
        uuid: String,
        /// Also clear completion, back to iterating.
        #[arg(long)]
        uncomplete: bool,
    },
    /// Submit a reflection with mentor reviews.
    Reflect {
        uuid: String,
        #[arg(long)]
        reflection: String,
        /// Mentor review as `<user>=<rating>[:<review>]`. Repeatable.
        #[arg(long)]
        review: Vec<String>,
    },
    /// Reshape a legacy solution for the v2 review model.
    Migrate { uuid: String },
}
