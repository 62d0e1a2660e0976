use clap::Subcommand;

/// Discussion post commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PostCommands {
    /// Post on an iteration.
    Create {
        iteration: String,
        #[arg(long = "as")]
        user: String,
        #[arg(long)]
        content: String,
    },
    /// List posts on an iteration.
    List { iteration: String },
}
