use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Register a user, issue a token, and optionally join a first track.
    Register {
        handle: String,
        /// Track id to join right away.
        #[arg(long)]
        track: Option<String>,
    },
    /// Issue an additional auth token.
    Token { user: String },
    /// Show the user an auth token belongs to.
    Whoami {
        #[arg(long)]
        token: String,
    },
}
