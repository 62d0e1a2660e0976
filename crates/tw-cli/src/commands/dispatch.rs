use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Track { action } => commands::track::handle(&action, ctx, flags).await,
        Commands::Exercise { action } => commands::exercise::handle(&action, ctx, flags).await,
        Commands::Solution { action } => commands::solution::handle(&action, ctx, flags).await,
        Commands::Post { action } => commands::post::handle(&action, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
    }
}
