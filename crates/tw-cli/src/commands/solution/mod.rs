mod lifecycle;
mod reflect;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SolutionCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tw solution`.
pub async fn handle(
    action: &SolutionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SolutionCommands::Show { uuid, user } => {
            let view = ctx.service.view_solution(user.as_deref(), uuid).await?;
            output(&view, flags.format)
        }
        SolutionCommands::Iterate { uuid, code } => {
            let iteration = ctx.service.create_iteration(uuid, code).await?;
            output(&iteration, flags.format)
        }
        SolutionCommands::Complete { uuid } => lifecycle::complete(uuid, ctx, flags).await,
        SolutionCommands::Publish { uuid } => lifecycle::publish(uuid, ctx, flags).await,
        SolutionCommands::Approve { uuid, by } => lifecycle::approve(uuid, by, ctx, flags).await,
        SolutionCommands::Reopen { uuid, uncomplete } => {
            lifecycle::reopen(uuid, *uncomplete, ctx, flags).await
        }
        SolutionCommands::Reflect {
            uuid,
            reflection,
            review,
        } => reflect::run(uuid, reflection, review, ctx, flags).await,
        SolutionCommands::Migrate { uuid } => {
            let response = ctx.service.migrate_solution_to_v2(uuid).await?;
            output(&response, flags.format)
        }
    }
}
