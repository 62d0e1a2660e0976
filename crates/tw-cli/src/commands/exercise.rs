use crate::cli::GlobalFlags;
use crate::cli::subcommands::ExerciseCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tw exercise`.
pub async fn handle(
    action: &ExerciseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ExerciseCommands::Add {
            track,
            slug,
            title,
            position,
            side,
        } => {
            let exercise = ctx
                .service
                .create_exercise(track, slug, title, *position, !side)
                .await?;
            output(&exercise, flags.format)
        }
        ExerciseCommands::List { track } => {
            let exercises = ctx.service.list_exercises(track).await?;
            output(&exercises, flags.format)
        }
    }
}
