use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TrackCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tw track`.
pub async fn handle(action: &TrackCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        TrackCommands::Add { slug, title } => {
            let track = ctx.service.create_track(slug, title).await?;
            output(&track, flags.format)
        }
        TrackCommands::List => {
            let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);
            let tracks = ctx.service.list_tracks(limit).await?;
            output(&tracks, flags.format)
        }
        TrackCommands::Join { track, user } => {
            let user_track = ctx.service.join_track(user, track).await?;
            let started = ctx.service.start_track_exercise(user, track).await?;
            output(
                &json!({
                    "user_track": user_track,
                    "started": started,
                }),
                flags.format,
            )
        }
        TrackCommands::Show { track, user } => {
            let view = ctx.service.view_track(user.as_deref(), track).await?;
            output(&view, flags.format)
        }
    }
}
