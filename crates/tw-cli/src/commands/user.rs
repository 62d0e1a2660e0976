use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tw user`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UserCommands::Register { handle, track } => {
            let (user, outcome) = ctx.service.register_user(handle, track.as_deref()).await?;
            output(
                &json!({
                    "user": user,
                    "token": outcome.token,
                    "user_track": outcome.user_track,
                }),
                flags.format,
            )
        }
        UserCommands::Token { user } => {
            let token = ctx.service.issue_auth_token(user).await?;
            output(&token, flags.format)
        }
        UserCommands::Whoami { token } => {
            let user = ctx.service.authenticate(token).await?;
            output(&user, flags.format)
        }
    }
}
