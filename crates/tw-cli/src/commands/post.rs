use crate::cli::GlobalFlags;
use crate::cli::subcommands::PostCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tw post`.
pub async fn handle(action: &PostCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        PostCommands::Create {
            iteration,
            user,
            content,
        } => {
            let post = ctx
                .service
                .create_discussion_post(iteration, user, content)
                .await?;
            output(&post, flags.format)
        }
        PostCommands::List { iteration } => {
            let posts = ctx.service.list_posts(iteration).await?;
            output(&posts, flags.format)
        }
    }
}
