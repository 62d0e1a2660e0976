use tw_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tw audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = AuditFilter {
        entity_type: args.entity_type,
        entity_id: args.entity.clone(),
        action: args.action,
        limit: Some(effective_limit(None, flags.limit, ctx.config.general.default_limit)),
    };
    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
