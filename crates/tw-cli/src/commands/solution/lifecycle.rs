use serde_json::json;
use tw_core::entities::Solution;
use tw_db::updates::solution::SolutionUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

async fn output_with_status(
    solution: &Solution,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let status = ctx.service.solution_status(solution).await?;
    output(
        &json!({
            "solution": solution,
            "status": status,
        }),
        flags.format,
    )
}

pub async fn complete(uuid: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let solution = ctx.service.complete_solution(uuid).await?;
    output_with_status(&solution, ctx, flags).await
}

pub async fn publish(uuid: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let solution = ctx.service.publish_solution(uuid).await?;
    output_with_status(&solution, ctx, flags).await
}

pub async fn approve(
    uuid: &str,
    approver: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let solution = ctx.service.approve_solution(uuid, approver).await?;
    output_with_status(&solution, ctx, flags).await
}

pub async fn reopen(
    uuid: &str,
    uncomplete: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut builder = SolutionUpdateBuilder::new().approved_by(None);
    if uncomplete {
        builder = builder.completed_at(None);
    }
    let solution = ctx.service.update_solution(uuid, builder.build()).await?;
    output_with_status(&solution, ctx, flags).await
}
