use crate::cli::GlobalFlags;
use crate::commands::shared::reviews::parse_reviews;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    uuid: &str,
    reflection: &str,
    raw_reviews: &[String],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let reviews = parse_reviews(raw_reviews)?;
    let outcome = ctx
        .service
        .submit_reflection(uuid, reflection, &reviews)
        .await?;
    if !outcome.rejected.is_empty() && !flags.quiet {
        eprintln!(
            "tw: {} review(s) not applied, see \"rejected\"",
            outcome.rejected.len()
        );
    }
    output(&outcome, flags.format)
}
