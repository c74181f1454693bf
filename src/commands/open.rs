use tracing::info;

use super::{send_chunked, session_key};
use crate::state::Context;
use crate::views::{open_citation, OpenOutcome};

/// Expand (or collapse) a citation on the current page
#[poise::command(slash_command, guild_only)]
pub async fn open(
    ctx: Context<'_>,
    #[description = "Citation number"] number: u32,
) -> Result<(), anyhow::Error> {
    let session = ctx.data().views.session(session_key(&ctx)).await;
    let route = session.lock().await.route;
    let sizing = ctx.data().view_config.read().await.sizing(route);

    let reply = match open_citation(&session, number as usize, sizing).await {
        OpenOutcome::Shown(preview) => {
            info!(path = %preview.path, kind = %preview.kind, "citation opened");
            format!("**{}** ({})\n{}", preview.path, preview.kind, preview.body)
        }
        OpenOutcome::Closed { path } => format!("Closed **{}**.", path),
        OpenOutcome::Superseded => "Selection changed before the table finished loading.".to_string(),
        OpenOutcome::Missing { available: 0 } => "Nothing to open on this page yet.".to_string(),
        OpenOutcome::Missing { available } => {
            format!("Pick a number between 1 and {}.", available)
        }
        OpenOutcome::NoCitations(route) => format!(
            "The {} page has no documents to open. Use `/kb search`, `/kb ask` or `/kb inspect` first.",
            route.title()
        ),
    };
    send_chunked(&ctx, &reply).await
}
