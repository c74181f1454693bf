use super::{send_chunked, session_key, with_notices};
use crate::state::Context;
use crate::views::search::{self as search_view, SearchOutcome};

/// Find the documents most similar to a query
#[poise::command(slash_command, guild_only)]
pub async fn search(
    ctx: Context<'_>,
    #[description = "Search documents..."] query: String,
    #[description = "Results limit (1-20)"]
    #[min = 1]
    #[max = 20]
    limit: Option<u32>,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let default_limit = ctx.data().view_config.read().await.search_limit;
    let limit = limit.unwrap_or(default_limit) as usize;

    let session = ctx.data().views.session(session_key(&ctx)).await;
    match search_view::search(&session, ctx.data().api.as_ref(), &query, limit).await {
        SearchOutcome::Ignored => {
            ctx.say("Enter something to search for.").await?;
            Ok(())
        }
        SearchOutcome::Completed { notices, .. } => {
            let body = session.lock().await.search.render();
            send_chunked(&ctx, &with_notices(&notices, &body)).await
        }
    }
}
