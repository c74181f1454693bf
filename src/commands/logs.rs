use tracing::info;

use super::{send_chunked, session_key, with_notices};
use crate::api::types::QueryLogFilter;
use crate::state::Context;
use crate::views::{logs as log_view, Route};

/// Recent queries, newest first
#[poise::command(slash_command, guild_only)]
pub async fn logs(
    ctx: Context<'_>,
    #[description = "Rows to show"] limit: Option<u32>,
    #[description = "Include failed queries (default: yes)"] include_errors: Option<bool>,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let default_rows = ctx.data().view_config.read().await.log_rows;
    let limit = limit.unwrap_or(default_rows).clamp(1, 50) as usize;
    let filter = QueryLogFilter {
        include_citations: true,
        include_errors: include_errors.unwrap_or(true),
    };

    let session = ctx.data().views.session(session_key(&ctx)).await;
    let notices = log_view::load(&session, ctx.data().api.as_ref(), filter).await;
    let table = session.lock().await.logs.render_table(limit);
    info!(user = ctx.author().name, limit, "query logs viewed");

    send_chunked(&ctx, &with_notices(&notices, &table)).await
}

/// Show the documents cited by one query-log row
#[poise::command(slash_command, guild_only)]
pub async fn inspect(
    ctx: Context<'_>,
    #[description = "Row number from /kb logs"] row: u32,
) -> Result<(), anyhow::Error> {
    let session = ctx.data().views.session(session_key(&ctx)).await;
    let reply = {
        let mut guard = session.lock().await;
        guard.navigate(Route::QueryLogs);
        if guard.logs.logs().is_empty() {
            "No query logs loaded. Run `/kb logs` first.".to_string()
        } else if guard.logs.inspect(row as usize).is_none() {
            format!("No row {}. The table has {} rows.", row, guard.logs.logs().len())
        } else {
            guard.logs.render_inspector()
        }
    };
    send_chunked(&ctx, &reply).await
}
