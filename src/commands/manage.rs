use super::session_key;
use crate::state::Context;
use crate::views::Route;

/// Collapse the open document, or drop this channel's session entirely
#[poise::command(slash_command, guild_only)]
pub async fn reset(
    ctx: Context<'_>,
    #[description = "Forget the whole session (chat history, results, logs)"] all: Option<bool>,
) -> Result<(), anyhow::Error> {
    let key = session_key(&ctx);

    if all.unwrap_or(false) {
        let existed = ctx.data().views.discard(key).await;
        ctx.say(if existed { "Session cleared." } else { "No session to clear." })
            .await?;
        return Ok(());
    }

    let session = ctx.data().views.session(key).await;
    let route = {
        let mut guard = session.lock().await;
        guard.reset_current();
        match guard.route {
            Route::Chat => guard.chat.clear(),
            Route::QueryLogs => guard.logs.close_inspector(),
            Route::Search | Route::Dashboard => {}
        }
        guard.route
    };
    ctx.say(format!("{} reset.", route.title())).await?;
    Ok(())
}
