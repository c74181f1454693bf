use tracing::info;

use super::{send_chunked, session_key};
use crate::state::Context;
use crate::views::chat::{self, AskOutcome};

/// Ask the knowledge base a question
#[poise::command(slash_command, guild_only)]
pub async fn ask(
    ctx: Context<'_>,
    #[description = "Your question"] question: String,
) -> Result<(), anyhow::Error> {
    // Acknowledge immediately; answers can take a while.
    ctx.defer().await?;

    info!(user = ctx.author().name, question, "chat query started");
    let session = ctx.data().views.session(session_key(&ctx)).await;

    match chat::ask(&session, ctx.data().api.as_ref(), &question).await {
        AskOutcome::Ignored => {
            ctx.say("Ask a question to get started.").await?;
            Ok(())
        }
        AskOutcome::Failed(notice) => {
            ctx.say(notice.to_string()).await?;
            Ok(())
        }
        AskOutcome::Answered(message) => {
            info!(
                answer_len = message.content.len(),
                citations = message.citations.len(),
                "chat query complete"
            );
            let reply = session.lock().await.chat.render_answer(&message);
            send_chunked(&ctx, &reply).await
        }
    }
}
