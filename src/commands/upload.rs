use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::info;

use crate::api::types::UploadFile;
use crate::api::Notice;
use crate::state::Context;
use crate::views::upload as upload_view;

/// Upload documents (PDF, Markdown, CSV) to the knowledge base
#[poise::command(slash_command, guild_only)]
pub async fn upload(
    ctx: Context<'_>,
    #[description = "Document"] file1: Option<serenity::Attachment>,
    #[description = "Document"] file2: Option<serenity::Attachment>,
    #[description = "Document"] file3: Option<serenity::Attachment>,
) -> Result<(), anyhow::Error> {
    let attachments: Vec<serenity::Attachment> =
        [file1, file2, file3].into_iter().flatten().collect();
    // Reject by name before paying for any download.
    if let Err(rejection) = upload_view::check_names(attachments.iter().map(|a| a.filename.as_str())) {
        info!(user = ctx.author().name, %rejection, "upload rejected");
        ctx.say(Notice::error(rejection.to_string()).to_string()).await?;
        return Ok(());
    }

    ctx.defer().await?;

    let mut files = Vec::with_capacity(attachments.len());
    for attachment in &attachments {
        let bytes = attachment
            .download()
            .await
            .with_context(|| format!("Failed to download attachment {}", attachment.filename))?;
        files.push(UploadFile {
            name: attachment.filename.clone(),
            bytes,
        });
    }

    info!(user = ctx.author().name, count = files.len(), "upload started");
    let notice = upload_view::upload(ctx.data().api.as_ref(), files).await;
    ctx.say(notice.to_string()).await?;
    Ok(())
}
