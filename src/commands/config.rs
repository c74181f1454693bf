use crate::state::{Context, VIEW_CONFIG_PARAMS};

/// Configure dashboard display parameters (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn config(
    ctx: Context<'_>,
    #[description = "search_limit | top_documents | log_rows | preview_width | preview_rows"]
    param: Option<String>,
    #[description = "New value"] value: Option<u32>,
) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    if !ctx.data().is_admin(user_id) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    match (param.as_deref(), value) {
        // Show current config
        (None, _) => {
            let config = ctx.data().view_config.read().await;
            ctx.say(format!(
                "**Dashboard Configuration:**\n\
                 `search_limit`: {}\n\
                 `top_documents`: {}\n\
                 `log_rows`: {}\n\
                 `preview_width`: {}\n\
                 `preview_rows`: {}",
                config.search_limit,
                config.top_documents,
                config.log_rows,
                config.preview_width,
                config.preview_rows
            ))
            .await?;
        }
        // Set a parameter
        (Some(key), Some(val)) => {
            let result = ctx.data().view_config.write().await.set(key, val);
            match result {
                Ok(()) => ctx.say(format!("`{}` set to {}", key, val)).await?,
                Err(msg) => ctx.say(msg).await?,
            };
        }
        (Some(_), None) => {
            ctx.say(format!(
                "Provide both `param` and `value`. Valid params: {}. Example: `/kb config search_limit 10`",
                VIEW_CONFIG_PARAMS
            ))
            .await?;
        }
    }

    Ok(())
}
