mod api;
mod commands;
mod config;
mod resolver;
mod state;
mod views;

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tokio::sync::RwLock;
use tracing::{error, info};

use api::{ApiClient, KnowledgeBase};
use config::Settings;
use state::{AppState, ViewConfig};
use views::ViewRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load env
    let _ = dotenv::dotenv();
    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level)
        .init();

    // Init knowledge-base client
    let api: Arc<dyn KnowledgeBase> =
        Arc::new(ApiClient::new(&settings.api_base_url, settings.api_timeout)?);
    info!(base_url = %settings.api_base_url, timeout = ?settings.api_timeout, "knowledge base client initialized");

    if !settings.admin_ids.is_empty() {
        info!(count = settings.admin_ids.len(), "Admin users configured");
    }

    let app_state = AppState {
        api,
        views: Arc::new(ViewRegistry::new()),
        admin_ids: settings.admin_ids,
        view_config: Arc::new(RwLock::new(ViewConfig::default())),
    };

    let guild_id = settings.guild_id.map(serenity::GuildId::new);
    let intents = serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MESSAGES;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::kb()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} top-level command(s):", commands.len());
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                    for sub in &cmd.subcommands {
                        info!("    /{} {}", cmd.name, sub.name);
                    }
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, gid)
                        .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting knowledge base dashboard bot...");

    let mut client = serenity::ClientBuilder::new(&settings.discord_token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
