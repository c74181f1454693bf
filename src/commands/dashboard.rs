use tracing::info;

use super::{send_chunked, session_key, with_notices};
use crate::api::types::MetricsPeriod;
use crate::state::Context;
use crate::views::dashboard::DashboardView;
use crate::views::Route;

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum PeriodChoice {
    #[name = "day"]
    Day,
    #[name = "week"]
    Week,
    #[name = "month"]
    Month,
}

impl From<PeriodChoice> for MetricsPeriod {
    fn from(choice: PeriodChoice) -> Self {
        match choice {
            PeriodChoice::Day => MetricsPeriod::Day,
            PeriodChoice::Week => MetricsPeriod::Week,
            PeriodChoice::Month => MetricsPeriod::Month,
        }
    }
}

/// Query volume, response metrics and most-cited documents
#[poise::command(slash_command, guild_only)]
pub async fn dashboard(
    ctx: Context<'_>,
    #[description = "Only show metrics for this period"] period: Option<PeriodChoice>,
) -> Result<(), anyhow::Error> {
    let period = period.map(MetricsPeriod::from);
    ctx.defer().await?;

    let session = ctx.data().views.session(session_key(&ctx)).await;
    session.lock().await.navigate(Route::Dashboard);

    let top_k = ctx.data().view_config.read().await.top_documents as usize;
    let (view, notices) = DashboardView::load_now(ctx.data().api.as_ref(), top_k).await;
    info!(user = ctx.author().name, failures = notices.len(), "dashboard viewed");

    send_chunked(&ctx, &with_notices(&notices, &view.render(period))).await
}
