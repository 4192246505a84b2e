use crate::{
    map_stats::{
        aggregate_and_render,
        ChartArtifact,
    },
    season::{
        resolve_season,
        tokyo_today,
        Period,
        Season,
    },
    PoiseContext,
    PoiseError,
};
use anyhow::Context as _;
use poise::reply::CreateReply;
use serenity::builder::CreateAttachment;
use tracing::{
    error,
    info,
};

/// Make the reply for a chart on disk
async fn chart_reply(artifact: &ChartArtifact) -> anyhow::Result<CreateReply> {
    let attachment = CreateAttachment::path(artifact.path.as_std_path())
        .await
        .with_context(|| format!("failed to read \"{}\"", artifact.path))?;

    Ok(CreateReply::default().attachment(attachment))
}

/// Fetch, render and load a chart
async fn make_chart(
    ctx: PoiseContext<'_>,
    user: &str,
    period: Period,
) -> anyhow::Result<CreateReply> {
    let data = ctx.data();
    let artifact = aggregate_and_render(
        &data.stats_provider,
        &data.renderer,
        user,
        period,
        &data.config.chart_path(),
    )
    .await?;

    chart_reply(&artifact).await
}

#[poise::command(
    slash_command,
    description_localized("en-US", "Chart the ranked win rate of a player per map")
)]
pub async fn map(
    ctx: PoiseContext<'_>,
    #[description = "The ubisoft name of the player"] user: String,
    #[description = "The season"] season: Season,
) -> Result<(), PoiseError> {
    let period = resolve_season(season, tokyo_today());

    info!("charting map stats for \"{user}\" in {season} ({period})");

    ctx.defer().await?;
    let result = make_chart(ctx, &user, period).await;

    let reply = match result {
        Ok(reply) => reply,
        Err(error) => {
            error!("failed to chart map stats for \"{user}\": {error:?}");
            CreateReply::default().content(format!("Error: {error}"))
        }
    };

    ctx.send(reply).await?;

    Ok(())
}
