use crate::{
    season::{
        tokyo_today,
        SeasonTable,
    },
    PoiseContext,
    PoiseError,
};
use time::Duration;

const MAP_USAGE: &str = "\
Use /map <user> <season> to chart the ranked win rate of a player on every map they played that season.";

/// List every season with its current period
fn season_list(table: &SeasonTable) -> String {
    let mut list = String::from("Seasons (Tokyo time):\n");
    for (season, period) in table.iter() {
        list.push_str(&format!("`{season}`: {period}\n"));
    }
    list
}

/// Show help, and the season periods for `/map`
#[poise::command(slash_command)]
pub async fn help(
    ctx: PoiseContext<'_>,
    #[description = "Specific command to show help about"] command: Option<String>,
) -> Result<(), PoiseError> {
    let config = poise::builtins::HelpConfiguration {
        extra_text_at_bottom: MAP_USAGE,
        ephemeral: true,
        ..Default::default()
    };
    poise::builtins::help(ctx, command.as_deref(), config).await?;

    if matches!(command.as_deref(), None | Some("map")) {
        let table = SeasonTable::new(tokyo_today() - Duration::days(1));
        ctx.send(
            poise::reply::CreateReply::default()
                .content(season_list(&table))
                .ephemeral(true),
        )
        .await?;
    }

    Ok(())
}
