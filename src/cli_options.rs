use camino::Utf8PathBuf;

/// CLI Options
#[derive(Debug, argh::FromArgs)]
#[argh(description = "The jackal discord bot")]
pub struct CliOptions {
    #[argh(
        option,
        description = "the path to the config",
        default = "Utf8PathBuf::from(\"./config.toml\")"
    )]
    pub config: Utf8PathBuf,

    #[argh(subcommand)]
    pub subcommand: Option<Subcommand>,
}

#[derive(Debug, argh::FromArgs)]
#[argh(subcommand)]
pub enum Subcommand {
    MapStats(MapStatsOptions),
}

/// Print ranked map stats without starting the bot
#[derive(Debug, argh::FromArgs)]
#[argh(
    subcommand,
    name = "map-stats",
    description = "print the ranked map stats of a player as a table"
)]
pub struct MapStatsOptions {
    #[argh(positional, description = "the ubisoft name of the player")]
    pub user: String,

    #[argh(
        option,
        description = "the season to report on, defaults to VECTOR_GLARE",
        default = "String::from(\"VECTOR_GLARE\")"
    )]
    pub season: String,

    #[argh(option, description = "the first day to include, as YYYYMMDD")]
    pub start: Option<String>,

    #[argh(option, description = "the last day to include, as YYYYMMDD")]
    pub end: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;
    use argh::FromArgs;

    #[test]
    fn parse_defaults() {
        let options = CliOptions::from_args(&["jackal"], &[]).expect("failed to parse");
        assert_eq!(options.config, "./config.toml");
        assert!(options.subcommand.is_none());
    }

    #[test]
    fn parse_map_stats() {
        let options = CliOptions::from_args(
            &["jackal"],
            &["--config", "bot.toml", "map-stats", "Beaulo.TSM", "--start", "20220607"],
        )
        .expect("failed to parse");
        assert_eq!(options.config, "bot.toml");

        let Some(Subcommand::MapStats(map_stats)) = options.subcommand else {
            panic!("missing subcommand");
        };
        assert_eq!(map_stats.user, "Beaulo.TSM");
        assert_eq!(map_stats.season, "VECTOR_GLARE");
        assert_eq!(map_stats.start.as_deref(), Some("20220607"));
        assert!(map_stats.end.is_none());
    }
}
