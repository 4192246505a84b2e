use crate::{
    cli_options::MapStatsOptions,
    config::Config,
    map_stats::{
        fetch_records,
        MapStatRecord,
        MapStatsError,
        SideStats,
    },
    season::{
        parse_date,
        resolve_now,
        Period,
    },
    stats_provider::SiegeStatsProvider,
    util::AsciiTable,
};
use anyhow::Context;
use tracing::info;

const HEADER: [&str; 7] = [
    "map",
    "matches",
    "win %",
    "atk rounds",
    "atk win %",
    "def rounds",
    "def win %",
];

/// Resolve a season label as of now
fn season_period(label: &str) -> Result<Period, MapStatsError> {
    Ok(resolve_now(label)?)
}

/// Replace the bounds of a period with `YYYYMMDD` dates
pub fn with_bounds(
    mut period: Period,
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<Period> {
    if let Some(start) = start {
        period.start =
            parse_date(start).with_context(|| format!("invalid start date \"{start}\""))?;
    }

    if let Some(end) = end {
        period.end = parse_date(end).with_context(|| format!("invalid end date \"{end}\""))?;
    }

    anyhow::ensure!(
        period.start <= period.end,
        "the period {period} ends before it starts"
    );

    Ok(period)
}

/// Work out the period to report on.
///
/// `--start` and `--end` replace the matching bound of the season's period.
pub fn report_period(options: &MapStatsOptions) -> anyhow::Result<Period> {
    let period = season_period(&options.season)?;
    with_bounds(period, options.start.as_deref(), options.end.as_deref())
}

fn side_cells(side: Option<&SideStats>) -> [String; 2] {
    match side {
        Some(side) => [
            itoa::Buffer::new().format(side.rounds_played).to_string(),
            format!("{:.1}", side.win_percentage),
        ],
        None => ["-".to_string(), "-".to_string()],
    }
}

/// Lay out records as a table, in the given order
pub fn records_table(records: &[MapStatRecord]) -> AsciiTable {
    let mut table = AsciiTable::new(HEADER);

    for record in records {
        let [atk_rounds, atk_win] = side_cells(record.attack.as_ref());
        let [def_rounds, def_win] = side_cells(record.defense.as_ref());

        table.push_row([
            record.map_name.clone(),
            itoa::Buffer::new().format(record.matches_played).to_string(),
            format!("{:.1}", record.win_percentage),
            atk_rounds,
            atk_win,
            def_rounds,
            def_win,
        ]);
    }

    table
}

/// Print the ranked map stats of a player to the stdout
pub async fn run(config: &Config, options: &MapStatsOptions) -> anyhow::Result<()> {
    let period = report_period(options)?;
    info!("reporting map stats for \"{}\" ({period})", options.user);

    let provider = SiegeStatsProvider::new(config.ubisoft.clone());
    let records = fetch_records(&provider, &options.user, period)
        .await
        .with_context(|| format!("failed to get map stats for \"{}\"", options.user))?;

    println!("{} ({period})", options.user);
    print!("{}", records_table(&records));

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::season::{
        resolve,
        tokyo_today,
    };
    use time::{
        macros::date,
        Date,
        Duration,
    };

    const TODAY: Date = date!(2022 - 08 - 24);

    fn options(season: &str) -> MapStatsOptions {
        MapStatsOptions {
            user: "Beaulo.TSM".into(),
            season: season.into(),
            start: None,
            end: None,
        }
    }

    #[test]
    fn season_period_ends_yesterday() {
        let period = report_period(&options("VECTOR_GLARE")).expect("failed to get period");
        assert_eq!(period.start_string(), "20220614");
        assert_eq!(period.end, tokyo_today() - Duration::days(1));
    }

    #[test]
    fn unknown_season() {
        let error = season_period("OPERATION_HEALTH").expect_err("resolved a fake season");
        assert!(matches!(error, MapStatsError::UnknownSeason(_)));
        assert!(report_period(&options("OPERATION_HEALTH")).is_err());
    }

    #[test]
    fn dates_override_season() {
        let season = resolve("VECTOR_GLARE", TODAY).expect("failed to resolve");
        let period = with_bounds(season, Some("20220701"), None).expect("failed to get period");
        assert_eq!(period.to_string(), "20220701 - 20220823");

        let season = resolve("DEMON_VEIL", TODAY).expect("failed to resolve");
        let period = with_bounds(season, Some("20220401"), Some("20220430"))
            .expect("failed to get period");
        assert_eq!(period.to_string(), "20220401 - 20220430");
    }

    #[test]
    fn bad_bounds() {
        let season = resolve("VECTOR_GLARE", TODAY).expect("failed to resolve");
        assert!(with_bounds(season, Some("2022-07-01"), None).is_err());
        assert!(with_bounds(season, Some("20220901"), None).is_err());
    }

    #[test]
    fn table_rows() {
        let mut bank = MapStatRecord::new("BANK", 10, 6);
        bank.attack = Some(SideStats {
            rounds_played: 39,
            rounds_won: 18,
            win_percentage: 46.15384615384615,
        });
        let villa = MapStatRecord::new("VILLA", 4, 2);

        let table = records_table(&[bank, villa]).to_string();
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[1].contains("atk rounds"));
        assert!(lines[3].contains("BANK"));
        assert!(lines[3].contains("60.0"));
        assert!(lines[3].contains("46.2"));
        assert!(lines[4].contains("VILLA"));
        assert!(lines[4].contains("50.0"));
        assert_eq!(lines[4].matches(" - ").count(), 4);
    }
}
