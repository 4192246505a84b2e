mod renderer;

pub use self::renderer::{
    Chart,
    Renderer,
};
use crate::{
    season::{
        Period,
        UnknownSeasonError,
    },
    stats_provider::{
        MapRow,
        RankedMapStats,
        StatsProvider,
        StatsSession,
    },
};
use camino::{
    Utf8Path,
    Utf8PathBuf,
};
use std::{
    cmp::Ordering,
    collections::HashMap,
};
use tracing::{
    info,
    warn,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong while producing a map stats chart
#[derive(Debug, thiserror::Error)]
pub enum MapStatsError {
    /// The season label was not recognized
    #[error(transparent)]
    UnknownSeason(#[from] UnknownSeasonError),

    /// Credentials were missing or rejected
    #[error("failed to authenticate: {0}")]
    Auth(#[source] BoxError),

    /// Nobody by that name exists
    #[error("player \"{0}\" not found")]
    PlayerNotFound(String),

    /// The provider could not be reached or sent garbage
    #[error("failed to fetch stats: {0}")]
    Fetch(#[source] BoxError),

    /// No ranked matches in the period
    #[error("no ranked matches between {} and {}", .0.start_string(), .0.end_string())]
    EmptyStats(Period),

    /// The chart could not be drawn
    #[error("failed to render chart: {0:#}")]
    Render(#[source] anyhow::Error),

    /// The chart could not be saved
    #[error("failed to save chart: {0}")]
    Io(#[from] std::io::Error),
}

/// Compute a win rate in percent.
///
/// Nothing played is a win rate of 0.
pub fn win_percentage(won: u32, played: u32) -> f64 {
    if played == 0 {
        return 0.0;
    }

    f64::from(won) / f64::from(played) * 100.0
}

/// Which side of 50% a win rate falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinRateBand {
    /// More than 50%
    Winning,
    /// Exactly 50%
    Even,
    /// Less than 50%
    Losing,
}

impl WinRateBand {
    /// Classify a record.
    ///
    /// This compares integers so that 50% is exact.
    pub fn new(won: u32, played: u32) -> Self {
        match (u64::from(won) * 2).cmp(&u64::from(played)) {
            Ordering::Greater => Self::Winning,
            Ordering::Equal => Self::Even,
            Ordering::Less => Self::Losing,
        }
    }
}

/// Round stats for one side of one map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideStats {
    pub rounds_played: u32,
    pub rounds_won: u32,
    pub win_percentage: f64,
}

impl From<&MapRow> for SideStats {
    fn from(row: &MapRow) -> Self {
        Self {
            rounds_played: row.rounds_played,
            rounds_won: row.rounds_won,
            win_percentage: win_percentage(row.rounds_won, row.rounds_played),
        }
    }
}

/// Aggregated stats for one map
#[derive(Debug, Clone, PartialEq)]
pub struct MapStatRecord {
    pub map_name: String,
    pub matches_played: u32,
    pub matches_won: u32,
    pub win_percentage: f64,

    /// `None` if the provider sent no attacker rows for this map
    pub attack: Option<SideStats>,
    /// `None` if the provider sent no defender rows for this map
    pub defense: Option<SideStats>,
}

impl MapStatRecord {
    /// Make a record from an overall row, without side stats
    pub fn new(map_name: impl Into<String>, matches_played: u32, matches_won: u32) -> Self {
        Self {
            map_name: map_name.into(),
            matches_played,
            matches_won,
            win_percentage: win_percentage(matches_won, matches_played),
            attack: None,
            defense: None,
        }
    }

    /// The band of the win rate
    pub fn band(&self) -> WinRateBand {
        WinRateBand::new(self.matches_won, self.matches_played)
    }
}

/// Order records by win rate, then by matches played, both descending.
///
/// Ties on both fall back to the map name so the order is total.
pub fn compare_records(a: &MapStatRecord, b: &MapStatRecord) -> Ordering {
    b.win_percentage
        .total_cmp(&a.win_percentage)
        .then_with(|| b.matches_played.cmp(&a.matches_played))
        .then_with(|| a.map_name.cmp(&b.map_name))
}

/// Turn provider rows into sorted records.
///
/// Maps with no matches played are dropped.
/// Side stats are joined on the exact map name;
/// a map without side rows keeps its overall record.
pub fn aggregate(stats: &RankedMapStats) -> Vec<MapStatRecord> {
    let attacker: HashMap<&str, &MapRow> = stats
        .attacker
        .iter()
        .map(|row| (row.map_name.as_str(), row))
        .collect();
    let defender: HashMap<&str, &MapRow> = stats
        .defender
        .iter()
        .map(|row| (row.map_name.as_str(), row))
        .collect();

    let mut records: Vec<_> = stats
        .all
        .iter()
        .filter(|row| row.matches_played > 0)
        .map(|row| {
            let mut record =
                MapStatRecord::new(row.map_name.as_str(), row.matches_played, row.matches_won);
            record.attack = attacker
                .get(row.map_name.as_str())
                .map(|row| SideStats::from(*row));
            record.defense = defender
                .get(row.map_name.as_str())
                .map(|row| SideStats::from(*row));
            record
        })
        .collect();

    records.sort_by(compare_records);

    records
}

/// A chart written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    /// Where the chart was written
    pub path: Utf8PathBuf,

    /// The size of the png in bytes
    pub size: usize,
}

/// Fetch and aggregate the ranked map stats of a player.
///
/// The session is closed on every path once it was opened.
#[tracing::instrument(skip(provider))]
pub async fn fetch_records<P>(
    provider: &P,
    player: &str,
    period: Period,
) -> Result<Vec<MapStatRecord>, MapStatsError>
where
    P: StatsProvider,
{
    let session = provider.authenticate().await?;

    let result = async {
        let player_id = session.find_player(player).await?;
        session.ranked_map_stats(&player_id, &period).await
    }
    .await;

    if let Err(error) = session.close().await {
        warn!("failed to close stats session: {error}");
    }

    let records = aggregate(&result?);
    if records.is_empty() {
        return Err(MapStatsError::EmptyStats(period));
    }

    info!("aggregated {} maps", records.len());

    Ok(records)
}

/// Fetch the ranked map stats of a player and render them to `path`.
///
/// Any previous file at `path` is overwritten.
/// Concurrent calls with the same `path` race on that file.
pub async fn aggregate_and_render<P>(
    provider: &P,
    renderer: &Renderer,
    player: &str,
    period: Period,
    path: &Utf8Path,
) -> Result<ChartArtifact, MapStatsError>
where
    P: StatsProvider,
{
    let records = fetch_records(provider, player, period).await?;

    let chart = Chart {
        title: format!(
            "{player} ({} - {})",
            period.start_string(),
            period.end_string()
        ),
        records,
    };
    let png = renderer
        .render_async(chart)
        .await
        .map_err(MapStatsError::Render)?;

    tokio::fs::write(path, &png).await?;
    info!("saved chart to \"{path}\"");

    Ok(ChartArtifact {
        path: path.to_path_buf(),
        size: png.len(),
    })
}
