use std::str::FromStr;
use time::{
    format_description::FormatItem,
    macros::{
        date,
        format_description,
        offset,
    },
    Date,
    Duration,
    OffsetDateTime,
    UtcOffset,
};

/// Season dates are calendar days in Asia/Tokyo, which has no DST.
pub const TOKYO_OFFSET: UtcOffset = offset!(+9);

/// `YYYYMMDD`, the date format the stats api uses.
pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year][month][day]");

/// A ranked season, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, poise::ChoiceParameter)]
pub enum Season {
    #[name = "VECTOR_GLARE"]
    VectorGlare,
    #[name = "DEMON_VEIL"]
    DemonVeil,
    #[name = "HIGH_CALIBRE"]
    HighCalibre,
    #[name = "CRYSTAL_GUARD"]
    CrystalGuard,
    #[name = "NORTH_STAR"]
    NorthStar,
    #[name = "CRIMSON_HEIST"]
    CrimsonHeist,
}

impl Season {
    /// All seasons, newest first
    pub const ALL: [Self; 6] = [
        Self::VectorGlare,
        Self::DemonVeil,
        Self::HighCalibre,
        Self::CrystalGuard,
        Self::NorthStar,
        Self::CrimsonHeist,
    ];

    /// The label of this season
    pub fn label(self) -> &'static str {
        match self {
            Self::VectorGlare => "VECTOR_GLARE",
            Self::DemonVeil => "DEMON_VEIL",
            Self::HighCalibre => "HIGH_CALIBRE",
            Self::CrystalGuard => "CRYSTAL_GUARD",
            Self::NorthStar => "NORTH_STAR",
            Self::CrimsonHeist => "CRIMSON_HEIST",
        }
    }

    /// The first day of this season
    pub fn start_date(self) -> Date {
        match self {
            Self::VectorGlare => date!(2022 - 06 - 14),
            Self::DemonVeil => date!(2022 - 03 - 15),
            Self::HighCalibre => date!(2021 - 11 - 30),
            Self::CrystalGuard => date!(2021 - 09 - 07),
            Self::NorthStar => date!(2021 - 06 - 15),
            Self::CrimsonHeist => date!(2021 - 03 - 16),
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The label did not name a known season
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown season \"{0}\"")]
pub struct UnknownSeasonError(pub String);

impl FromStr for Season {
    type Err = UnknownSeasonError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|season| season.label() == label)
            .ok_or_else(|| UnknownSeasonError(label.to_string()))
    }
}

/// An inclusive range of days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: Date,
    pub end: Date,
}

impl Period {
    /// The start as `YYYYMMDD`
    pub fn start_string(&self) -> String {
        format_date(self.start)
    }

    /// The end as `YYYYMMDD`
    pub fn end_string(&self) -> String {
        format_date(self.end)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start_string(), self.end_string())
    }
}

/// Parse a `YYYYMMDD` date
pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, DATE_FORMAT)
}

/// Format a date as `YYYYMMDD`
pub fn format_date(date: Date) -> String {
    // DATE_FORMAT only has date components, which every `Date` has.
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// The season table, resolved against a given "yesterday".
#[derive(Debug, Clone)]
pub struct SeasonTable {
    periods: Vec<(Season, Period)>,
}

impl SeasonTable {
    /// Build the table.
    ///
    /// The newest season ends on `yesterday`,
    /// every other season ends the day before the next newer one starts.
    pub fn new(yesterday: Date) -> Self {
        let (periods, _) = Season::ALL.into_iter().fold(
            (Vec::with_capacity(Season::ALL.len()), yesterday),
            |(mut periods, end), season| {
                let start = season.start_date();
                periods.push((season, Period { start, end }));

                let next_end = start.previous_day().unwrap_or(start);
                (periods, next_end)
            },
        );

        Self { periods }
    }

    /// Get the period of a season
    pub fn period(&self, season: Season) -> Period {
        // `periods` follows the order of `Season::ALL`, which is the declaration order.
        self.periods[season as usize].1
    }

    /// Iterate over every season and its period, newest first
    pub fn iter(&self) -> impl Iterator<Item = (Season, Period)> + '_ {
        self.periods.iter().copied()
    }
}

/// Get today's date in Tokyo
pub fn tokyo_today() -> Date {
    OffsetDateTime::now_utc().to_offset(TOKYO_OFFSET).date()
}

/// Resolve a season label to its period as of `today`.
pub fn resolve(label: &str, today: Date) -> Result<Period, UnknownSeasonError> {
    let season: Season = label.parse()?;
    Ok(resolve_season(season, today))
}

/// Resolve a season to its period as of `today`.
pub fn resolve_season(season: Season, today: Date) -> Period {
    let yesterday = today - Duration::days(1);
    SeasonTable::new(yesterday).period(season)
}

/// Resolve a season label to its period as of now.
pub fn resolve_now(label: &str) -> Result<Period, UnknownSeasonError> {
    resolve(label, tokyo_today())
}
