mod client;
pub mod types;

pub use crate::{
    client::Client,
    types::{
        MapStat,
        MapStatsQuery,
        PlatformType,
        PlayerStatsResponse,
        Profile,
        Session,
        TeamRole,
    },
};
pub use reqwest::StatusCode;

/// Result type
pub type SiegeResult<T> = Result<T, Error>;

/// Error Type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reqwest HTTP error
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid HTTP Status
    #[error("invalid http status {0}")]
    InvalidStatus(reqwest::StatusCode),

    /// Json Error
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Url Parse Error
    #[error("{0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Whether the server refused the supplied credentials or ticket
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatus(
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN
            )
        )
    }
}
