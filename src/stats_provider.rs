use crate::{
    config::UbisoftConfig,
    map_stats::MapStatsError,
    season::Period,
};
use async_trait::async_trait;
use tracing::info;

/// Raw per-map numbers as the provider reports them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRow {
    pub map_name: String,
    pub matches_played: u32,
    pub matches_won: u32,
    pub rounds_played: u32,
    pub rounds_won: u32,
}

impl From<&siege::MapStat> for MapRow {
    fn from(stat: &siege::MapStat) -> Self {
        Self {
            map_name: stat.map_name.clone(),
            matches_played: stat.matches_played,
            matches_won: stat.matches_won,
            rounds_played: stat.rounds_played,
            rounds_won: stat.rounds_won,
        }
    }
}

/// Ranked map rows for a period, split by side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedMapStats {
    /// Whole matches, regardless of side
    pub all: Vec<MapRow>,
    /// Rounds played on attack
    pub attacker: Vec<MapRow>,
    /// Rounds played on defense
    pub defender: Vec<MapRow>,
}

/// Something that can open authenticated stats sessions
#[async_trait]
pub trait StatsProvider: Send + Sync {
    type Session: StatsSession;

    /// Log in.
    async fn authenticate(&self) -> Result<Self::Session, MapStatsError>;
}

/// An authenticated session with a stats provider.
///
/// A session must be closed once it is no longer needed.
#[async_trait]
pub trait StatsSession: Send + Sync + Sized {
    /// The provider's id for a player
    type PlayerId: Send + Sync;

    /// Find a player by name
    async fn find_player(&self, name: &str) -> Result<Self::PlayerId, MapStatsError>;

    /// Get the ranked map stats of a player within a period
    async fn ranked_map_stats(
        &self,
        player: &Self::PlayerId,
        period: &Period,
    ) -> Result<RankedMapStats, MapStatsError>;

    /// Log out
    async fn close(self) -> Result<(), MapStatsError>;
}

/// Rejected credentials or tickets are auth errors, everything else failed to fetch.
fn provider_error(error: siege::Error) -> MapStatsError {
    if error.is_unauthorized() {
        MapStatsError::Auth(error.into())
    } else {
        MapStatsError::Fetch(error.into())
    }
}

/// Stats from the ubisoft api
#[derive(Debug, Clone)]
pub struct SiegeStatsProvider {
    client: siege::Client,
    credentials: Option<UbisoftConfig>,
}

impl SiegeStatsProvider {
    /// Make a new provider.
    ///
    /// Without credentials every attempt to authenticate fails.
    pub fn new(credentials: Option<UbisoftConfig>) -> Self {
        Self {
            client: siege::Client::new(),
            credentials,
        }
    }
}

#[async_trait]
impl StatsProvider for SiegeStatsProvider {
    type Session = SiegeSession;

    async fn authenticate(&self) -> Result<Self::Session, MapStatsError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| MapStatsError::Auth("set the EMAIL and PASSWORD variables".into()))?;

        let session = self
            .client
            .create_session(&credentials.email, &credentials.password)
            .await
            .map_err(provider_error)?;

        info!("opened ubisoft session \"{}\"", session.session_id);

        Ok(SiegeSession {
            client: self.client.clone(),
            session,
        })
    }
}

/// A logged-in ubisoft session
#[derive(Debug)]
pub struct SiegeSession {
    client: siege::Client,
    session: siege::Session,
}

#[async_trait]
impl StatsSession for SiegeSession {
    type PlayerId = siege::Profile;

    async fn find_player(&self, name: &str) -> Result<Self::PlayerId, MapStatsError> {
        let mut profiles = self
            .client
            .search_profiles(&self.session, name, siege::PlatformType::Uplay)
            .await
            .map_err(provider_error)?;

        if profiles.is_empty() {
            return Err(MapStatsError::PlayerNotFound(name.to_string()));
        }

        Ok(profiles.swap_remove(0))
    }

    async fn ranked_map_stats(
        &self,
        player: &Self::PlayerId,
        period: &Period,
    ) -> Result<RankedMapStats, MapStatsError> {
        let query = siege::MapStatsQuery::new(period.start_string(), period.end_string());
        let response = self
            .client
            .get_map_stats(&self.session, &player.profile_id, &query)
            .await
            .map_err(provider_error)?;

        // A player without ranked games in the period has no ranked entry at all.
        let roles = match response.ranked(&player.profile_id, query.platform_group()) {
            Some(roles) => roles,
            None => return Ok(RankedMapStats::default()),
        };

        let rows = |role| {
            roles
                .get(role)
                .iter()
                .map(MapRow::from)
                .collect::<Vec<_>>()
        };

        Ok(RankedMapStats {
            all: rows(siege::TeamRole::All),
            attacker: rows(siege::TeamRole::Attacker),
            defender: rows(siege::TeamRole::Defender),
        })
    }

    async fn close(self) -> Result<(), MapStatsError> {
        let session_id = self.session.session_id.clone();
        self.client
            .close_session(self.session)
            .await
            .map_err(|error| MapStatsError::Fetch(error.into()))?;

        info!("closed ubisoft session \"{session_id}\"");

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_rejections_are_auth_errors() {
        let error = provider_error(siege::Error::InvalidStatus(siege::StatusCode::UNAUTHORIZED));
        assert!(matches!(error, MapStatsError::Auth(_)));

        let error = provider_error(siege::Error::InvalidStatus(siege::StatusCode::FORBIDDEN));
        assert!(matches!(error, MapStatsError::Auth(_)));

        let error = provider_error(siege::Error::InvalidStatus(
            siege::StatusCode::SERVICE_UNAVAILABLE,
        ));
        assert!(matches!(error, MapStatsError::Fetch(_)));
    }

    #[tokio::test]
    async fn missing_credentials() {
        let provider = SiegeStatsProvider::new(None);
        let error = provider
            .authenticate()
            .await
            .expect_err("authenticated without credentials");
        assert!(matches!(error, MapStatsError::Auth(_)));
    }
}
