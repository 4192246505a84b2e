use crate::PlatformType;
use std::collections::HashMap;

/// Query parameters for a map stats request.
///
/// Dates are `YYYYMMDD` and both ends are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStatsQuery {
    pub start_date: String,
    pub end_date: String,
    pub platform: PlatformType,
}

impl MapStatsQuery {
    /// Make a new pc query for the given range
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            platform: PlatformType::Uplay,
        }
    }

    /// The platform group to query
    pub fn platform_group(&self) -> &'static str {
        self.platform.platform_group()
    }
}

/// A team role stats are split by
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TeamRole {
    All,
    Attacker,
    Defender,
}

impl TeamRole {
    /// The name the api uses for this role
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Attacker => "attacker",
            Self::Defender => "defender",
        }
    }
}

/// The response of a `playerstats` request.
///
/// Keyed by profile id, then platform group, then game mode.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsResponse {
    #[serde(default)]
    pub profile_data: HashMap<String, ProfileData>,

    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

impl PlayerStatsResponse {
    /// Get the ranked stats of a profile on a platform group.
    pub fn ranked(&self, profile_id: &str, platform_group: &str) -> Option<&TeamRoles> {
        self.profile_data
            .get(profile_id)?
            .platforms
            .get(platform_group)?
            .game_modes
            .get("ranked")
            .map(|game_mode| &game_mode.team_roles)
    }
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct ProfileData {
    #[serde(default)]
    pub platforms: HashMap<String, PlatformData>,

    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformData {
    #[serde(default)]
    pub game_modes: HashMap<String, GameModeData>,

    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameModeData {
    pub team_roles: TeamRoles,

    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

/// Map stats split by team role
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct TeamRoles {
    #[serde(default)]
    pub all: Vec<MapStat>,
    #[serde(default)]
    pub attacker: Vec<MapStat>,
    #[serde(default)]
    pub defender: Vec<MapStat>,

    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}

impl TeamRoles {
    /// Get the map stats for a role
    pub fn get(&self, role: TeamRole) -> &[MapStat] {
        match role {
            TeamRole::All => &self.all,
            TeamRole::Attacker => &self.attacker,
            TeamRole::Defender => &self.defender,
        }
    }
}

/// Stats for one map
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStat {
    /// The map name
    #[serde(rename = "statsDetail")]
    pub map_name: String,

    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub matches_won: u32,
    #[serde(default)]
    pub matches_lost: u32,

    #[serde(default)]
    pub rounds_played: u32,
    #[serde(default)]
    pub rounds_won: u32,
    #[serde(default)]
    pub rounds_lost: u32,

    #[serde(flatten)]
    pub unknown: HashMap<String, serde_json::Value>,
}
