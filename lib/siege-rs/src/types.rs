pub mod platform;
pub mod player_stats;
pub mod profile;
pub mod session;

pub use self::{
    platform::PlatformType,
    player_stats::{
        MapStat,
        MapStatsQuery,
        PlayerStatsResponse,
        TeamRole,
        TeamRoles,
    },
    profile::{
        Profile,
        ProfileList,
    },
    session::Session,
};
