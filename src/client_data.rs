use crate::{
    config::Config,
    map_stats::Renderer,
    stats_provider::SiegeStatsProvider,
};
use anyhow::Context;
use std::sync::Arc;

/// The data shared by every command
#[derive(Debug)]
pub struct ClientData {
    /// The config
    pub config: Arc<Config>,

    /// Ranked stats from ubisoft
    pub stats_provider: SiegeStatsProvider,

    /// The map stats chart renderer
    pub renderer: Renderer,
}

impl ClientData {
    /// Init the client data
    pub fn init(config: Arc<Config>) -> anyhow::Result<Self> {
        let stats_provider = SiegeStatsProvider::new(config.ubisoft.clone());
        let renderer = Renderer::new().context("failed to create map stats renderer")?;

        Ok(Self {
            config,
            stats_provider,
            renderer,
        })
    }
}
