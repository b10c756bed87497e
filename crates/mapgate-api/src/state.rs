use std::sync::Arc;

use mapgate_shared::config::AppConfig;

use crate::upstream::{MapsUpstream, UpstreamError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<MapsUpstream>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, UpstreamError> {
        let upstream = Arc::new(MapsUpstream::new(&config.upstream)?);
        Ok(Self { upstream, config })
    }
}
