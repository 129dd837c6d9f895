use crate::domain::beach::Beach;
use crate::ingest::types::ProviderReadings;
use anyhow::{bail, Result};
use std::collections::HashMap;

#[async_trait::async_trait]
pub trait ForecastProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_current(&self, beach: &Beach) -> Result<ProviderReadings>;
}

/// Serves pre-loaded readings keyed by beach id. Backs the CLI fixture
/// path and tests; a live marine API client plugs in through the same
/// trait.
#[derive(Debug, Clone, Default)]
pub struct StaticForecastProvider {
    readings: HashMap<String, ProviderReadings>,
}

impl StaticForecastProvider {
    pub fn new(readings: HashMap<String, ProviderReadings>) -> Self {
        Self { readings }
    }

    pub fn insert(&mut self, beach_id: impl Into<String>, readings: ProviderReadings) {
        self.readings.insert(beach_id.into(), readings);
    }
}

#[async_trait::async_trait]
impl ForecastProvider for StaticForecastProvider {
    fn provider_name(&self) -> &'static str {
        "static_fixture"
    }

    async fn fetch_current(&self, beach: &Beach) -> Result<ProviderReadings> {
        match self.readings.get(&beach.id) {
            Some(readings) => Ok(readings.clone()),
            None => bail!("no readings loaded for beach {}", beach.id),
        }
    }
}
