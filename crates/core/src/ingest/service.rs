use crate::domain::beach::Beach;
use crate::domain::forecast::ForecastSnapshot;
use crate::ingest::cache::ForecastCache;
use crate::ingest::normalize::normalize_forecast;
use crate::ingest::provider::ForecastProvider;
use crate::ingest::types::ProviderReadings;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_CACHE_TTL_MINUTES: i64 = 15;
const DEFAULT_FETCH_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct ForecastServiceOptions {
    /// Providers update roughly hourly; a quarter hour keeps snapshots
    /// current without hammering them.
    pub cache_ttl: Duration,
    /// Total fetch attempts per refresh, not extra retries.
    pub fetch_retries: u32,
}

impl Default for ForecastServiceOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::minutes(DEFAULT_CACHE_TTL_MINUTES),
            fetch_retries: DEFAULT_FETCH_RETRIES,
        }
    }
}

impl ForecastServiceOptions {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("FORECAST_CACHE_TTL_MINUTES") {
            if let Ok(n) = s.parse::<i64>() {
                out.cache_ttl = Duration::minutes(n);
            }
        }

        if let Ok(s) = std::env::var("FORECAST_FETCH_RETRIES") {
            if let Ok(n) = s.parse::<u32>() {
                out.fetch_retries = n;
            }
        }

        out
    }
}

/// How current the returned snapshot is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Freshness {
    /// Fetched from the provider on this call.
    Fresh,
    /// Served from cache inside the TTL.
    Cached { age_secs: i64 },
    /// Provider refresh failed; this is the last known snapshot.
    Stale { age_secs: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedForecast {
    pub snapshot: ForecastSnapshot,
    pub freshness: Freshness,
}

/// Cache-fronted forecast access. Fresh cache entries are served as-is;
/// misses go to the provider with retry, and when the provider is down
/// an expired entry still beats no forecast at all.
pub struct ForecastService<P> {
    provider: P,
    cache: ForecastCache,
    fetch_retries: u32,
}

impl<P: ForecastProvider> ForecastService<P> {
    pub fn new(provider: P, options: ForecastServiceOptions) -> Self {
        Self {
            provider,
            cache: ForecastCache::new(options.cache_ttl),
            fetch_retries: options.fetch_retries.max(1),
        }
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    pub async fn current(&self, beach: &Beach, now: DateTime<Utc>) -> Result<FetchedForecast> {
        if let Some((snapshot, age_secs)) = self.cache.get(&beach.id, now) {
            return Ok(FetchedForecast {
                snapshot,
                freshness: Freshness::Cached { age_secs },
            });
        }

        match self.refresh(beach, now).await {
            Ok(snapshot) => {
                self.cache.set(snapshot.clone(), now);
                Ok(FetchedForecast {
                    snapshot,
                    freshness: Freshness::Fresh,
                })
            }
            Err(err) => {
                if let Some((snapshot, age_secs)) = self.cache.get_stale(&beach.id, now) {
                    tracing::warn!(
                        beach_id = %beach.id,
                        age_secs,
                        error = %err,
                        "forecast refresh failed; serving stale snapshot"
                    );
                    return Ok(FetchedForecast {
                        snapshot,
                        freshness: Freshness::Stale { age_secs },
                    });
                }
                Err(err)
            }
        }
    }

    async fn refresh(&self, beach: &Beach, now: DateTime<Utc>) -> Result<ForecastSnapshot> {
        let readings = self.fetch_with_retries(beach).await?;
        normalize_forecast(&beach.id, &readings, now)
    }

    async fn fetch_with_retries(&self, beach: &Beach) -> Result<ProviderReadings> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.provider.fetch_current(beach).await {
                Ok(readings) => return Ok(readings),
                Err(err) => {
                    if attempt >= self.fetch_retries {
                        return Err(err);
                    }
                    let backoff = std::time::Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(
                        provider = self.provider.provider_name(),
                        beach_id = %beach.id,
                        attempt,
                        ?backoff,
                        error = %err,
                        "forecast fetch failed; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::beach::BeachCatalog;
    use crate::ingest::types::{ProviderReadings, RawMarineReading};
    use anyhow::bail;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back a queue of canned outcomes, one per fetch.
    struct ScriptedProvider {
        script: Mutex<VecDeque<Result<ProviderReadings>>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<ProviderReadings>>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
            }
        }

        fn remaining(&self) -> usize {
            self.script.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl ForecastProvider for ScriptedProvider {
        fn provider_name(&self) -> &'static str {
            "scripted"
        }

        async fn fetch_current(&self, _beach: &Beach) -> Result<ProviderReadings> {
            match self.script.lock().unwrap().pop_front() {
                Some(outcome) => outcome,
                None => bail!("script exhausted"),
            }
        }
    }

    fn readings(wave_height: f64) -> ProviderReadings {
        ProviderReadings {
            marine: RawMarineReading {
                wave_height,
                wave_period: Some(9.0),
                wave_direction: Some(280.0),
                swell_wave_height: None,
                swell_wave_period: None,
                swell_wave_direction: None,
            },
            weather: None,
        }
    }

    fn hadera() -> Beach {
        BeachCatalog::builtin().get("beach_hadera").unwrap().clone()
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 7, 8, minute, 0).unwrap()
    }

    fn service(script: Vec<Result<ProviderReadings>>) -> ForecastService<ScriptedProvider> {
        ForecastService::new(ScriptedProvider::new(script), ForecastServiceOptions::default())
    }

    #[tokio::test]
    async fn first_call_fetches_and_second_hits_the_cache() {
        let service = service(vec![Ok(readings(0.6))]);
        let beach = hadera();

        let first = service.current(&beach, at(0)).await.unwrap();
        assert_eq!(first.freshness, Freshness::Fresh);
        assert_eq!(first.snapshot.conditions.wave_height_ft, 2.0);

        let second = service.current(&beach, at(5)).await.unwrap();
        assert_eq!(second.freshness, Freshness::Cached { age_secs: 300 });
        assert_eq!(second.snapshot, first.snapshot);
    }

    #[tokio::test]
    async fn expired_cache_triggers_a_refetch() {
        let service = service(vec![Ok(readings(0.6)), Ok(readings(1.2))]);
        let beach = hadera();

        service.current(&beach, at(0)).await.unwrap();
        let refreshed = service.current(&beach, at(20)).await.unwrap();
        assert_eq!(refreshed.freshness, Freshness::Fresh);
        assert_eq!(refreshed.snapshot.conditions.wave_height_ft, 3.9);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_with_backoff() {
        let service = service(vec![
            Err(anyhow::anyhow!("timeout")),
            Err(anyhow::anyhow!("timeout")),
            Ok(readings(0.6)),
        ]);
        let beach = hadera();

        let fetched = service.current(&beach, at(0)).await.unwrap();
        assert_eq!(fetched.freshness, Freshness::Fresh);
        assert_eq!(service.provider.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn provider_outage_serves_the_stale_snapshot() {
        let service = service(vec![
            Ok(readings(0.6)),
            Err(anyhow::anyhow!("down")),
            Err(anyhow::anyhow!("down")),
            Err(anyhow::anyhow!("down")),
        ]);
        let beach = hadera();

        service.current(&beach, at(0)).await.unwrap();

        // Past the TTL, every retry fails, so the old snapshot comes
        // back marked stale with its true age.
        let fallback = service.current(&beach, at(20)).await.unwrap();
        assert_eq!(fallback.freshness, Freshness::Stale { age_secs: 1200 });
        assert_eq!(fallback.snapshot.conditions.wave_height_ft, 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn cold_outage_is_an_error() {
        let service = service(vec![
            Err(anyhow::anyhow!("down")),
            Err(anyhow::anyhow!("down")),
            Err(anyhow::anyhow!("down")),
        ]);
        let beach = hadera();

        let err = service.current(&beach, at(0)).await.unwrap_err();
        assert_eq!(err.to_string(), "down");
    }

    #[tokio::test]
    async fn bad_readings_fail_normalization_not_the_cache() {
        let service = service(vec![Ok(readings(-1.0))]);
        let beach = hadera();

        assert!(service.current(&beach, at(0)).await.is_err());
        assert!(service.cache().get_stale(&beach.id, at(0)).is_none());
    }

    #[test]
    fn default_options_are_fifteen_minutes_and_three_attempts() {
        let defaults = ForecastServiceOptions::default();
        assert_eq!(defaults.cache_ttl, Duration::minutes(15));
        assert_eq!(defaults.fetch_retries, 3);
    }
}
