use crate::domain::forecast::ForecastSnapshot;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: ForecastSnapshot,
    stored_at: DateTime<Utc>,
}

/// Per-beach snapshot cache with a fixed TTL. Expired entries are not
/// dropped on read: they stay around so a failed refresh can still fall
/// back to the last known forecast.
#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ForecastCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the snapshot and its age in seconds when the entry is
    /// still within the TTL.
    pub fn get(&self, beach_id: &str, now: DateTime<Utc>) -> Option<(ForecastSnapshot, i64)> {
        let entries = self.lock();
        let entry = entries.get(beach_id)?;
        let age = now - entry.stored_at;
        if age > self.ttl {
            return None;
        }
        Some((entry.snapshot.clone(), age.num_seconds()))
    }

    /// Returns the snapshot regardless of age. Refresh-failure fallback.
    pub fn get_stale(&self, beach_id: &str, now: DateTime<Utc>) -> Option<(ForecastSnapshot, i64)> {
        let entries = self.lock();
        let entry = entries.get(beach_id)?;
        Some((entry.snapshot.clone(), (now - entry.stored_at).num_seconds()))
    }

    pub fn set(&self, snapshot: ForecastSnapshot, now: DateTime<Utc>) {
        let mut entries = self.lock();
        entries.insert(
            snapshot.beach_id.clone(),
            CacheEntry {
                snapshot,
                stored_at: now,
            },
        );
    }

    pub fn evict(&self, beach_id: &str) -> bool {
        self.lock().remove(beach_id).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic while holding the lock leaves plain data behind, so a
        // poisoned cache is still usable.
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::ForecastConditions;
    use crate::suitability::SuitabilityVector;
    use chrono::TimeZone;

    fn snapshot(beach_id: &str, fetched_at: DateTime<Utc>) -> ForecastSnapshot {
        ForecastSnapshot {
            beach_id: beach_id.to_string(),
            fetched_at,
            conditions: ForecastConditions {
                wave_height_ft: 2.0,
                wave_period_sec: 10.0,
                wave_direction: "W".to_string(),
                swell_height_ft: None,
                swell_period_sec: None,
                swell_direction: None,
                wind_speed_knots: 5.0,
                wind_gusts_knots: None,
                wind_direction: "N".to_string(),
                air_temp_f: 75,
                water_temp_f: 78,
                weather_code: Some(0),
                weather_description: Some("Clear sky".to_string()),
                tide_height_ft: 0.0,
                confidence: 85,
            },
            suitability: SuitabilityVector::rate(2.0, 5.0),
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 7, 8, minute, 0).unwrap()
    }

    #[test]
    fn fresh_entries_hit_with_their_age() {
        let cache = ForecastCache::new(Duration::minutes(15));
        cache.set(snapshot("beach_hadera", at(0)), at(0));

        let (hit, age_secs) = cache.get("beach_hadera", at(5)).unwrap();
        assert_eq!(hit.beach_id, "beach_hadera");
        assert_eq!(age_secs, 300);
        assert!(cache.get("beach_eilat", at(5)).is_none());
    }

    #[test]
    fn entries_expire_after_the_ttl_but_stay_for_stale_reads() {
        let cache = ForecastCache::new(Duration::minutes(15));
        cache.set(snapshot("beach_hadera", at(0)), at(0));

        // Exactly at the TTL is still fresh; past it is not.
        assert!(cache.get("beach_hadera", at(15)).is_some());
        assert!(cache.get("beach_hadera", at(16)).is_none());

        let (stale, age_secs) = cache.get_stale("beach_hadera", at(16)).unwrap();
        assert_eq!(stale.beach_id, "beach_hadera");
        assert_eq!(age_secs, 960);
    }

    #[test]
    fn set_replaces_the_previous_entry() {
        let cache = ForecastCache::new(Duration::minutes(15));
        cache.set(snapshot("beach_hadera", at(0)), at(0));
        cache.set(snapshot("beach_hadera", at(10)), at(10));

        let (hit, age_secs) = cache.get("beach_hadera", at(12)).unwrap();
        assert_eq!(hit.fetched_at, at(10));
        assert_eq!(age_secs, 120);
    }

    #[test]
    fn evict_removes_the_entry() {
        let cache = ForecastCache::new(Duration::minutes(15));
        cache.set(snapshot("beach_hadera", at(0)), at(0));
        assert!(cache.evict("beach_hadera"));
        assert!(!cache.evict("beach_hadera"));
        assert!(cache.get_stale("beach_hadera", at(1)).is_none());
    }
}
