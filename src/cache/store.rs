//! In-memory TTL cache over a forecast provider
//!
//! Memoizes [`ForecastBundle`]s keyed by rounded coordinates and horizon.
//! The clock is always an explicit `now` parameter so freshness logic is
//! deterministic under test, and the provider is injected through the
//! [`ForecastProvider`] trait so no test needs network access.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;

use crate::data::forecast::{ForecastError, ForecastProvider};
use crate::data::{ForecastBundle, TimePoint};

/// Cache TTL used by the CLI, matching the refresh interval of the
/// dashboard this pipeline feeds (15 minutes).
pub const DEFAULT_TTL_SECS: i64 = 900;

/// Coordinates are rounded to 4 decimal places (~11 m) before keying, so
/// floating-point jitter in repeated UI inputs cannot grow the key space.
const COORD_SCALE: f64 = 1e4;

/// Cache key: rounded coordinate pair plus forecast horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_e4: i64,
    lon_e4: i64,
    horizon_days: u8,
}

impl CacheKey {
    /// Build a key from raw coordinates and a horizon
    pub fn new(lat: f64, lon: f64, horizon_days: u8) -> Self {
        Self {
            lat_e4: (lat * COORD_SCALE).round() as i64,
            lon_e4: (lon * COORD_SCALE).round() as i64,
            horizon_days,
        }
    }
}

/// A stored bundle with its fetch timestamp
#[derive(Debug, Clone)]
struct CacheEntry {
    bundle: Arc<ForecastBundle>,
    fetched_at: TimePoint,
}

impl CacheEntry {
    /// Fresh iff strictly less than `ttl` has elapsed since the fetch
    fn is_fresh(&self, now: TimePoint, ttl: Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }
}

/// In-memory forecast cache with per-key single-flight
///
/// Entries live for the process lifetime; the key space is bounded by the
/// UI-selectable locations, so nothing is ever explicitly deleted. A
/// stale entry is only replaced by the next successful fetch for its key.
#[derive(Debug)]
pub struct ForecastCache<P> {
    provider: P,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    flights: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl<P: ForecastProvider> ForecastCache<P> {
    /// Create an empty cache over the given provider
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            entries: Mutex::new(HashMap::new()),
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached bundle for the key, fetching through the
    /// provider on a miss or an expired entry
    ///
    /// Concurrent misses on the same key collapse into one upstream fetch;
    /// misses on different keys proceed independently. When the fetch
    /// fails, the error propagates unchanged and any stale entry is left
    /// in place for [`Self::peek`].
    ///
    /// # Errors
    /// Whatever the provider surfaced: [`ForecastError::FetchFailed`] or
    /// [`ForecastError::MalformedResponse`].
    pub async fn get_or_fetch(
        &self,
        lat: f64,
        lon: f64,
        horizon_days: u8,
        ttl: Duration,
        now: TimePoint,
    ) -> Result<Arc<ForecastBundle>, ForecastError> {
        let key = CacheKey::new(lat, lon, horizon_days);

        if let Some(bundle) = self.lookup_fresh(&key, ttl, now).await {
            tracing::debug!(?key, "forecast cache hit");
            return Ok(bundle);
        }

        let flight = self.flight_lock(&key).await;
        let _guard = flight.lock().await;

        // Another caller may have landed this fetch while we waited
        if let Some(bundle) = self.lookup_fresh(&key, ttl, now).await {
            tracing::debug!(?key, "forecast cache hit after single-flight wait");
            return Ok(bundle);
        }

        tracing::debug!(?key, "forecast cache miss, fetching");
        let bundle = Arc::new(self.provider.fetch(lat, lon, horizon_days).await?);

        let mut entries = self.entries.lock().await;
        entries.insert(
            key,
            CacheEntry {
                bundle: Arc::clone(&bundle),
                fetched_at: now,
            },
        );

        Ok(bundle)
    }

    /// Last-known bundle for the key, regardless of freshness
    ///
    /// Lets the presentation layer fall back to stale data after a failed
    /// refresh instead of showing nothing.
    pub async fn peek(&self, lat: f64, lon: f64, horizon_days: u8) -> Option<Arc<ForecastBundle>> {
        let key = CacheKey::new(lat, lon, horizon_days);
        let entries = self.entries.lock().await;
        entries.get(&key).map(|entry| Arc::clone(&entry.bundle))
    }

    async fn lookup_fresh(
        &self,
        key: &CacheKey,
        ttl: Duration,
        now: TimePoint,
    ) -> Option<Arc<ForecastBundle>> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| Arc::clone(&entry.bundle))
    }

    async fn flight_lock(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut flights = self.flights.lock().await;
        Arc::clone(flights.entry(*key).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HourlyRecord;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider stub that counts calls, optionally sleeps, and fails from
    /// a configured call index onward
    struct StubProvider {
        calls: AtomicUsize,
        delay_ms: u64,
        fail_from: usize,
    }

    impl StubProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay_ms: 0,
                fail_from: usize::MAX,
            }
        }

        fn with_delay(delay_ms: u64) -> Self {
            Self {
                delay_ms,
                ..Self::new()
            }
        }

        fn failing_from(fail_from: usize) -> Self {
            Self {
                fail_from,
                ..Self::new()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ForecastProvider for StubProvider {
        async fn fetch(
            &self,
            _lat: f64,
            _lon: f64,
            _horizon_days: u8,
        ) -> Result<ForecastBundle, ForecastError> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            }
            if index >= self.fail_from {
                return Err(ForecastError::MalformedResponse("stub failure".to_string()));
            }
            Ok(bundle_with_marker(index as f64))
        }
    }

    /// Bundle whose first temperature identifies the fetch generation
    fn bundle_with_marker(marker: f64) -> ForecastBundle {
        ForecastBundle {
            hourly: vec![HourlyRecord {
                time: tp("2025-07-15T00:00:00+05:30"),
                temperature: marker,
                precipitation: 0.0,
                weather_code: 0,
                wind_speed: 5.0,
            }],
            daily: vec![],
            current: None,
        }
    }

    fn tp(s: &str) -> TimePoint {
        DateTime::parse_from_rfc3339(s).expect("valid test timestamp")
    }

    #[tokio::test]
    async fn test_fresh_hit_invokes_fetch_exactly_once() {
        let cache = ForecastCache::new(StubProvider::new());
        let ttl = Duration::seconds(900);
        let now = tp("2025-07-15T10:00:00+05:30");

        let first = cache.get_or_fetch(19.0760, 72.8777, 7, ttl, now).await.unwrap();
        let later = tp("2025-07-15T10:05:00+05:30");
        let second = cache.get_or_fetch(19.0760, 72.8777, 7, ttl, later).await.unwrap();

        assert_eq!(cache.provider.call_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let cache = ForecastCache::new(StubProvider::new());
        let ttl = Duration::seconds(900);

        let t0 = tp("2025-07-15T10:00:00+05:30");
        cache.get_or_fetch(19.0760, 72.8777, 7, ttl, t0).await.unwrap();

        // Within TTL: still one call
        let t1 = tp("2025-07-15T10:14:59+05:30");
        cache.get_or_fetch(19.0760, 72.8777, 7, ttl, t1).await.unwrap();
        assert_eq!(cache.provider.call_count(), 1);

        // At the TTL boundary the entry is no longer fresh
        let t2 = tp("2025-07-15T10:15:00+05:30");
        let refreshed = cache.get_or_fetch(19.0760, 72.8777, 7, ttl, t2).await.unwrap();
        assert_eq!(cache.provider.call_count(), 2);
        assert!((refreshed.hourly[0].temperature - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_coordinate_jitter_maps_to_same_key() {
        let cache = ForecastCache::new(StubProvider::new());
        let ttl = Duration::seconds(900);
        let now = tp("2025-07-15T10:00:00+05:30");

        // Differ only beyond the 4-decimal precision
        cache.get_or_fetch(19.07601, 72.8777, 7, ttl, now).await.unwrap();
        cache.get_or_fetch(19.07599, 72.8777, 7, ttl, now).await.unwrap();

        assert_eq!(cache.provider.call_count(), 1);
        assert_eq!(
            CacheKey::new(19.07601, 72.8777, 7),
            CacheKey::new(19.07599, 72.8777, 7)
        );
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_independently() {
        let cache = ForecastCache::new(StubProvider::new());
        let ttl = Duration::seconds(900);
        let now = tp("2025-07-15T10:00:00+05:30");

        cache.get_or_fetch(19.0760, 72.8777, 7, ttl, now).await.unwrap();
        cache.get_or_fetch(28.6139, 77.2090, 7, ttl, now).await.unwrap();
        // Same coordinates, different horizon is its own key too
        cache.get_or_fetch(19.0760, 72.8777, 3, ttl, now).await.unwrap();

        assert_eq!(cache.provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_refetch_propagates_and_preserves_stale_entry() {
        let cache = ForecastCache::new(StubProvider::failing_from(1));
        let ttl = Duration::seconds(900);

        let t0 = tp("2025-07-15T10:00:00+05:30");
        cache.get_or_fetch(19.0760, 72.8777, 7, ttl, t0).await.unwrap();

        // Expired; the refetch fails and the error reaches the caller
        let t1 = tp("2025-07-15T11:00:00+05:30");
        let result = cache.get_or_fetch(19.0760, 72.8777, 7, ttl, t1).await;
        assert!(matches!(result, Err(ForecastError::MalformedResponse(_))));

        // The stale bundle from the first fetch is still available
        let stale = cache.peek(19.0760, 72.8777, 7).await.expect("stale entry kept");
        assert!((stale.hourly[0].temperature - 0.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_concurrent_misses_on_same_key_collapse_to_one_fetch() {
        let cache = ForecastCache::new(StubProvider::with_delay(50));
        let ttl = Duration::seconds(900);
        let now = tp("2025-07-15T10:00:00+05:30");

        let (a, b) = futures::join!(
            cache.get_or_fetch(19.0760, 72.8777, 7, ttl, now),
            cache.get_or_fetch(19.0760, 72.8777, 7, ttl, now),
        );

        let a = a.unwrap();
        let b = b.unwrap();
        assert_eq!(cache.provider.call_count(), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_concurrent_misses_on_different_keys_both_fetch() {
        let cache = ForecastCache::new(StubProvider::with_delay(20));
        let ttl = Duration::seconds(900);
        let now = tp("2025-07-15T10:00:00+05:30");

        let (a, b) = futures::join!(
            cache.get_or_fetch(19.0760, 72.8777, 7, ttl, now),
            cache.get_or_fetch(28.6139, 77.2090, 7, ttl, now),
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(cache.provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_peek_returns_none_before_first_fetch() {
        let cache = ForecastCache::new(StubProvider::new());
        assert!(cache.peek(19.0760, 72.8777, 7).await.is_none());
    }
}
