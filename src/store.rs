//! Key-value persistence for cached forecasts and advice
//!
//! Features depend on [`KeyValueStore`] rather than a concrete backend.
//! [`MemoryStore`] keeps entries in a bounded moka cache with per-entry TTL.

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;

    /// Store `value`; `ttl = None` keeps it until evicted.
    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>);

    async fn remove(&self, key: &str);
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Clone)]
struct StoredValue {
    value: Arc<Value>,
    ttl: Option<Duration>,
}

/// Each entry lives for the TTL it was written with.
struct PerEntryExpiry;

impl Expiry<String, StoredValue> for PerEntryExpiry {
    fn expire_after_create(&self, _key: &String, value: &StoredValue, _created_at: Instant) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    cache: Cache<String, StoredValue>,
}

impl MemoryStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<Value> {
        self.cache.get(key).await.map(|stored| (*stored.value).clone())
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        self.cache
            .insert(
                key.to_string(),
                StoredValue {
                    value: Arc::new(value),
                    ttl,
                },
            )
            .await;
    }

    async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

// ============================================================================
// Forecast cache
// ============================================================================

const FORECAST_PREFIX: &str = "weather:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub temp_celsius: f64,
    pub humidity_percent: f64,
    pub wind_speed_kmh: f64,
    pub description: String,
    pub icon: Option<String>,
    pub city: String,
    pub country: Option<String>,
    /// epoch ms
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String,
    pub min: f64,
    pub max: f64,
    pub icon: Option<String>,
    pub description: String,
    pub rain_likely: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedForecast {
    /// `lat,lon` rounded to three decimals, see [`ForecastCache::build_key`]
    pub key: String,
    #[serde(default)]
    pub location_label: Option<String>,
    #[serde(default)]
    pub current: Option<CurrentWeather>,
    #[serde(default)]
    pub forecast: Option<Vec<DailyForecast>>,
    /// epoch ms, overwritten on save
    #[serde(default)]
    pub saved_at: i64,
}

/// Last known forecast per location, kept in a [`KeyValueStore`].
#[derive(Clone)]
pub struct ForecastCache {
    store: Arc<dyn KeyValueStore>,
}

impl ForecastCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn build_key(lat: f64, lon: f64) -> String {
        format!("{lat:.3},{lon:.3}")
    }

    /// Coordinates of a key in [`ForecastCache::build_key`] form. Keys that
    /// `build_key` would spell differently are rejected, since lookups could
    /// never reach them.
    pub fn parse_key(key: &str) -> Option<(f64, f64)> {
        let (lat, lon) = key.split_once(',')?;
        let lat: f64 = lat.parse().ok()?;
        let lon: f64 = lon.parse().ok()?;
        let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
        (in_range && Self::build_key(lat, lon) == key).then_some((lat, lon))
    }

    /// Store `entry` under its key, stamping `savedAt` with the current time.
    pub async fn save(&self, mut entry: CachedForecast) -> Result<CachedForecast, serde_json::Error> {
        entry.saved_at = chrono::Utc::now().timestamp_millis();
        let value = serde_json::to_value(&entry)?;
        self.store
            .set(&format!("{FORECAST_PREFIX}{}", entry.key), value, None)
            .await;
        debug!(key = %entry.key, "Forecast cached");
        Ok(entry)
    }

    pub async fn load(&self, key: &str) -> Option<CachedForecast> {
        let value = self.store.get(&format!("{FORECAST_PREFIX}{key}")).await?;
        match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable cached forecast");
                None
            }
        }
    }

    /// A missing entry is stale; otherwise stale once older than `max_age`.
    pub fn is_stale(entry: Option<&CachedForecast>, max_age: Duration, now_ms: i64) -> bool {
        let Some(entry) = entry else {
            return true;
        };
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(entry.saved_at) > max_age_ms
    }

    pub fn is_stale_now(entry: Option<&CachedForecast>, max_age: Duration) -> bool {
        Self::is_stale(entry, max_age, chrono::Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(key: &str) -> CachedForecast {
        CachedForecast {
            key: key.to_string(),
            location_label: Some("Ichalkaranji".to_string()),
            current: None,
            forecast: Some(vec![DailyForecast {
                date: "2024-06-01".to_string(),
                min: 22.0,
                max: 31.5,
                icon: None,
                description: "light rain".to_string(),
                rain_likely: true,
            }]),
            saved_at: 0,
        }
    }

    #[test]
    fn test_build_key_rounds_to_three_decimals() {
        assert_eq!(ForecastCache::build_key(16.69876, 74.4561), "16.699,74.456");
        assert_eq!(ForecastCache::build_key(-1.0, 0.0), "-1.000,0.000");
    }

    #[test]
    fn test_parse_key_accepts_only_build_key_form() {
        assert_eq!(ForecastCache::parse_key("16.699,74.456"), Some((16.699, 74.456)));
        assert_eq!(ForecastCache::parse_key("-1.000,0.000"), Some((-1.0, 0.0)));

        for key in ["Ichalkaranji", "16.699", "16.7,74.456", "16.699, 74.456", "16.6990,74.456", "91.000,0.000", "NaN,0.000", ""] {
            assert_eq!(ForecastCache::parse_key(key), None, "{key:?} should be rejected");
        }
    }

    #[test]
    fn test_staleness() {
        let mut e = entry("1.000,2.000");
        e.saved_at = 1_000;
        let max_age = Duration::from_secs(60);

        assert!(ForecastCache::is_stale(None, max_age, 1_000));
        assert!(!ForecastCache::is_stale(Some(&e), max_age, 61_000));
        assert!(ForecastCache::is_stale(Some(&e), max_age, 61_001));
    }

    #[tokio::test]
    async fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new(100);
        assert!(store.get("a").await.is_none());

        store.set("a", json!({"n": 1}), None).await;
        assert_eq!(store.get("a").await, Some(json!({"n": 1})));

        store.set("a", json!({"n": 2}), None).await;
        assert_eq!(store.get("a").await, Some(json!({"n": 2})));

        store.remove("a").await;
        assert!(store.get("a").await.is_none());
    }

    #[tokio::test]
    async fn test_memory_store_entry_expires() {
        let store = MemoryStore::new(100);
        store.set("short", json!("x"), Some(Duration::from_millis(50))).await;
        store.set("long", json!("y"), None).await;
        assert!(store.get("short").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(store.get("short").await.is_none());
        assert_eq!(store.get("long").await, Some(json!("y")));
    }

    #[tokio::test]
    async fn test_forecast_save_stamps_and_loads() {
        let cache = ForecastCache::new(Arc::new(MemoryStore::new(10)));
        let key = ForecastCache::build_key(16.7, 74.46);

        let saved = cache.save(entry(&key)).await.unwrap();
        assert!(saved.saved_at > 0);

        let loaded = cache.load(&key).await.unwrap();
        assert_eq!(loaded, saved);
        assert!(!ForecastCache::is_stale_now(Some(&loaded), Duration::from_secs(600)));
        assert!(cache.load("0.000,0.000").await.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_forecast_is_ignored() {
        let store = Arc::new(MemoryStore::new(10));
        store.set("weather:1.000,1.000", json!({"key": 5}), None).await;
        let cache = ForecastCache::new(store);
        assert!(cache.load("1.000,1.000").await.is_none());
    }
}
