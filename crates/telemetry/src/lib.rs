//! Tracing setup, session correlation, and in-process metrics for Atlas
//! search.
//!
//! Metric names follow a `search.` prefix convention:
//! - `search.requests`, `search.cache_hits`, `search.cache_misses`,
//!   `search.remote_failures` (counters)
//! - `search.cache_entries` (gauge)
//! - `search.latency.<collection>` in milliseconds (latency samples)

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Latency samples kept per metric; older samples rotate out so a long-lived
/// process reports recent behavior, not its whole history
const LATENCY_WINDOW: usize = 2048;

static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

/// Process-wide session id correlating logs and analytics records from one
/// app run
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Install the tracing subscriber with default settings
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Fails if a
/// subscriber is already installed.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(config.show_target).compact())
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::info!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Atlas telemetry initialized"
    );

    Ok(())
}

/// The current process session id
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Include the emitting module in log lines
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_target: false,
        }
    }
}

/// The global metrics registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

struct LatencySamples {
    samples: Vec<f64>,
    next: usize,
}

impl LatencySamples {
    fn record(&mut self, value: f64) {
        if self.samples.len() < LATENCY_WINDOW {
            self.samples.push(value);
        } else {
            // Ring overwrite once the window is full
            self.samples[self.next] = value;
            self.next = (self.next + 1) % LATENCY_WINDOW;
        }
    }
}

/// In-process counters, gauges, and latency windows.
///
/// Lock-per-kind is plenty at interactive search volume; a poisoned lock
/// drops the update rather than panicking the search path.
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, u64>>,
    gauges: RwLock<HashMap<String, u64>>,
    latencies: RwLock<HashMap<String, LatencySamples>>,
    started_at: Instant,
}

impl MetricsRegistry {
    fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            gauges: RwLock::new(HashMap::new()),
            latencies: RwLock::new(HashMap::new()),
            started_at: Instant::now(),
        }
    }

    /// Increment a counter by one
    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    /// Increment a counter
    pub fn increment_by(&self, name: &str, delta: u64) {
        if let Ok(mut counters) = self.counters.write() {
            *counters.entry(name.to_string()).or_insert(0) += delta;
        }
    }

    /// Set a gauge to its current value
    pub fn gauge(&self, name: &str, value: u64) {
        if let Ok(mut gauges) = self.gauges.write() {
            gauges.insert(name.to_string(), value);
        }
    }

    /// Record one latency sample in milliseconds
    pub fn histogram(&self, name: &str, value_ms: f64) {
        if let Ok(mut latencies) = self.latencies.write() {
            latencies
                .entry(name.to_string())
                .or_insert_with(|| LatencySamples {
                    samples: Vec::new(),
                    next: 0,
                })
                .record(value_ms);
        }
    }

    /// Seconds since the registry was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Point-in-time copy of every metric
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        let gauges = self
            .gauges
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        let latencies = self
            .latencies
            .read()
            .map(|guard| {
                guard
                    .iter()
                    .map(|(name, window)| (name.clone(), LatencySummary::compute(&window.samples)))
                    .collect()
            })
            .unwrap_or_default();

        MetricsSnapshot {
            session_id: session_id().to_string(),
            uptime_secs: self.uptime_secs(),
            counters,
            gauges,
            latencies,
        }
    }
}

/// Every metric at one instant, ready to serialize
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Session the metrics belong to
    pub session_id: String,
    /// Process uptime when the snapshot was taken
    pub uptime_secs: u64,
    /// Counter values by name
    pub counters: HashMap<String, u64>,
    /// Gauge values by name
    pub gauges: HashMap<String, u64>,
    /// Latency summaries by name
    pub latencies: HashMap<String, LatencySummary>,
}

/// Percentile summary over one latency window
#[derive(Debug, Clone, Serialize)]
pub struct LatencySummary {
    /// Samples in the window
    pub count: usize,
    /// Fastest sample in milliseconds
    pub min_ms: f64,
    /// Slowest sample in milliseconds
    pub max_ms: f64,
    /// Mean in milliseconds
    pub mean_ms: f64,
    /// Median in milliseconds
    pub p50_ms: f64,
    /// 95th percentile in milliseconds
    pub p95_ms: f64,
    /// 99th percentile in milliseconds
    pub p99_ms: f64,
}

impl LatencySummary {
    fn compute(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                count: 0,
                min_ms: 0.0,
                max_ms: 0.0,
                mean_ms: 0.0,
                p50_ms: 0.0,
                p95_ms: 0.0,
                p99_ms: 0.0,
            };
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();

        Self {
            count,
            min_ms: sorted[0],
            max_ms: sorted[count - 1],
            mean_ms: sorted.iter().sum::<f64>() / count as f64,
            p50_ms: percentile(&sorted, 50.0),
            p95_ms: percentile(&sorted, 95.0),
            p99_ms: percentile(&sorted, 99.0),
        }
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_accumulates() {
        let registry = MetricsRegistry::new();
        registry.increment("search.requests");
        registry.increment("search.requests");
        registry.increment_by("search.requests", 3);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.counters["search.requests"], 5);
    }

    #[test]
    fn test_gauge_keeps_latest() {
        let registry = MetricsRegistry::new();
        registry.gauge("search.cache_entries", 42);
        registry.gauge("search.cache_entries", 17);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.gauges["search.cache_entries"], 17);
    }

    #[test]
    fn test_latency_summary_percentiles() {
        let registry = MetricsRegistry::new();
        for ms in [12.0, 18.0, 25.0, 31.0, 44.0, 58.0, 71.0, 89.0, 120.0, 240.0] {
            registry.histogram("search.latency.places", ms);
        }

        let snapshot = registry.snapshot();
        let summary = &snapshot.latencies["search.latency.places"];
        assert_eq!(summary.count, 10);
        assert_eq!(summary.min_ms, 12.0);
        assert_eq!(summary.max_ms, 240.0);
        assert_eq!(summary.p50_ms, 58.0);
        assert_eq!(summary.p99_ms, 240.0);
    }

    #[test]
    fn test_latency_window_rotates() {
        let registry = MetricsRegistry::new();
        for i in 0..(LATENCY_WINDOW + 100) {
            registry.histogram("search.latency.events", i as f64);
        }

        let snapshot = registry.snapshot();
        let summary = &snapshot.latencies["search.latency.events"];
        assert_eq!(summary.count, LATENCY_WINDOW);
        // The first 100 samples have been overwritten
        assert!(summary.min_ms >= 100.0);
    }

    #[test]
    fn test_empty_summary_is_zeroed() {
        let summary = LatencySummary::compute(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.p95_ms, 0.0);
    }

    #[test]
    fn test_session_id_is_uuid() {
        let id = session_id();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.increment("search.requests");
        let value = serde_json::to_value(registry.snapshot()).unwrap();
        assert!(value["counters"]["search.requests"].is_u64());
        assert!(value["session_id"].is_string());
    }
}
