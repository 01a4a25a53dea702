// ── Runtime controller configuration ──
//
// These types describe *how* to poll a controller. They never touch
// disk: the settings layer builds a `ControllerConfig` and hands it in,
// and may swap a new one into the `ConfigHandle` at any time.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;

use onosdash_api::Endpoint;
use onosdash_api::transport::DEFAULT_TIMEOUT;

use crate::error::CoreError;
use crate::metrics::ThroughputUnit;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

/// Shortest interval the background loop will sleep between cycles.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Configuration for polling a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub endpoint: Endpoint,
    /// Pause between the end of one cycle and the start of the next.
    pub refresh_interval: Duration,
    /// Client-side deadline for each request.
    pub timeout: Duration,
    pub throughput_unit: ThroughputUnit,
    /// Probe `GET /devices` before fetching collections; a failed probe
    /// marks the whole cycle as disconnected.
    pub connectivity_check: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            throughput_unit: ThroughputUnit::default(),
            connectivity_check: true,
        }
    }
}

impl ControllerConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            ..Self::default()
        }
    }

    /// The refresh interval, clamped to [`MIN_REFRESH_INTERVAL`].
    pub fn effective_refresh_interval(&self) -> Duration {
        self.refresh_interval.max(MIN_REFRESH_INTERVAL)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.endpoint.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "controller host is empty".into(),
            });
        }
        if self.endpoint.port == 0 {
            return Err(CoreError::Config {
                message: "controller port must be non-zero".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(CoreError::Config {
                message: "timeout must be non-zero".into(),
            });
        }
        self.endpoint.base_url()?;
        Ok(())
    }
}

/// Shared, swappable configuration.
///
/// Readers take a cheap snapshot with [`load`](Self::load); writers
/// replace the whole value. The poller loads exactly once per cycle, so
/// a swap takes effect on the next cycle and never mid-flight.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<ControllerConfig>>,
}

impl ConfigHandle {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    pub fn load(&self) -> Arc<ControllerConfig> {
        self.inner.load_full()
    }

    pub fn store(&self, config: ControllerConfig) {
        self.inner.store(Arc::new(config));
    }

    /// Apply an in-place edit to a copy of the current config and swap it in.
    pub fn update(&self, mut edit: impl FnMut(&mut ControllerConfig)) {
        self.inner.rcu(|current| {
            let mut next = ControllerConfig::clone(current);
            edit(&mut next);
            next
        });
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}
