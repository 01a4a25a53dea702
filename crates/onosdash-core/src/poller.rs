// ── Poller ──
//
// Periodic aggregator: one refresh cycle fans out five concurrent reads
// against the controller, folds the results into a `DashboardState`, and
// publishes it through the `DashboardStore` in a single step.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use onosdash_api::{ErrorKind, OnosClient, TransportConfig};

use crate::config::{ConfigHandle, ControllerConfig};
use crate::error::CoreError;
use crate::metrics::{Collections, Snapshot};
use crate::model::{EntityCollection, EntityKind};
use crate::store::{CycleOutcome, CyclePhase, DashboardState, DashboardStore};
use crate::stream::StateStream;

// ── Poller ───────────────────────────────────────────────────────

/// The aggregator entry point.
///
/// Cheaply cloneable via `Arc<PollerInner>`. Every clone shares the same
/// store, configuration handle and cycle lock, so cycles triggered from
/// any clone (timer or manual) are serialized.
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    config: ConfigHandle,
    /// Carries the connection pool; re-pointed at the current endpoint
    /// at the top of every cycle.
    base_client: OnosClient,
    store: Arc<DashboardStore>,
    cycle_lock: Mutex<()>,
    cycles: AtomicU64,
}

impl Poller {
    /// Create a poller reading its settings from `config`. Does not
    /// contact the controller; call [`refresh()`](Self::refresh) or
    /// [`start()`](Self::start).
    pub fn new(config: ConfigHandle, transport: TransportConfig) -> Result<Self, CoreError> {
        let current = config.load();
        current.validate()?;
        let base_client = OnosClient::new(
            current.endpoint.clone(),
            &transport.with_timeout(current.timeout),
        )?;

        Ok(Self {
            inner: Arc::new(PollerInner {
                config,
                base_client,
                store: Arc::new(DashboardStore::new()),
                cycle_lock: Mutex::new(()),
                cycles: AtomicU64::new(0),
            }),
        })
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DashboardStore> {
        &self.inner.store
    }

    /// A client bound to the currently configured endpoint, for ad-hoc
    /// lookups outside the refresh cycle.
    pub fn client(&self) -> Result<OnosClient, CoreError> {
        let config = self.inner.config.load();
        Ok(self
            .inner
            .base_client
            .reconfigure(config.endpoint.clone(), config.timeout)?)
    }

    pub fn subscribe(&self) -> StateStream {
        self.inner.store.subscribe()
    }

    pub fn current(&self) -> Arc<DashboardState> {
        self.inner.store.current()
    }

    // ── Refresh cycle ────────────────────────────────────────────

    /// Run one refresh cycle and publish its result.
    ///
    /// Calls made while a cycle is in flight wait for it to settle and
    /// then run their own cycle, in arrival order.
    pub async fn refresh(&self) -> CycleOutcome {
        let _cycle = self.inner.cycle_lock.lock().await;
        let cycle = self.inner.cycles.fetch_add(1, Ordering::Relaxed) + 1;

        self.inner.store.set_phase(CyclePhase::Fetching);
        let _phase = PhaseGuard(&self.inner.store);

        match self.run_cycle(cycle).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let kind = e.kind();
                let message = match kind {
                    ErrorKind::Configuration => format!("invalid configuration: {e}"),
                    _ => format!("connection failed: {e}"),
                };
                warn!(cycle, %kind, error = %e, "refresh cycle failed");
                let outcome = CycleOutcome::TotalFailure {
                    kind,
                    message: e.to_string(),
                };
                self.inner
                    .store
                    .record_failure(cycle, message, outcome.clone());
                outcome
            }
        }
    }

    /// Everything between "config loaded" and "state published". An `Err`
    /// means no collection data was gathered at all.
    async fn run_cycle(&self, cycle: u64) -> Result<CycleOutcome, onosdash_api::Error> {
        let config = self.inner.config.load();
        let client = self
            .inner
            .base_client
            .reconfigure(config.endpoint.clone(), config.timeout)?;
        debug!(cycle, base_url = %client.base_url(), "starting refresh cycle");

        if config.connectivity_check {
            client.list_devices().await?;
        }

        let (devices, hosts, flows, links, topology) = tokio::join!(
            client.list_devices(),
            client.list_hosts(),
            client.list_flows(),
            client.list_links(),
            client.get_topology(),
        );

        let devices = FetchOutcome::settle(EntityKind::Devices, devices);
        let hosts = FetchOutcome::settle(EntityKind::Hosts, hosts);
        let flows = FetchOutcome::settle(EntityKind::Flows, flows);
        let links = FetchOutcome::settle(EntityKind::Links, links);
        let topology = FetchOutcome::settle(EntityKind::Topology, topology);

        let failed: Vec<EntityKind> = [&devices, &hosts, &flows, &links, &topology]
            .into_iter()
            .filter(|outcome| outcome.is_failed())
            .map(FetchOutcome::kind)
            .collect();

        let connected = config.connectivity_check || !devices.is_failed();

        let devices = devices.into_collection();
        let hosts = hosts.into_collection();
        let flows = flows.into_collection();
        let links = links.into_collection();
        let topology = topology.into_value();

        let snapshot = Snapshot::derive(
            &Collections {
                devices: &devices,
                hosts: &hosts,
                flows: &flows,
                links: &links,
            },
            config.throughput_unit,
            connected,
            Utc::now(),
        );

        let outcome = if failed.is_empty() {
            CycleOutcome::Success
        } else {
            CycleOutcome::PartialFailure { failed }
        };

        info!(
            cycle,
            devices = snapshot.device_count,
            hosts = snapshot.host_count,
            flows = snapshot.flow_count,
            links = snapshot.link_count,
            throughput = %snapshot.throughput,
            connected,
            "refresh cycle complete"
        );

        self.inner.store.publish(DashboardState {
            snapshot,
            devices: devices.records,
            hosts: hosts.records,
            flows: flows.records,
            links: links.records,
            topology,
            is_loading: false,
            error: None,
            cycle,
            last_outcome: Some(outcome.clone()),
        });

        Ok(outcome)
    }

    // ── Background loop ──────────────────────────────────────────

    /// Spawn the self-rescheduling refresh loop.
    ///
    /// The first cycle runs immediately. Each following cycle starts one
    /// refresh interval (re-read from the config handle every time) after
    /// the previous one settled, or earlier when
    /// [`PollerHandle::trigger`] is called.
    pub fn start(&self) -> PollerHandle {
        let cancel = CancellationToken::new();
        let wake = Arc::new(Notify::new());
        let task = tokio::spawn(poll_task(self.clone(), cancel.clone(), Arc::clone(&wake)));

        PollerHandle {
            cancel,
            wake,
            task: Some(task),
        }
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: run a single cycle and hand back its state.
    ///
    /// Unlike [`refresh()`](Self::refresh), a cycle that could not reach the
    /// controller is reported as an error instead of a disconnected state.
    pub async fn oneshot(config: ControllerConfig) -> Result<Arc<DashboardState>, CoreError> {
        let poller = Self::new(ConfigHandle::new(config), TransportConfig::default())?;
        let _cycle = poller.inner.cycle_lock.lock().await;
        let cycle = poller.inner.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        poller.run_cycle(cycle).await?;
        Ok(poller.current())
    }
}

// ── Handle ───────────────────────────────────────────────────────

/// Owns a running refresh loop. Dropping the handle cancels the loop.
pub struct PollerHandle {
    cancel: CancellationToken,
    wake: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Run the next cycle now instead of waiting out the interval. A
    /// trigger arriving mid-cycle is remembered and fires once it settles.
    pub fn trigger(&self) {
        self.wake.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the loop and wait for it to exit. An in-flight cycle is
    /// abandoned; its requests are dropped with it.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if e.is_panic() {
                    warn!(error = %e, "poll task panicked");
                }
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_task(poller: Poller, cancel: CancellationToken, wake: Arc<Notify>) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            outcome = poller.refresh() => {
                debug!(?outcome, "scheduled refresh settled");
            }
        }

        let interval = poller.inner.config.load().effective_refresh_interval();
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = wake.notified() => debug!("manual refresh triggered"),
            () = tokio::time::sleep(interval) => {}
        }
    }
    debug!("poll task stopped");
}

// ── Fetch outcomes ───────────────────────────────────────────────

/// The settled result of one collection fetch within a cycle.
#[derive(Debug)]
enum FetchOutcome {
    Fetched { kind: EntityKind, body: Value },
    Failed { kind: EntityKind },
}

impl FetchOutcome {
    fn settle(kind: EntityKind, result: Result<Value, onosdash_api::Error>) -> Self {
        match result {
            Ok(body) => Self::Fetched { kind, body },
            Err(e) => {
                warn!(%kind, error = %e, "fetch failed, treating as empty");
                Self::Failed { kind }
            }
        }
    }

    fn kind(&self) -> EntityKind {
        match self {
            Self::Fetched { kind, .. } | Self::Failed { kind } => *kind,
        }
    }

    fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn into_collection(self) -> EntityCollection {
        match self {
            Self::Fetched { kind, body } => EntityCollection::extract(kind, &body),
            Self::Failed { kind } => EntityCollection::empty(kind),
        }
    }

    fn into_value(self) -> Option<Value> {
        match self {
            Self::Fetched { body, .. } => Some(body),
            Self::Failed { .. } => None,
        }
    }
}

/// Resets the phase to idle however the cycle ends, including when its
/// future is dropped mid-flight.
struct PhaseGuard<'a>(&'a DashboardStore);

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.0.set_phase(CyclePhase::Idle);
    }
}
