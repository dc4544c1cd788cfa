//! Reconciliation engine
//!
//! The [`Reconciler`] keeps the remote half of the gallery fresh. While a
//! base URL is configured it polls the backend's listing immediately and
//! then on every interval tick; the merged view is computed on demand from
//! the latest listing and the session upload log.
//!
//! ## Lifecycle
//!
//! ```text
//! start() ──→ Disabled (no base URL, no timer)
//!        └──→ Active   (poll now, then every interval) ──stop()──→ idle
//! ```
//!
//! Each activation owns a [`CancellationToken`] and its own in-flight
//! counter. Stopping cancels the token under the state lock, which ends the
//! timer loop; polls that have not started yet never call the backend and
//! polls that resolve afterwards are discarded. Ticks do not wait for the
//! previous poll, so two `list()` calls may be in flight at once. Failed
//! polls are not retried; the next tick runs anyway.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use minicloud_core::config::ConfigProvider;
use minicloud_core::domain::{MergedImageRecord, RemoteListingEntry, SessionLog};
use minicloud_core::ports::IImageBackend;

use crate::merge::merge_records;

/// Default thumbnail width for remote gallery records
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 400;

/// Shortest accepted poll interval
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Whether the engine is polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    /// No base URL; nothing is polled
    Disabled,
    /// Polling on the interval timer
    Active,
}

/// Snapshot of the engine's sync state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    /// At least one poll of the current activation is in flight
    pub syncing: bool,
    /// Message of the most recent failed poll, cleared when a poll starts
    pub error: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub remote_count: usize,
}

#[derive(Debug, Default)]
struct EngineState {
    remote: Vec<RemoteListingEntry>,
    error: Option<String>,
    last_synced_at: Option<DateTime<Utc>>,
}

/// Liveness flag and in-flight counter of one activation
#[derive(Debug, Clone, Default)]
struct PollScope {
    alive: CancellationToken,
    in_flight: Arc<AtomicUsize>,
}

impl PollScope {
    fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

/// State shared between the engine handle and its poll tasks
struct Shared {
    backend: Arc<dyn IImageBackend>,
    config: ConfigProvider,
    session: SessionLog,
    state: Mutex<EngineState>,
    changes: watch::Sender<u64>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// Runs one poll on behalf of `scope`
    ///
    /// The liveness check and every state change happen under the state
    /// lock, the same lock [`Reconciler::stop`] cancels under.
    async fn poll(&self, scope: &PollScope) -> Result<()> {
        {
            let mut state = self.state();
            if scope.alive.is_cancelled() {
                debug!("Skipping poll of a stopped activation");
                return Ok(());
            }
            scope.in_flight.fetch_add(1, Ordering::SeqCst);
            state.error = None;
        }
        self.notify();
        debug!("Polling image listing");

        let result = self.backend.list().await.map(|listing| listing.into_entries());

        {
            let mut state = self.state();
            scope.in_flight.fetch_sub(1, Ordering::SeqCst);
            if scope.alive.is_cancelled() {
                debug!("Discarding poll result of a stopped activation");
                return Ok(());
            }

            match &result {
                Ok(entries) => {
                    debug!(count = entries.len(), "Remote listing updated");
                    state.remote = entries.clone();
                    state.last_synced_at = Some(Utc::now());
                }
                Err(e) => {
                    let message = format!("{e:#}");
                    warn!(error = %message, "Failed to poll image listing");
                    state.error = Some(message);
                }
            }
        }
        self.notify();

        result.map(|_| ())
    }
}

/// Timer-driven gallery reconciler
///
/// Created once with explicit handles to the backend, configuration and
/// session log. Must be started from within a tokio runtime.
pub struct Reconciler {
    shared: Arc<Shared>,
    interval: Duration,
    thumbnail_width: u32,
    activation: Mutex<Option<PollScope>>,
    /// Scope of [`Reconciler::poll_once`] calls made while idle
    detached: PollScope,
}

impl Reconciler {
    /// Creates an idle reconciler
    ///
    /// # Arguments
    /// * `backend` - Source of the remote listing
    /// * `config` - Read on every start to gate polling on the base URL
    /// * `session` - Session upload log merged into the view
    /// * `interval` - Time between polls; raised to [`MIN_POLL_INTERVAL`]
    ///   when shorter
    pub fn new(
        backend: Arc<dyn IImageBackend>,
        config: ConfigProvider,
        session: SessionLog,
        interval: Duration,
    ) -> Self {
        let interval = if interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = interval.as_millis() as u64,
                "Poll interval too short, using the minimum"
            );
            MIN_POLL_INTERVAL
        } else {
            interval
        };

        let (changes, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                backend,
                config,
                session,
                state: Mutex::new(EngineState::default()),
                changes,
            }),
            interval,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            activation: Mutex::new(None),
            detached: PollScope::default(),
        }
    }

    /// Overrides the width used for remote thumbnail URLs
    pub fn with_thumbnail_width(mut self, width: u32) -> Self {
        self.thumbnail_width = width;
        self
    }

    fn activation(&self) -> MutexGuard<'_, Option<PollScope>> {
        self.activation.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts polling if a base URL is configured
    ///
    /// Issues the first poll immediately. Calling `start` on an active
    /// engine does nothing. Without a base URL the remote listing is
    /// cleared and no timer is created.
    pub fn start(&self) -> SyncPhase {
        let mut activation = self.activation();
        if activation.is_some() {
            return SyncPhase::Active;
        }

        if !self.shared.config.snapshot().has_base_url() {
            {
                let mut state = self.shared.state();
                state.remote.clear();
                state.error = None;
            }
            self.shared.notify();
            info!("No base URL configured, gallery sync disabled");
            return SyncPhase::Disabled;
        }

        let scope = PollScope::default();
        tokio::spawn(run_timer(self.shared.clone(), self.interval, scope.clone()));
        *activation = Some(scope);

        info!(interval_secs = self.interval.as_secs(), "Gallery sync started");
        SyncPhase::Active
    }

    /// Stops polling
    ///
    /// Polls of this activation that have not started yet are skipped and
    /// results of outstanding ones are discarded.
    pub fn stop(&self) {
        let Some(scope) = self.activation().take() else {
            return;
        };

        {
            let _state = self.shared.state();
            scope.alive.cancel();
        }
        self.shared.notify();
        info!("Gallery sync stopped");
    }

    pub fn is_active(&self) -> bool {
        self.activation().is_some()
    }

    /// Re-evaluates the base URL after a configuration change
    ///
    /// Restarts an active engine so the new backend is polled right away,
    /// or disables it when the base URL was cleared.
    pub fn on_config_changed(&self) -> SyncPhase {
        debug!("Configuration changed, restarting gallery sync");
        self.stop();
        self.start()
    }

    /// Polls once outside the timer
    ///
    /// Updates the same state as a timer tick. Returns an error if the poll
    /// failed; the error is also recorded in [`SyncStatus::error`]. Does
    /// nothing when no base URL is configured.
    pub async fn poll_once(&self) -> Result<()> {
        if !self.shared.config.snapshot().has_base_url() {
            debug!("No base URL configured, skipping poll");
            return Ok(());
        }

        let scope = self
            .activation()
            .clone()
            .unwrap_or_else(|| self.detached.clone());
        self.shared.poll(&scope).await
    }

    /// The merged gallery, newest first
    pub fn merged_view(&self) -> Vec<MergedImageRecord> {
        let remote = self.shared.state().remote.clone();
        merge_records(
            &self.shared.config.base_url(),
            &remote,
            &self.shared.session.entries(),
            self.thumbnail_width,
        )
    }

    /// The last successfully polled listing
    pub fn remote_listing(&self) -> Vec<RemoteListingEntry> {
        self.shared.state().remote.clone()
    }

    pub fn status(&self) -> SyncStatus {
        let (phase, syncing) = match self.activation().as_ref() {
            Some(scope) => (SyncPhase::Active, scope.is_syncing()),
            None => (SyncPhase::Disabled, false),
        };
        let syncing = syncing || self.detached.is_syncing();
        let state = self.shared.state();
        SyncStatus {
            phase,
            syncing,
            error: state.error.clone(),
            last_synced_at: state.last_synced_at,
            remote_count: state.remote.len(),
        }
    }

    /// Receiver that changes whenever the status or the listing changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        if let Some(scope) = self.activation().take() {
            scope.alive.cancel();
        }
    }
}

/// Interval loop of one activation; each tick spawns its own poll
async fn run_timer(shared: Arc<Shared>, period: Duration, scope: PollScope) {
    let mut ticker = tokio::time::interval(period);

    loop {
        tokio::select! {
            biased;
            _ = scope.alive.cancelled() => break,
            _ = ticker.tick() => {
                let shared = shared.clone();
                let scope = scope.clone();
                tokio::spawn(async move {
                    // Failures are recorded in the state
                    let _ = shared.poll(&scope).await;
                });
            }
        }
    }

    debug!("Gallery sync timer stopped");
}
