//! Long-running reconciliation driver
//!
//! Turns interval ticks and [`RefreshRequest`]s into passes. Each pass runs
//! in its own task; the reconciler's gate keeps them from overlapping.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::{PassReport, Reconciler};
use crate::kube::CredentialStore;
use crate::listener::RefreshRequest;

/// Shared auto-refresh switch
#[derive(Debug, Clone, Default)]
pub struct AutoRefresh(Arc<AtomicBool>);

impl AutoRefresh {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Flip the switch and return the new state
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::Relaxed)
    }
}

pub struct Driver {
    reconciler: Reconciler,
    store: Option<CredentialStore>,
    requests: mpsc::UnboundedReceiver<RefreshRequest>,
    auto_refresh: AutoRefresh,
    interval: Duration,
}

impl Driver {
    pub fn new(
        reconciler: Reconciler,
        requests: mpsc::UnboundedReceiver<RefreshRequest>,
        auto_refresh: AutoRefresh,
        interval: Duration,
    ) -> Self {
        Self {
            reconciler,
            store: None,
            requests,
            auto_refresh,
            interval,
        }
    }

    /// Credential store re-derived on [`RefreshRequest::Reload`]
    pub fn with_store(mut self, store: CredentialStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Run an initial full pass, then serve ticks and requests until
    /// `shutdown` completes
    ///
    /// The reconciler's listeners hold a request sender for as long as the
    /// tree lives, so the request channel alone never ends the loop.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        self.dispatch(RefreshRequest::All);

        let period = self.interval.max(Duration::from_secs(1));
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Refresh driver shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if self.auto_refresh.is_enabled() {
                        tracing::debug!("Auto-refresh tick");
                        self.dispatch(RefreshRequest::All);
                    }
                }
                request = self.requests.recv() => {
                    match request {
                        Some(request) => {
                            self.dispatch(request);
                        }
                        None => break,
                    }
                }
            }
        }
        tracing::debug!("Refresh driver stopped");
    }

    /// Run one request in its own task
    pub fn dispatch(&self, request: RefreshRequest) -> JoinHandle<()> {
        let reconciler = self.reconciler.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            let outcome = match request {
                RefreshRequest::All => reconciler.full_pass().await,
                RefreshRequest::Context(name) => reconciler.context_pass(&name).await,
                RefreshRequest::Reload => {
                    if let Some(store) = store {
                        if let Err(e) = store.load(true) {
                            tracing::error!("Failed to reload kubeconfig: {:#}", e);
                            return;
                        }
                    }
                    reconciler.reload_pass().await
                }
            };
            log_outcome(outcome);
        })
    }
}

fn log_outcome(outcome: anyhow::Result<PassReport>) {
    match outcome {
        Ok(report) => {
            for (context, reason) in &report.skipped {
                tracing::debug!("Skipped {}: {}", context, reason);
            }
            if report.orphans > 0 {
                tracing::warn!("{} instances referenced unknown namespaces", report.orphans);
            }
        }
        Err(e) => tracing::error!("Reconciliation failed: {:#}", e),
    }
}
