//! Reconciliation passes
//!
//! A pass marks every unlocked node stale, refreshes each context from a
//! freshly listed snapshot, then sweeps whatever was not touched. Passes are
//! serialized through a single gate so a scoped refresh never interleaves
//! with a full one.

mod apply;
mod driver;
mod snapshot;

pub use apply::{ApplyStats, apply_snapshot};
pub use driver::{AutoRefresh, Driver};
pub use snapshot::{ContextSnapshot, KindListing};

use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::kube::ScopeResolver;
use crate::listener::Listeners;
use crate::tree::Tree;

/// Summary of one pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Contexts refreshed from a successful listing
    pub refreshed: Vec<String>,
    /// Contexts kept as-is, with the reason
    pub skipped: Vec<(String, String)>,
    pub created: usize,
    pub removed: usize,
    pub orphans: usize,
}

impl PassReport {
    fn absorb(&mut self, context: &str, stats: ApplyStats) {
        self.refreshed.push(context.to_string());
        self.created += stats.created;
        self.orphans += stats.orphans;
    }
}

/// Drives mark, refresh and sweep over the shared tree
#[derive(Clone)]
pub struct Reconciler {
    tree: Tree,
    resolver: Arc<dyn ScopeResolver>,
    listeners: Listeners,
    gate: Arc<Mutex<()>>,
}

impl Reconciler {
    pub fn new(tree: Tree, resolver: Arc<dyn ScopeResolver>, listeners: Listeners) -> Self {
        Self {
            tree,
            resolver,
            listeners,
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Reconcile every context known to the resolver
    ///
    /// Contexts that are already in the tree reuse their resolved scope.
    pub async fn full_pass(&self) -> Result<PassReport> {
        self.pass(false).await
    }

    /// Reconcile every context with freshly resolved scopes
    ///
    /// Used after the credential files were re-derived, so that existing
    /// contexts pick up new clients.
    pub async fn reload_pass(&self) -> Result<PassReport> {
        self.pass(true).await
    }

    async fn pass(&self, fresh: bool) -> Result<PassReport> {
        let _gate = self.gate.lock().await;

        let contexts = self
            .resolver
            .contexts()
            .context("Failed to enumerate contexts")?;
        tracing::info!("Reconciling {} contexts", contexts.len());

        self.tree.mark();
        let mut report = PassReport::default();
        for context in &contexts {
            self.refresh_or_retain(context, fresh, &mut report).await;
        }
        report.removed = self.tree.sweep();

        tracing::info!(
            "Pass complete: {} refreshed, {} skipped, {} created, {} removed",
            report.refreshed.len(),
            report.skipped.len(),
            report.created,
            report.removed
        );
        Ok(report)
    }

    /// Mark, refresh and sweep a single context subtree
    ///
    /// Nodes outside the context are left alone. The context must already
    /// be present in the tree.
    pub async fn context_pass(&self, name: &str) -> Result<PassReport> {
        let _gate = self.gate.lock().await;

        {
            let mut root = self.tree.write();
            let Some(ctx) = root.child_mut(name) else {
                bail!("Unknown context: {}", name);
            };
            ctx.mark_stale();
        }

        let mut report = PassReport::default();
        self.refresh_or_retain(name, false, &mut report).await;

        report.removed = {
            let mut root = self.tree.write();
            root.child_mut(name).map(|ctx| ctx.sweep()).unwrap_or(0)
        };
        tracing::info!(
            "Refreshed context {}: {} created, {} removed",
            name,
            report.created,
            report.removed
        );
        Ok(report)
    }

    async fn refresh_or_retain(&self, context: &str, fresh: bool, report: &mut PassReport) {
        match self.refresh(context, fresh).await {
            Ok(stats) => report.absorb(context, stats),
            Err(e) => {
                tracing::warn!("Keeping context {} unchanged: {:#}", context, e);
                if let Some(ctx) = self.tree.write().child_mut(context) {
                    ctx.touch_subtree();
                }
                report.skipped.push((context.to_string(), format!("{:#}", e)));
            }
        }
    }

    async fn refresh(&self, context: &str, fresh: bool) -> Result<ApplyStats> {
        let known = if fresh {
            None
        } else {
            self.tree
                .read()
                .child(context)
                .and_then(|ctx| ctx.scope().cloned())
        };
        let scope = match known {
            Some(scope) => scope,
            None => self
                .resolver
                .resolve(context)
                .await
                .with_context(|| format!("Failed to resolve context '{}'", context))?,
        };

        let snapshot = ContextSnapshot::fetch(scope.lister.as_ref())
            .await
            .with_context(|| format!("Failed to list namespaces in '{}'", context))?;

        let mut root = self.tree.write();
        let upsert = root.upsert_context(&scope, &self.listeners);
        let created = upsert.is_created();
        let ctx = upsert.into_node();
        if fresh && !created {
            ctx.set_scope(scope);
        }
        Ok(apply_snapshot(ctx, &snapshot, &self.listeners))
    }
}
