//! Context scope resolution
//!
//! A scope binds one context name to its derived credential file and a
//! lister built from that file. Scopes are resolved once, when a context node
//! is first created, and then reused from the tree.

use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::PathBuf;
use std::sync::Arc;

use super::{CredentialStore, KubeLister, Lister};

/// A resolved context: credentials on disk plus a lister for the cluster
#[derive(Clone)]
pub struct ContextScope {
    pub name: String,
    pub kubeconfig: PathBuf,
    pub lister: Arc<dyn Lister>,
}

impl std::fmt::Debug for ContextScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextScope")
            .field("name", &self.name)
            .field("kubeconfig", &self.kubeconfig)
            .finish()
    }
}

/// Enumerates known contexts and resolves them to scopes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScopeResolver: Send + Sync {
    /// Names of every context currently available
    fn contexts(&self) -> Result<Vec<String>>;

    /// Build a scope for one context
    async fn resolve(&self, context: &str) -> Result<ContextScope>;
}

/// Resolver over a [`CredentialStore`]
pub struct KubeScopeResolver {
    store: CredentialStore,
}

impl KubeScopeResolver {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ScopeResolver for KubeScopeResolver {
    fn contexts(&self) -> Result<Vec<String>> {
        self.store.list_contexts()
    }

    async fn resolve(&self, context: &str) -> Result<ContextScope> {
        let path = self.store.context_path(context);
        let kubeconfig = Kubeconfig::read_from(&path)
            .with_context(|| format!("Failed to parse kubeconfig: {}", path.display()))?;

        // Each derived file carries exactly one context as its current-context
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .with_context(|| format!("Failed to load context '{}'", context))?;
        let client = Client::try_from(config)
            .with_context(|| format!("Failed to create client for context '{}'", context))?;

        tracing::debug!("Resolved scope for context {}", context);

        Ok(ContextScope {
            name: context.to_string(),
            kubeconfig: path,
            lister: Arc::new(KubeLister::new(client)),
        })
    }
}
