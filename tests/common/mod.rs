//! Shared fakes for integration tests
//!
//! `FakeCluster` and `FakeResolver` stand in for the Kubernetes API and the
//! credential store; both can be changed between passes. `RecordingRunner`
//! records commands instead of running them.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use kubetray::kube::{
    CommandRunner, ContextScope, CredentialStore, Lister, ObjectRef, ScopeResolver,
};
use kubetray::models::{CommandSpec, ResourceKind};
use kubetray::{Listeners, Node, Reconciler, RefreshRequest, Tree};

#[derive(Default)]
struct ClusterState {
    namespaces: Vec<String>,
    instances: HashMap<ResourceKind, Vec<ObjectRef>>,
    namespaces_fail: bool,
    failing_kinds: HashSet<ResourceKind>,
}

/// In-memory cluster
#[derive(Default)]
pub struct FakeCluster {
    state: Mutex<ClusterState>,
}

impl FakeCluster {
    pub fn new(namespaces: &[&str]) -> Arc<Self> {
        let cluster = Arc::new(Self::default());
        cluster.set_namespaces(namespaces);
        cluster
    }

    pub fn set_namespaces(&self, namespaces: &[&str]) {
        self.state.lock().unwrap().namespaces = namespaces.iter().map(|s| s.to_string()).collect();
    }

    pub fn set(&self, kind: ResourceKind, objects: &[(&str, &str)]) {
        self.state.lock().unwrap().instances.insert(
            kind,
            objects
                .iter()
                .map(|(name, ns)| ObjectRef::new(*name, *ns))
                .collect(),
        );
    }

    pub fn fail_namespaces(&self, fail: bool) {
        self.state.lock().unwrap().namespaces_fail = fail;
    }

    pub fn fail_kind(&self, kind: ResourceKind, fail: bool) {
        let mut state = self.state.lock().unwrap();
        if fail {
            state.failing_kinds.insert(kind);
        } else {
            state.failing_kinds.remove(&kind);
        }
    }
}

#[async_trait]
impl Lister for FakeCluster {
    async fn namespaces(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.namespaces_fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(state.namespaces.clone())
    }

    async fn instances(&self, kind: ResourceKind) -> Result<Vec<ObjectRef>> {
        let state = self.state.lock().unwrap();
        if state.failing_kinds.contains(&kind) {
            return Err(anyhow!("{} is forbidden", kind));
        }
        Ok(state.instances.get(&kind).cloned().unwrap_or_default())
    }
}

/// Context registry over fake clusters
#[derive(Default)]
pub struct FakeResolver {
    contexts: Mutex<BTreeMap<String, Arc<FakeCluster>>>,
    unresolvable: Mutex<HashSet<String>>,
    store: Mutex<Option<CredentialStore>>,
    resolutions: AtomicUsize,
}

impl FakeResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, name: &str, cluster: Arc<FakeCluster>) {
        self.contexts.lock().unwrap().insert(name.to_string(), cluster);
    }

    pub fn remove(&self, name: &str) {
        self.contexts.lock().unwrap().remove(name);
    }

    pub fn set_unresolvable(&self, name: &str, broken: bool) {
        let mut unresolvable = self.unresolvable.lock().unwrap();
        if broken {
            unresolvable.insert(name.to_string());
        } else {
            unresolvable.remove(name);
        }
    }

    /// Point scopes at real credential files in `store`
    pub fn use_store(&self, store: CredentialStore) {
        *self.store.lock().unwrap() = Some(store);
    }

    /// Number of successful `resolve` calls so far
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScopeResolver for FakeResolver {
    fn contexts(&self) -> Result<Vec<String>> {
        Ok(self.contexts.lock().unwrap().keys().cloned().collect())
    }

    async fn resolve(&self, context: &str) -> Result<ContextScope> {
        if self.unresolvable.lock().unwrap().contains(context) {
            return Err(anyhow!("invalid kubeconfig for {}", context));
        }
        let cluster = self
            .contexts
            .lock()
            .unwrap()
            .get(context)
            .cloned()
            .ok_or_else(|| anyhow!("unknown context {}", context))?;
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        let kubeconfig = match &*self.store.lock().unwrap() {
            Some(store) => store.context_path(context),
            None => kubeconfig_path(context),
        };
        Ok(ContextScope {
            name: context.to_string(),
            kubeconfig,
            lister: cluster,
        })
    }
}

pub fn kubeconfig_path(context: &str) -> PathBuf {
    PathBuf::from("/tmp/kubetray-test/contexts").join(context)
}

/// Runner that records every command it is asked to run
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<(PathBuf, String)>>,
    fail: bool,
}

impl RecordingRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until at least `n` commands were recorded
    pub async fn wait_for_calls(&self, n: usize) -> Vec<(PathBuf, String)> {
        for _ in 0..200 {
            let calls = self.calls();
            if calls.len() >= n {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.calls()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, kubeconfig: &Path, command: &CommandSpec) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((kubeconfig.to_path_buf(), command.to_string()));
        if self.fail {
            return Err(anyhow!("`{}` exited with 1", command));
        }
        Ok(String::new())
    }
}

/// Everything a test needs to drive passes
pub struct Harness {
    pub reconciler: Reconciler,
    pub resolver: Arc<FakeResolver>,
    pub runner: Arc<RecordingRunner>,
    pub requests: mpsc::UnboundedReceiver<RefreshRequest>,
}

impl Harness {
    pub fn new(console: bool) -> Self {
        Self::with_runner(console, RecordingRunner::new())
    }

    pub fn with_runner(console: bool, runner: Arc<RecordingRunner>) -> Self {
        let resolver = FakeResolver::new();
        let (tx, requests) = mpsc::unbounded_channel();
        let console = console
            .then(|| CommandSpec::from_argv(&["x-terminal-emulator".to_string()]))
            .flatten();
        let listeners = Listeners::new(runner.clone(), tx, console, "kubectl");
        let reconciler = Reconciler::new(Tree::new(), resolver.clone(), listeners);
        Self {
            reconciler,
            resolver,
            runner,
            requests,
        }
    }

    pub fn tree(&self) -> &Tree {
        self.reconciler.tree()
    }

    /// Run `check` against the node at `path`, if it exists
    pub fn at<T>(&self, path: &[&str], check: impl FnOnce(&Node) -> T) -> Option<T> {
        self.tree().read().descend(path).map(check)
    }

    pub fn exists(&self, path: &[&str]) -> bool {
        self.at(path, |_| ()).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.tree().read().descendant_count()
    }
}

/// Depth-first visit of every node under `node`, `node` included
pub fn walk(node: &Node, visit: &mut impl FnMut(&Node)) {
    visit(node);
    for child in node.children() {
        walk(child, visit);
    }
}

/// Wait until `condition` holds, for up to one second
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
