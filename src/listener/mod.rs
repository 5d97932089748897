//! Listener lifecycle
//!
//! Every clickable tree node gets at most one listener task. The task owns
//! the node's click stream, performs one side effect per click, and exits
//! when the stream ends, which happens when the sweep closes the node's
//! menu item. Because a click stream can only be taken once, a second
//! `bind` on the same item is refused instead of spawning a duplicate.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::kube::{CommandRunner, derive_namespace};
use crate::menu::MenuHandle;
use crate::models::CommandSpec;

/// Work requested from the reconciliation driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshRequest {
    /// Full pass over every context
    All,
    /// Scoped pass over one context
    Context(String),
    /// Re-derive credentials from the kubeconfig, then a full pass
    Reload,
}

/// Side effect performed by a listener on every click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Ask the driver to reconcile one context
    Refresh { context: String },
    /// Open the configured console with the context's credentials, narrowed
    /// to one namespace when `namespace` is set
    Console {
        context: String,
        kubeconfig: PathBuf,
        namespace: Option<String>,
    },
    /// Run one rendered action command with the context's credentials
    Command {
        context: String,
        kubeconfig: PathBuf,
        command: CommandSpec,
    },
}

impl Binding {
    fn label(&self) -> String {
        match self {
            Binding::Refresh { context } => format!("refresh [{}]", context),
            Binding::Console {
                context,
                namespace: Some(namespace),
                ..
            } => format!("console [{}/{}]", context, namespace),
            Binding::Console { context, .. } => format!("console [{}]", context),
            Binding::Command {
                context, command, ..
            } => format!("`{}` [{}]", command, context),
        }
    }
}

/// Everything a listener needs to act on a click
#[derive(Clone)]
pub struct Listeners {
    runner: Arc<dyn CommandRunner>,
    refresh_tx: mpsc::UnboundedSender<RefreshRequest>,
    console: Option<CommandSpec>,
    kubectl: String,
}

impl Listeners {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        refresh_tx: mpsc::UnboundedSender<RefreshRequest>,
        console: Option<CommandSpec>,
        kubectl: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            refresh_tx,
            console,
            kubectl: kubectl.into(),
        }
    }

    /// Whether context nodes get a console action
    pub fn console_enabled(&self) -> bool {
        self.console.is_some()
    }

    /// Sender for requests to the refresh driver
    pub fn requests(&self) -> mpsc::UnboundedSender<RefreshRequest> {
        self.refresh_tx.clone()
    }

    /// Program used by rendered action templates
    pub fn kubectl(&self) -> &str {
        &self.kubectl
    }

    /// Bind a listener task to a menu item
    ///
    /// Returns `None` if the item's click stream was already taken (a
    /// listener is already bound) or the item is closed.
    pub fn bind(&self, item: &MenuHandle, binding: Binding) -> Option<JoinHandle<()>> {
        let Some(mut clicks) = item.events() else {
            tracing::warn!(
                "Refusing to bind {}: item {} already has a listener",
                binding.label(),
                item.id()
            );
            return None;
        };

        let listeners = self.clone();
        let item_id = item.id();
        Some(tokio::spawn(async move {
            tracing::debug!("Listener started for {} (item {})", binding.label(), item_id);
            while clicks.recv().await.is_some() {
                listeners.fire(&binding).await;
            }
            tracing::debug!("Listener stopped for {} (item {})", binding.label(), item_id);
        }))
    }

    async fn fire(&self, binding: &Binding) {
        match binding {
            Binding::Refresh { context } => {
                tracing::info!("Refresh for {}", context);
                if self
                    .refresh_tx
                    .send(RefreshRequest::Context(context.clone()))
                    .is_err()
                {
                    tracing::warn!("Refresh for {} dropped: driver is not running", context);
                }
            }
            Binding::Console {
                context,
                kubeconfig,
                namespace,
            } => {
                let Some(console) = &self.console else {
                    tracing::warn!("No console command configured");
                    return;
                };
                let kubeconfig = match namespace {
                    Some(namespace) => {
                        tracing::info!("Open shell for {} | {}", context, namespace);
                        match derive_namespace(kubeconfig, namespace) {
                            Ok(path) => path,
                            Err(e) => {
                                tracing::warn!("Console for {}/{} failed: {:#}", context, namespace, e);
                                return;
                            }
                        }
                    }
                    None => {
                        tracing::info!("Open shell for {}", context);
                        kubeconfig.clone()
                    }
                };
                if let Err(e) = self.runner.run(&kubeconfig, console).await {
                    tracing::warn!("Console for {} failed: {:#}", context, e);
                }
            }
            Binding::Command {
                context,
                kubeconfig,
                command,
            } => {
                tracing::info!("Running `{}` on {}", command, context);
                match self.runner.run(kubeconfig, command).await {
                    Ok(output) => {
                        tracing::info!("`{}` finished ({} bytes of output)", command, output.len());
                        tracing::debug!("Exec output: {}", output);
                    }
                    Err(e) => tracing::warn!("`{}` failed: {:#}", command, e),
                }
            }
        }
    }
}
