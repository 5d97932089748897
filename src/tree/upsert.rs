//! Idempotent insert-or-touch, one operation per tree level
//!
//! Every upsert either touches an existing child (sets `updated`, nothing
//! else) or creates it together with the fixed structure of its level.
//! Repeating an upsert is therefore a no-op beyond the flag, which is what
//! lets a full re-poll run on every interval without rebuilding the menu.

use std::path::Path;

use super::{Node, TreeError};
use crate::kube::{ContextScope, ObjectRef};
use crate::listener::{Binding, Listeners};
use crate::models::ResourceKind;

/// Title of the per-context manual refresh action
pub const REFRESH_TITLE: &str = "Refresh";

/// Title of the console action of a context or namespace
pub const CONSOLE_TITLE: &str = "Launch console";

/// Outcome of an upsert
#[derive(Debug)]
pub enum Upsert<'a> {
    /// No child had this title; it was created
    Created(&'a mut Node),
    /// An existing child was touched
    Touched(&'a mut Node),
}

impl<'a> Upsert<'a> {
    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }

    pub fn into_node(self) -> &'a mut Node {
        match self {
            Upsert::Created(node) | Upsert::Touched(node) => node,
        }
    }
}

impl Node {
    /// Upsert a context under the root
    ///
    /// A new context gets its scope, a locked refresh action, an optional
    /// locked console action, and a disabled separator.
    pub fn upsert_context(&mut self, scope: &ContextScope, listeners: &Listeners) -> Upsert<'_> {
        let ctx = match self.upsert_child(&scope.name, false) {
            Upsert::Created(ctx) => ctx,
            touched => return touched,
        };

        ctx.set_scope(scope.clone());

        if let Ok(refresh) = ctx.add_child(REFRESH_TITLE, true) {
            listeners.bind(
                refresh.item(),
                Binding::Refresh {
                    context: scope.name.clone(),
                },
            );
        }

        if listeners.console_enabled() {
            if let Ok(console) = ctx.add_child(CONSOLE_TITLE, true) {
                listeners.bind(
                    console.item(),
                    Binding::Console {
                        context: scope.name.clone(),
                        kubeconfig: scope.kubeconfig.clone(),
                        namespace: None,
                    },
                );
            }
        }

        ctx.item().add_separator();
        tracing::debug!("Created context {}", scope.name);
        Upsert::Created(ctx)
    }

    /// Upsert a namespace under a context
    ///
    /// A new namespace immediately gets an optional locked console action,
    /// scoped to that namespace, and one locked grouping node per kind.
    pub fn upsert_namespace(&mut self, namespace: &str, listeners: &Listeners) -> Upsert<'_> {
        let ns = match self.upsert_child(namespace, false) {
            Upsert::Created(ns) => ns,
            touched => return touched,
        };

        if listeners.console_enabled() {
            if let Some(scope) = ns.scope().cloned() {
                if let Ok(console) = ns.add_child(CONSOLE_TITLE, true) {
                    listeners.bind(
                        console.item(),
                        Binding::Console {
                            context: scope.name,
                            kubeconfig: scope.kubeconfig,
                            namespace: Some(namespace.to_string()),
                        },
                    );
                }
            }
        }

        for kind in ResourceKind::all() {
            if let Err(e) = ns.add_child(kind.as_str(), true) {
                tracing::warn!("{}", e);
            }
        }
        Upsert::Created(ns)
    }

    /// Upsert a resource instance under a context
    ///
    /// The instance's namespace must already have been upserted under this
    /// context since the last mark; a namespace left stale counts as missing.
    /// If it is missing nothing is touched and `NoSuchNamespace` is returned.
    /// Action children are not created here, see [`Node::init_actions`].
    pub fn upsert_instance(
        &mut self,
        kind: ResourceKind,
        obj: &ObjectRef,
    ) -> Result<Upsert<'_>, TreeError> {
        let context = self.title().to_string();
        let group = self
            .child_mut(&obj.namespace)
            .filter(|ns| ns.is_updated())
            .and_then(|ns| ns.child_mut(kind.as_str()))
            .ok_or_else(|| TreeError::NoSuchNamespace {
                context,
                namespace: obj.namespace.clone(),
            })?;
        Ok(group.upsert_child(&obj.name, false))
    }

    /// Create the fixed action children of a resource instance, once
    ///
    /// Each action is bound to a listener running its rendered kubectl
    /// command with `kubeconfig`. Returns false if the actions already exist.
    pub fn init_actions(
        &mut self,
        kind: ResourceKind,
        obj: &ObjectRef,
        kubeconfig: &Path,
        listeners: &Listeners,
    ) -> bool {
        if self.is_action_initialized() {
            return false;
        }

        let context = self
            .scope()
            .map(|scope| scope.name.clone())
            .unwrap_or_default();

        for template in kind.actions() {
            let command = template.render(listeners.kubectl(), kind, &obj.namespace, &obj.name);
            match self.add_child(template.title, true) {
                Ok(action) => {
                    listeners.bind(
                        action.item(),
                        Binding::Command {
                            context: context.clone(),
                            kubeconfig: kubeconfig.to_path_buf(),
                            command,
                        },
                    );
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }

        self.set_action_initialized();
        true
    }
}
