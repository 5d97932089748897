//! Applying a snapshot to a context subtree

use std::path::PathBuf;

use super::ContextSnapshot;
use crate::listener::Listeners;
use crate::tree::{Node, Upsert};

/// Counters collected while applying one snapshot
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyStats {
    /// Nodes created, action nodes included
    pub created: usize,
    /// Instances whose namespace was not in the namespace listing
    pub orphans: usize,
}

/// Upsert everything in `snapshot` under the context node `ctx`
///
/// Namespaces go first so instance upserts find their grouping nodes. An
/// instance whose namespace was not listed is reported and skipped. Kinds
/// that failed to list keep their known instances for this pass.
pub fn apply_snapshot(ctx: &mut Node, snapshot: &ContextSnapshot, listeners: &Listeners) -> ApplyStats {
    let mut stats = ApplyStats::default();
    ctx.touch();

    for namespace in &snapshot.namespaces {
        if let Upsert::Created(ns) = ctx.upsert_namespace(namespace, listeners) {
            stats.created += 1 + ns.len();
        }
    }

    let kubeconfig: PathBuf = ctx
        .scope()
        .map(|scope| scope.kubeconfig.clone())
        .unwrap_or_default();

    for listing in &snapshot.listings {
        let kind = listing.kind;
        let objects = match &listing.result {
            Ok(objects) => objects,
            Err(e) => {
                tracing::warn!(
                    "Listing {} failed in {}: {:#}; keeping known instances",
                    kind,
                    ctx.title(),
                    e
                );
                for ns in ctx.children_mut() {
                    if let Some(group) = ns.child_mut(kind.as_str()) {
                        group.touch_subtree();
                    }
                }
                continue;
            }
        };

        for obj in objects {
            match ctx.upsert_instance(kind, obj) {
                Ok(upsert) => {
                    let created = upsert.is_created();
                    let node = upsert.into_node();
                    if created {
                        stats.created += 1;
                    }
                    if node.init_actions(kind, obj, &kubeconfig, listeners) {
                        stats.created += kind.actions().len();
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping {} {}: {}", kind, obj.name, e);
                    stats.orphans += 1;
                }
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kube::{ContextScope, MockCommandRunner, MockLister, ObjectRef};
    use crate::menu::Menu;
    use crate::models::ResourceKind;
    use crate::reconcile::KindListing;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn listeners() -> Listeners {
        let (tx, _rx) = mpsc::unbounded_channel();
        Listeners::new(Arc::new(MockCommandRunner::new()), tx, None, "kubectl")
    }

    fn context(root: &mut Node, listeners: &Listeners) {
        let scope = ContextScope {
            name: "dev".to_string(),
            kubeconfig: PathBuf::from("/tmp/contexts/dev"),
            lister: Arc::new(MockLister::new()),
        };
        root.upsert_context(&scope, listeners);
    }

    fn pods(names: &[(&str, &str)]) -> KindListing {
        KindListing {
            kind: ResourceKind::Pod,
            result: Ok(names
                .iter()
                .map(|(name, ns)| ObjectRef::new(*name, *ns))
                .collect()),
        }
    }

    #[tokio::test]
    async fn test_apply_creates_instances_with_actions() {
        let menu = Menu::new();
        let mut root = Node::root(&menu);
        let listeners = listeners();
        context(&mut root, &listeners);

        let snapshot = ContextSnapshot::from_parts(
            vec!["default".to_string()],
            vec![pods(&[("web-1", "default")])],
        );
        let ctx = root.child_mut("dev").unwrap();
        let stats = apply_snapshot(ctx, &snapshot, &listeners);

        // namespace + 5 groups + pod + 4 actions
        assert_eq!(stats, ApplyStats { created: 11, orphans: 0 });
        let pod = ctx.descend(&["default", "Pod", "web-1"]).unwrap();
        assert!(pod.is_action_initialized());
        assert_eq!(pod.len(), 4);

        let again = apply_snapshot(ctx, &snapshot, &listeners);
        assert_eq!(again, ApplyStats::default());
    }

    #[tokio::test]
    async fn test_apply_counts_orphans_without_mutation() {
        let menu = Menu::new();
        let mut root = Node::root(&menu);
        let listeners = listeners();
        context(&mut root, &listeners);
        let ctx = root.child_mut("dev").unwrap();
        let before = ctx.descendant_count();

        let snapshot = ContextSnapshot::from_parts(Vec::new(), vec![pods(&[("web-1", "default")])]);
        let stats = apply_snapshot(ctx, &snapshot, &listeners);

        assert_eq!(stats.orphans, 1);
        assert_eq!(stats.created, 0);
        assert_eq!(ctx.descendant_count(), before);
    }

    #[tokio::test]
    async fn test_failed_kind_keeps_known_instances() {
        let menu = Menu::new();
        let mut root = Node::root(&menu);
        let listeners = listeners();
        context(&mut root, &listeners);
        let ctx = root.child_mut("dev").unwrap();
        let first = ContextSnapshot::from_parts(
            vec!["default".to_string()],
            vec![pods(&[("web-1", "default")])],
        );
        apply_snapshot(ctx, &first, &listeners);

        ctx.mark_stale();
        let failing = ContextSnapshot::from_parts(
            vec!["default".to_string()],
            vec![KindListing {
                kind: ResourceKind::Pod,
                result: Err(anyhow::anyhow!("forbidden")),
            }],
        );
        apply_snapshot(ctx, &failing, &listeners);
        ctx.sweep();

        let pod = ctx.descend(&["default", "Pod", "web-1"]).unwrap();
        assert!(pod.is_updated());
    }
}
