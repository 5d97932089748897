//! Reconciliation pass tests
//!
//! Drive full and single-context passes against fake clusters and check the
//! resulting tree.

mod common;

use common::{FakeCluster, Harness, eventually, walk};
use kubetray::Node;
use kubetray::models::ResourceKind;
use kubetray::tree::REFRESH_TITLE;

const WEB_1: &[&str] = &["dev", "default", "Pod", "web-1"];

/// `dev` with namespace `default` and pod `web-1`
fn dev_harness() -> (Harness, std::sync::Arc<FakeCluster>) {
    let h = Harness::new(false);
    let dev = FakeCluster::new(&["default"]);
    dev.set(ResourceKind::Pod, &[("web-1", "default")]);
    h.resolver.add("dev", dev.clone());
    (h, dev)
}

#[tokio::test]
async fn test_first_pass_builds_full_path() {
    let (h, _dev) = dev_harness();

    let report = h.reconciler.full_pass().await.unwrap();
    assert_eq!(report.refreshed, vec!["dev".to_string()]);
    assert!(report.skipped.is_empty());

    let actions: Vec<String> = h
        .at(WEB_1, |pod| {
            assert!(pod.is_action_initialized());
            let mut titles: Vec<String> = pod.children().map(|a| a.title().to_string()).collect();
            titles.sort();
            titles
        })
        .unwrap();
    assert_eq!(actions, vec!["describe", "get", "logs", "logs:follow"]);

    for kind in ResourceKind::all() {
        assert!(h.exists(&["dev", "default", kind.as_str()]));
    }
    assert!(h.exists(&["dev", REFRESH_TITLE]));
    // dev, Refresh, default, 5 groups, web-1 and its 4 actions
    assert_eq!(h.node_count(), 13);
}

#[tokio::test]
async fn test_repeated_pass_is_idempotent() {
    let (h, _dev) = dev_harness();
    h.reconciler.full_pass().await.unwrap();
    let nodes = h.node_count();
    let items = h.tree().menu().len();

    let report = h.reconciler.full_pass().await.unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.removed, 0);
    assert_eq!(h.node_count(), nodes);
    assert_eq!(h.tree().menu().len(), items);
    assert_eq!(h.at(WEB_1, |pod| pod.is_updated()), Some(true));
    assert_eq!(h.at(WEB_1, |pod| pod.len()), Some(4));
    assert_eq!(h.resolver.resolutions(), 1);
}

#[tokio::test]
async fn test_vanished_instance_is_swept() {
    let (h, dev) = dev_harness();
    h.reconciler.full_pass().await.unwrap();
    let item = h.at(WEB_1, |pod| pod.item().clone()).unwrap();
    let action = h
        .at(&["dev", "default", "Pod", "web-1", "get"], |a| a.item().clone())
        .unwrap();

    dev.set(ResourceKind::Pod, &[]);
    let report = h.reconciler.full_pass().await.unwrap();

    assert_eq!(report.removed, 5);
    assert!(!h.exists(WEB_1));
    assert!(item.is_closed());
    assert!(action.is_closed());
    assert!(h.exists(&["dev", "default", "Pod"]));
    assert_eq!(h.at(&["dev", "default"], |ns| ns.is_updated()), Some(true));
}

#[tokio::test]
async fn test_instance_in_unlisted_namespace_is_an_orphan() {
    let (h, dev) = dev_harness();
    h.reconciler.full_pass().await.unwrap();

    // web-1 is still reported but its namespace is not
    dev.set_namespaces(&[]);
    let report = h.reconciler.full_pass().await.unwrap();

    assert_eq!(report.orphans, 1);
    assert_eq!(report.created, 0);
    assert!(!h.exists(&["dev", "default"]));
    assert!(h.exists(&["dev", REFRESH_TITLE]));
}

#[tokio::test]
async fn test_locked_nodes_stay_updated_through_mark() {
    let (h, _dev) = dev_harness();
    h.reconciler.full_pass().await.unwrap();

    h.tree().mark();

    let mut locked = 0;
    walk(&h.tree().read(), &mut |node: &Node| {
        if node.is_locked() {
            locked += 1;
            assert!(node.is_updated(), "{} lost its flag", node.title());
        }
    });
    // root, Refresh, 5 groups, 4 actions
    assert_eq!(locked, 11);
    assert_eq!(h.at(WEB_1, |pod| pod.is_updated()), Some(false));
}

#[tokio::test]
async fn test_actions_are_created_once_across_passes() {
    let (h, _dev) = dev_harness();
    for _ in 0..4 {
        h.reconciler.full_pass().await.unwrap();
    }

    assert_eq!(h.at(WEB_1, |pod| pod.len()), Some(4));
    // every action already has its listener
    let taken = h
        .at(&["dev", "default", "Pod", "web-1", "logs"], |a| a.item().events().is_none())
        .unwrap();
    assert!(taken);
}

#[tokio::test]
async fn test_concurrent_passes_do_not_duplicate_nodes() {
    let (h, dev) = dev_harness();
    dev.set(
        ResourceKind::Deployment,
        &[("web", "default"), ("api", "default")],
    );

    let (a, b) = tokio::join!(h.reconciler.full_pass(), h.reconciler.full_pass());
    a.unwrap();
    b.unwrap();

    assert_eq!(h.at(&["dev", "default", "Deployment"], |g| g.len()), Some(2));
    let mut unbound = 0;
    walk(&h.tree().read(), &mut |node: &Node| {
        if !node.title().is_empty() && node.item().events().is_some() {
            unbound += 1;
        }
    });
    // only containers (context, namespace, groups, instances) have no listener
    assert_eq!(unbound, 1 + 1 + 5 + 3);
}

#[tokio::test]
async fn test_unresolvable_context_is_retained_then_recovers() {
    let (h, dev) = dev_harness();
    h.reconciler.full_pass().await.unwrap();
    let nodes = h.node_count();

    // Scope is cached on the node, so a listing failure is what skips it
    dev.fail_namespaces(true);
    dev.set(ResourceKind::Pod, &[]);
    let report = h.reconciler.full_pass().await.unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "dev");
    assert_eq!(report.removed, 0);
    assert_eq!(h.node_count(), nodes);
    assert!(h.exists(WEB_1));

    dev.fail_namespaces(false);
    let report = h.reconciler.full_pass().await.unwrap();
    assert_eq!(report.refreshed, vec!["dev".to_string()]);
    assert!(!h.exists(WEB_1));
}

#[tokio::test]
async fn test_never_resolved_context_creates_nothing() {
    let (h, _dev) = dev_harness();
    h.resolver.add("broken", FakeCluster::new(&["default"]));
    h.resolver.set_unresolvable("broken", true);

    let report = h.reconciler.full_pass().await.unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert!(!h.exists(&["broken"]));
    assert!(h.exists(WEB_1));
}

#[tokio::test]
async fn test_failed_kind_keeps_its_instances_only() {
    let (h, dev) = dev_harness();
    dev.set(ResourceKind::Service, &[("web", "default")]);
    h.reconciler.full_pass().await.unwrap();

    dev.fail_kind(ResourceKind::Pod, true);
    dev.set(ResourceKind::Pod, &[]);
    dev.set(ResourceKind::Service, &[]);
    h.reconciler.full_pass().await.unwrap();

    assert!(h.exists(WEB_1));
    assert!(!h.exists(&["dev", "default", "Service", "web"]));
}

#[tokio::test]
async fn test_removed_context_is_swept_with_its_listeners() {
    let (h, _dev) = dev_harness();
    h.reconciler.full_pass().await.unwrap();
    let refresh = h
        .at(&["dev", REFRESH_TITLE], |n| n.item().clone())
        .unwrap();
    let listeners_before = std::sync::Arc::strong_count(&h.runner);

    h.resolver.remove("dev");
    let report = h.reconciler.full_pass().await.unwrap();

    assert_eq!(report.removed, 13);
    assert_eq!(h.node_count(), 0);
    assert!(h.tree().menu().is_empty());
    assert!(refresh.is_closed());
    // Refresh listener plus four action listeners held a runner each
    let runner = h.runner.clone();
    assert!(eventually(|| std::sync::Arc::strong_count(&runner) == listeners_before - 5 + 1).await);
}

#[tokio::test]
async fn test_context_pass_only_touches_its_context() {
    let (h, dev) = dev_harness();
    let prod = FakeCluster::new(&["default"]);
    prod.set(ResourceKind::Pod, &[("api-1", "default")]);
    h.resolver.add("prod", prod.clone());
    h.reconciler.full_pass().await.unwrap();

    dev.set(ResourceKind::Pod, &[("web-2", "default")]);
    prod.set(ResourceKind::Pod, &[]);
    let report = h.reconciler.context_pass("dev").await.unwrap();

    assert_eq!(report.refreshed, vec!["dev".to_string()]);
    assert!(h.exists(&["dev", "default", "Pod", "web-2"]));
    assert!(!h.exists(WEB_1));
    assert!(h.exists(&["prod", "default", "Pod", "api-1"]));
}

#[tokio::test]
async fn test_reload_pass_resolves_again() {
    let (h, _dev) = dev_harness();
    h.reconciler.full_pass().await.unwrap();
    h.reconciler.reload_pass().await.unwrap();

    assert_eq!(h.resolver.resolutions(), 2);
    assert!(h.exists(WEB_1));
}
