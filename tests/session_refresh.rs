//! Status session tests
//!
//! Listing arguments per namespace scope, all-or-nothing refreshes, filters
//! and the namespace and context helpers.

mod common;

use common::{FakeRunner, list, pod, strings};
use kubedash::kubectl::args::NamespaceScope;
use kubedash::services::{SessionError, current_context, list_namespaces};
use kubedash::{CommandOutput, ResourceRegistry, StatusSession};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn session(kind: &str, namespace: &str) -> StatusSession {
    StatusSession::new(ResourceRegistry::global(), kind, namespace).unwrap()
}

#[tokio::test]
async fn test_refresh_in_named_namespace() {
    let runner = FakeRunner::new().respond_json(list(vec![
        pod("api-1", "web", "Running"),
        pod("api-2", "web", "Pending"),
    ]));
    let mut session = session("po", "web");

    session.refresh(&runner, None, None).await.unwrap();

    assert_eq!(
        runner.calls(),
        [strings(&["get", "pod", "-o", "json", "--namespace", "web"])]
    );
    assert_eq!(session.kind(), "pod");
    assert_eq!(session.objects().len(), 2);
    assert_eq!(session.table().row_count(), 2);
    assert!(session.table().lines[0].text.starts_with("NAME"));
}

#[tokio::test]
async fn test_all_namespaces_adds_namespace_column() {
    let runner = FakeRunner::new().respond_json(list(vec![
        pod("api-1", "web", "Running"),
        pod("db-0", "data", "Running"),
    ]));
    let mut session = session("pod", "all");

    session.refresh(&runner, None, None).await.unwrap();

    assert_eq!(
        runner.calls(),
        [strings(&["get", "pod", "-o", "json", "--all-namespaces"])]
    );
    assert_eq!(session.namespace(), None);
    assert_eq!(session.scope(), NamespaceScope::All);
    assert!(session.table().lines[0].text.starts_with("NAMESPACE"));
    assert_eq!(session.snapshot().namespace_label(), "all");
}

#[tokio::test]
async fn test_cluster_scoped_kind_has_no_namespace_qualifier() {
    let runner = FakeRunner::new().respond_json(list(vec![json!({
        "kind": "Node",
        "metadata": {"name": "node-a"},
        "status": {"conditions": [{"type": "Ready", "status": "True"}]}
    })]));
    let mut session = session("pod", "web");

    session.select_resource(&runner, "nodes").await.unwrap();

    assert_eq!(runner.calls(), [strings(&["get", "node", "-o", "json"])]);
    assert_eq!(session.kind(), "node");
    assert_eq!(session.scope(), NamespaceScope::Cluster);
    assert!(!session.resource_type().has_namespace);
    // The namespace choice survives for when a namespaced kind comes back
    assert_eq!(session.namespace(), Some("web"));
    assert_eq!(session.snapshot().namespace_label(), "-");
    assert!(!session.table().lines[0].text.starts_with("NAMESPACE"));
}

#[tokio::test]
async fn test_failed_refresh_changes_nothing() {
    let runner = FakeRunner::new()
        .respond_json(list(vec![pod("api-1", "web", "Running")]))
        .respond(CommandOutput::failed(1, "error: the server doesn't have a resource type"))
        .respond(CommandOutput::ok("not json"));
    let mut session = session("pod", "web");
    session.refresh(&runner, None, None).await.unwrap();
    let before = session.snapshot();

    let err = session
        .refresh(&runner, Some("deployment"), Some("ops"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Command(_)));
    assert!(err.to_string().contains("exited with status 1"));

    let err = session.select_namespace(&runner, "ops").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidJson { .. }));

    let after = session.snapshot();
    assert_eq!(after.kind, before.kind);
    assert_eq!(after.namespace, before.namespace);
    assert_eq!(after.objects, before.objects);
    assert_eq!(after.table, before.table);
}

#[tokio::test]
async fn test_unknown_kind_runs_nothing() {
    let runner = FakeRunner::new();
    let mut session = session("pod", "web");

    let err = session.select_resource(&runner, "widget").await.unwrap_err();

    assert!(matches!(err, SessionError::Registry(_)));
    assert!(runner.untouched());
    assert_eq!(session.kind(), "pod");
    assert!(StatusSession::new(ResourceRegistry::global(), "widget", "").is_err());
}

#[tokio::test]
async fn test_filter_rerenders_cached_objects() {
    let runner = FakeRunner::new().respond_json(list(vec![
        pod("api-1", "web", "Running"),
        pod("api-2", "web", "Pending"),
        pod("db-0", "web", "Running"),
    ]));
    let mut session = session("pod", "web");
    session.refresh(&runner, None, None).await.unwrap();

    session.set_filter("status:Pending").unwrap();
    assert_eq!(session.table().row_count(), 1);
    assert_eq!(session.selected_object(1).map(|o| o.name.as_str()), Some("api-2"));

    session.set_filter("^db").unwrap();
    assert_eq!(session.selected_object(1).map(|o| o.name.as_str()), Some("db-0"));

    session.set_filter("nothing-matches").unwrap();
    assert!(session.table().is_placeholder());
    assert_eq!(session.selected_object(0), None);

    session.set_filter("  ").unwrap();
    assert!(session.filter().is_none());
    assert_eq!(session.table().row_count(), 3);

    // Filtering never lists again
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_filter_survives_refresh() {
    let runner = FakeRunner::new()
        .respond_json(list(vec![pod("api-1", "web", "Running")]))
        .respond_json(list(vec![
            pod("api-1", "web", "Running"),
            pod("api-9", "web", "Pending"),
        ]));
    let mut session = session("pod", "web");
    session.refresh(&runner, None, None).await.unwrap();
    session.set_filter("status:Pending").unwrap();
    assert!(session.table().is_placeholder());

    session.refresh(&runner, None, None).await.unwrap();

    assert_eq!(session.snapshot().filter.as_deref(), Some("status:Pending"));
    assert_eq!(session.table().row_count(), 1);
}

#[tokio::test]
async fn test_list_namespaces_and_context() {
    let runner = FakeRunner::new()
        .respond_json(list(vec![
            json!({"kind": "Namespace", "metadata": {"name": "default"}}),
            json!({"kind": "Namespace", "metadata": {"name": "kube-system"}}),
        ]))
        .respond(CommandOutput::ok("staging\n"));

    assert_eq!(
        list_namespaces(&runner).await.unwrap(),
        ["default", "kube-system"]
    );
    assert_eq!(current_context(&runner).await.unwrap(), "staging");
    assert_eq!(
        runner.calls(),
        [
            strings(&["get", "namespaces", "-o", "json"]),
            strings(&["config", "current-context"]),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shared_session_refreshes_one_at_a_time() {
    let runner = Arc::new(
        FakeRunner::new()
            .respond_json(list(vec![pod("api-1", "web", "Running")]))
            .respond_json(list(vec![
                pod("api-1", "web", "Running"),
                pod("api-2", "web", "Pending"),
            ]))
            .with_delay(Duration::from_millis(50)),
    );
    let shared = session("pod", "web").into_shared();

    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let shared = shared.clone();
            let runner = runner.clone();
            tokio::spawn(async move {
                shared
                    .lock()
                    .await
                    .refresh(runner.as_ref(), None, None)
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(runner.calls().len(), 2);
    assert_eq!(runner.max_in_flight(), 1);

    // Whichever refresh finished last owns the whole state
    let session = shared.lock().await;
    let names: Vec<&str> = session.objects().iter().map(|o| o.name.as_str()).collect();
    assert!(
        names == ["api-1"] || names == ["api-1", "api-2"],
        "unexpected objects {:?}",
        names
    );
    assert_eq!(session.table().row_count(), names.len());
}
