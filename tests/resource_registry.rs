//! Resource registry tests
//!
//! Lookups by kind and alias, scope flags, column layouts and the operations
//! each built-in kind allows.

use kubedash::OperationKind::{Delete, Exec, Logs, ViewDetails};
use kubedash::ResourceRegistry;
use kubedash::registry::RegistryError;

#[test]
fn test_builtin_kinds() {
    let registry = ResourceRegistry::global();

    let expected = [
        "componentstatus",
        "configmap",
        "cronjob",
        "daemonset",
        "deployment",
        "endpoints",
        "event",
        "horizontalpodautoscaler",
        "ingress",
        "job",
        "limitrange",
        "namespace",
        "networkpolicy",
        "node",
        "persistentvolume",
        "persistentvolumeclaim",
        "pod",
        "poddisruptionbudget",
        "podtemplate",
        "replicaset",
        "replicationcontroller",
        "resourcequota",
        "secret",
        "service",
        "serviceaccount",
        "statefulset",
    ];

    let kinds = registry.kinds();
    assert_eq!(kinds.len(), expected.len());
    for kind in expected {
        assert!(kinds.contains(kind), "{} should be registered", kind);
    }
}

#[test]
fn test_lookup_by_alias_ignores_case_and_whitespace() {
    let registry = ResourceRegistry::global();

    assert_eq!(registry.lookup("pod").unwrap().kind, "pod");
    assert_eq!(registry.lookup(" PO ").unwrap().kind, "pod");
    assert_eq!(registry.lookup("Pods").unwrap().kind, "pod");
    assert_eq!(registry.lookup("deploy").unwrap().kind, "deployment");
    assert_eq!(registry.lookup("svc").unwrap().kind, "service");
    assert_eq!(registry.lookup("endpoint").unwrap().kind, "endpoints");
}

#[test]
fn test_unknown_kind() {
    let registry = ResourceRegistry::global();

    let err = registry.lookup(" widget ").unwrap_err();
    assert_eq!(err, RegistryError::UnknownKind("widget".to_string()));
    assert_eq!(err.to_string(), "Unknown resource kind: widget");
}

#[test]
fn test_every_kind_has_a_name_column() {
    for resource_type in ResourceRegistry::global().iter() {
        assert!(
            resource_type.column("NAME").is_some(),
            "{} should have a NAME column",
            resource_type.kind
        );
        assert!(
            resource_type.allows(ViewDetails),
            "{} should allow viewing details",
            resource_type.kind
        );
    }
}

#[test]
fn test_events_lead_with_last_seen() {
    let event = ResourceRegistry::global().lookup("ev").unwrap();

    assert_eq!(event.headers().first(), Some(&"LAST SEEN"));
    assert_eq!(event.headers().last(), Some(&"NAME"));
}

#[test]
fn test_pod_layout() {
    let pod = ResourceRegistry::global().lookup("pod").unwrap();

    assert!(pod.has_namespace);
    assert_eq!(
        pod.headers(),
        ["NAME", "READY", "STATUS", "RESTARTS", "IP", "NODE", "AGE"]
    );
    assert!(pod.column("restarts").is_some());
    assert!(pod.column("missing").is_none());
}

#[test]
fn test_cluster_scoped_kinds() {
    let registry = ResourceRegistry::global();

    for kind in ["node", "namespace", "persistentvolume", "componentstatus"] {
        assert!(
            !registry.lookup(kind).unwrap().has_namespace,
            "{} should be cluster-scoped",
            kind
        );
    }
    for kind in ["pod", "service", "configmap", "persistentvolumeclaim"] {
        assert!(
            registry.lookup(kind).unwrap().has_namespace,
            "{} should be namespaced",
            kind
        );
    }
}

#[test]
fn test_allowed_operations() {
    let registry = ResourceRegistry::global();

    assert!(registry.is_operation_allowed("pod", Logs));
    assert!(registry.is_operation_allowed("po", Exec));
    assert!(registry.is_operation_allowed("pod", Delete));
    assert!(registry.is_operation_allowed("node", Exec));
    assert!(!registry.is_operation_allowed("node", Delete));
    assert!(!registry.is_operation_allowed("deployment", Logs));
    assert!(!registry.is_operation_allowed("componentstatus", Delete));
    assert!(registry.is_operation_allowed("componentstatus", ViewDetails));
    assert!(!registry.is_operation_allowed("widget", ViewDetails));
}
