//! Built-in resource table
//!
//! To add a resource kind, append an entry to [`resource_types`] with its
//! aliases, columns, scope and allowed operations.

use super::{ColumnSpec, ResourceType};
use crate::extract::transforms::{
    address_of_type, age, condition_status, count, endpoint_summary, join, object_ref, pluck,
    port_summary, ratio, ready_containers, restart_count,
};
use crate::extract::FormatHint;
use crate::models::OperationKind::{self, Delete, Exec, Logs, ViewDetails};
use crate::table::StyleHint;
use std::collections::BTreeSet;

fn ops(list: &[OperationKind]) -> BTreeSet<OperationKind> {
    list.iter().copied().collect()
}

fn name() -> ColumnSpec {
    ColumnSpec::new("NAME", "metadata.name")
        .style(StyleHint::Name)
        .min_width(4)
}

fn age_column() -> ColumnSpec {
    ColumnSpec::new("AGE", "metadata.creationTimestamp")
        .then(age())
        .right()
        .style(StyleHint::Dim)
}

fn namespaced(
    kind: &'static str,
    aliases: &'static [&'static str],
    columns: Vec<ColumnSpec>,
) -> ResourceType {
    ResourceType {
        kind,
        aliases,
        columns,
        has_namespace: true,
        allowed_ops: ops(&[Delete, ViewDetails]),
    }
}

fn cluster_scoped(
    kind: &'static str,
    aliases: &'static [&'static str],
    columns: Vec<ColumnSpec>,
) -> ResourceType {
    ResourceType {
        has_namespace: false,
        ..namespaced(kind, aliases, columns)
    }
}

pub(super) fn resource_types() -> Vec<ResourceType> {
    vec![
        ResourceType {
            allowed_ops: ops(&[ViewDetails]),
            ..cluster_scoped(
                "componentstatus",
                &["cs", "componentstatuses"],
                vec![
                    name(),
                    ColumnSpec::new("STATUS", "conditions")
                        .then(condition_status("Healthy"))
                        .style(StyleHint::Status),
                    ColumnSpec::new("MESSAGE", "conditions[0].message"),
                    ColumnSpec::new("ERROR", "conditions[0].error"),
                ],
            )
        },
        namespaced(
            "configmap",
            &["cm", "configmaps"],
            vec![
                name(),
                ColumnSpec::new("DATA", "data").then(count()).right(),
                age_column(),
            ],
        ),
        namespaced(
            "cronjob",
            &["cj", "cronjobs"],
            vec![
                name(),
                ColumnSpec::new("SCHEDULE", "spec.schedule"),
                ColumnSpec::new("SUSPEND", "spec.suspend").format(FormatHint::Boolean),
                ColumnSpec::new("ACTIVE", "status.active").then(count()).right(),
                ColumnSpec::new("LAST SCHEDULE", "status.lastScheduleTime").then(age()),
                age_column(),
            ],
        ),
        namespaced(
            "daemonset",
            &["ds", "daemonsets"],
            vec![
                name(),
                ColumnSpec::new("DESIRED", "status.desiredNumberScheduled").right(),
                ColumnSpec::new("CURRENT", "status.currentNumberScheduled").right(),
                ColumnSpec::new("READY", "status.numberReady").right(),
                ColumnSpec::new("UP-TO-DATE", "status.updatedNumberScheduled").right(),
                ColumnSpec::new("AVAILABLE", "status.numberAvailable").right(),
                ColumnSpec::new("NODE SELECTOR", "spec.template.spec.nodeSelector")
                    .format(FormatHint::Map),
                age_column(),
            ],
        ),
        namespaced(
            "deployment",
            &["deploy", "deployments"],
            vec![
                name(),
                ColumnSpec::new("READY", "status")
                    .then(ratio("readyReplicas", "replicas"))
                    .style(StyleHint::Status),
                ColumnSpec::new("UP-TO-DATE", "status.updatedReplicas").right(),
                ColumnSpec::new("AVAILABLE", "status.availableReplicas").right(),
                age_column(),
            ],
        ),
        namespaced(
            "endpoints",
            &["ep", "endpoint"],
            vec![
                name(),
                ColumnSpec::new("ENDPOINTS", "subsets").then(endpoint_summary()),
                age_column(),
            ],
        ),
        namespaced(
            "event",
            &["ev", "events"],
            vec![
                ColumnSpec::new("LAST SEEN", "lastTimestamp").then(age()).right(),
                ColumnSpec::new("TYPE", "type").style(StyleHint::Status),
                ColumnSpec::new("REASON", "reason"),
                ColumnSpec::new("OBJECT", "involvedObject").then(object_ref()),
                ColumnSpec::new("MESSAGE", "message"),
                // Events are addressed by name for view and delete
                ColumnSpec::new("NAME", "metadata.name").style(StyleHint::Dim),
            ],
        ),
        namespaced(
            "horizontalpodautoscaler",
            &["hpa", "horizontalpodautoscalers"],
            vec![
                name(),
                ColumnSpec::new("REFERENCE", "spec.scaleTargetRef").then(object_ref()),
                ColumnSpec::new("MINPODS", "spec.minReplicas").right(),
                ColumnSpec::new("MAXPODS", "spec.maxReplicas").right(),
                ColumnSpec::new("REPLICAS", "status.currentReplicas").right(),
                age_column(),
            ],
        ),
        namespaced(
            "ingress",
            &["ing", "ingresses"],
            vec![
                name(),
                ColumnSpec::new("CLASS", "spec.ingressClassName"),
                ColumnSpec::new("HOSTS", "spec.rules")
                    .then(pluck("host"))
                    .format(FormatHint::List),
                ColumnSpec::new("ADDRESS", "status.loadBalancer.ingress")
                    .then(pluck("ip"))
                    .format(FormatHint::List),
                age_column(),
            ],
        ),
        namespaced(
            "job",
            &["jobs"],
            vec![
                name(),
                ColumnSpec::new("COMPLETIONS", "")
                    .then(ratio("status.succeeded", "spec.completions"))
                    .style(StyleHint::Status),
                ColumnSpec::new("START", "status.startTime").then(age()).right(),
                age_column(),
            ],
        ),
        namespaced(
            "limitrange",
            &["limits", "limitranges"],
            vec![
                name(),
                ColumnSpec::new("LIMITS", "spec.limits")
                    .then(pluck("type"))
                    .format(FormatHint::List),
                age_column(),
            ],
        ),
        cluster_scoped(
            "namespace",
            &["ns", "namespaces"],
            vec![
                name(),
                ColumnSpec::new("STATUS", "status.phase").style(StyleHint::Status),
                age_column(),
            ],
        ),
        namespaced(
            "networkpolicy",
            &["netpol", "networkpolicies"],
            vec![
                name(),
                ColumnSpec::new("POD-SELECTOR", "spec.podSelector.matchLabels")
                    .format(FormatHint::Map),
                ColumnSpec::new("POLICY TYPES", "spec.policyTypes").format(FormatHint::List),
                age_column(),
            ],
        ),
        ResourceType {
            allowed_ops: ops(&[Exec, ViewDetails]),
            ..cluster_scoped(
                "node",
                &["no", "nodes"],
                vec![
                    name(),
                    ColumnSpec::new("READY", "status.conditions")
                        .then(condition_status("Ready"))
                        .style(StyleHint::Status),
                    ColumnSpec::new("INTERNAL-IP", "status.addresses")
                        .then(address_of_type("InternalIP")),
                    ColumnSpec::new("EXTERNAL-IP", "status.addresses")
                        .then(address_of_type("ExternalIP")),
                    ColumnSpec::new("VERSION", "status.nodeInfo.kubeletVersion"),
                    age_column(),
                ],
            )
        },
        cluster_scoped(
            "persistentvolume",
            &["pv", "persistentvolumes"],
            vec![
                name(),
                ColumnSpec::new("CAPACITY", "spec.capacity.storage").right(),
                ColumnSpec::new("ACCESS MODES", "spec.accessModes").format(FormatHint::List),
                ColumnSpec::new("RECLAIM POLICY", "spec.persistentVolumeReclaimPolicy"),
                ColumnSpec::new("STATUS", "status.phase").style(StyleHint::Status),
                ColumnSpec::new("CLAIM", "spec.claimRef").then(object_ref()),
                ColumnSpec::new("STORAGECLASS", "spec.storageClassName"),
                age_column(),
            ],
        ),
        namespaced(
            "persistentvolumeclaim",
            &["pvc", "persistentvolumeclaims"],
            vec![
                name(),
                ColumnSpec::new("STATUS", "status.phase").style(StyleHint::Status),
                ColumnSpec::new("VOLUME", "spec.volumeName"),
                ColumnSpec::new("CAPACITY", "status.capacity.storage").right(),
                ColumnSpec::new("ACCESS MODES", "status.accessModes").format(FormatHint::List),
                ColumnSpec::new("STORAGECLASS", "spec.storageClassName"),
                age_column(),
            ],
        ),
        ResourceType {
            allowed_ops: ops(&[Delete, Exec, ViewDetails, Logs]),
            ..namespaced(
                "pod",
                &["po", "pods"],
                vec![
                    name(),
                    ColumnSpec::new("READY", "status.containerStatuses")
                        .then(ready_containers()),
                    ColumnSpec::new("STATUS", "status.phase").style(StyleHint::Status),
                    ColumnSpec::new("RESTARTS", "status.containerStatuses")
                        .then(restart_count())
                        .right(),
                    ColumnSpec::new("IP", "status.podIP"),
                    ColumnSpec::new("NODE", "spec.nodeName"),
                    age_column(),
                ],
            )
        },
        namespaced(
            "poddisruptionbudget",
            &["pdb", "poddisruptionbudgets"],
            vec![
                name(),
                ColumnSpec::new("MIN AVAILABLE", "spec.minAvailable").right(),
                ColumnSpec::new("MAX UNAVAILABLE", "spec.maxUnavailable").right(),
                ColumnSpec::new("ALLOWED DISRUPTIONS", "status.disruptionsAllowed").right(),
                age_column(),
            ],
        ),
        namespaced(
            "podtemplate",
            &["podtemplates"],
            vec![
                name(),
                ColumnSpec::new("CONTAINERS", "template.spec.containers")
                    .then(pluck("name"))
                    .then(join(",")),
                ColumnSpec::new("IMAGES", "template.spec.containers")
                    .then(pluck("image"))
                    .then(join(",")),
                age_column(),
            ],
        ),
        namespaced(
            "replicaset",
            &["rs", "replicasets"],
            vec![
                name(),
                ColumnSpec::new("DESIRED", "spec.replicas").right(),
                ColumnSpec::new("CURRENT", "status.replicas").right(),
                ColumnSpec::new("READY", "status.readyReplicas").right(),
                age_column(),
            ],
        ),
        namespaced(
            "replicationcontroller",
            &["rc", "replicationcontrollers"],
            vec![
                name(),
                ColumnSpec::new("DESIRED", "spec.replicas").right(),
                ColumnSpec::new("CURRENT", "status.replicas").right(),
                ColumnSpec::new("READY", "status.readyReplicas").right(),
                age_column(),
            ],
        ),
        namespaced(
            "resourcequota",
            &["quota", "resourcequotas"],
            vec![
                name(),
                ColumnSpec::new("HARD", "status.hard").format(FormatHint::Map),
                ColumnSpec::new("USED", "status.used").format(FormatHint::Map),
                age_column(),
            ],
        ),
        namespaced(
            "secret",
            &["secrets"],
            vec![
                name(),
                ColumnSpec::new("TYPE", "type"),
                ColumnSpec::new("DATA", "data").then(count()).right(),
                age_column(),
            ],
        ),
        namespaced(
            "service",
            &["svc", "services"],
            vec![
                name(),
                ColumnSpec::new("TYPE", "spec.type"),
                ColumnSpec::new("CLUSTER-IP", "spec.clusterIP"),
                ColumnSpec::new("EXTERNAL-IP", "status.loadBalancer.ingress")
                    .then(pluck("ip"))
                    .format(FormatHint::List),
                ColumnSpec::new("PORT(S)", "spec.ports").then(port_summary()),
                age_column(),
            ],
        ),
        namespaced(
            "serviceaccount",
            &["sa", "serviceaccounts"],
            vec![
                name(),
                ColumnSpec::new("SECRETS", "secrets").then(count()).right(),
                age_column(),
            ],
        ),
        namespaced(
            "statefulset",
            &["sts", "statefulsets"],
            vec![
                name(),
                ColumnSpec::new("READY", "status")
                    .then(ratio("readyReplicas", "replicas"))
                    .style(StyleHint::Status),
                age_column(),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_has_every_kind_once() {
        let types = resource_types();
        assert_eq!(types.len(), 26);
        let kinds: BTreeSet<_> = types.iter().map(|t| t.kind).collect();
        assert_eq!(kinds.len(), 26);
    }

    #[test]
    fn test_every_kind_has_columns_and_can_be_viewed() {
        for resource_type in resource_types() {
            assert!(!resource_type.columns.is_empty(), "{}", resource_type.kind);
            assert!(resource_type.allows(ViewDetails), "{}", resource_type.kind);
        }
    }
}
