//! Argument builders for every kubectl invocation the dashboard makes

use std::str::FromStr;

/// Namespace qualifier of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceScope<'a> {
    Named(&'a str),
    All,
    /// Cluster-scoped kind, no qualifier at all
    Cluster,
}

fn strings<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn push_namespace(args: &mut Vec<String>, namespace: Option<&str>) {
    if let Some(ns) = namespace {
        args.push("--namespace".to_string());
        args.push(ns.to_string());
    }
}

/// `get <kind> -o json [--namespace <ns> | --all-namespaces]`
pub fn list_args(kind: &str, scope: NamespaceScope<'_>) -> Vec<String> {
    let mut args = strings(["get", kind, "-o", "json"]);
    match scope {
        NamespaceScope::Named(ns) => push_namespace(&mut args, Some(ns)),
        NamespaceScope::All => args.push("--all-namespaces".to_string()),
        NamespaceScope::Cluster => {}
    }
    args
}

/// `delete [--namespace <ns>] <kind>/<name>`
pub fn delete_args(namespace: Option<&str>, kind: &str, name: &str) -> Vec<String> {
    let mut args = strings(["delete"]);
    push_namespace(&mut args, namespace);
    args.push(format!("{}/{}", kind, name));
    args
}

/// `get [--namespace <ns>] <kind>/<name> -o yaml`
pub fn view_args(namespace: Option<&str>, kind: &str, name: &str) -> Vec<String> {
    let mut args = strings(["get"]);
    push_namespace(&mut args, namespace);
    args.push(format!("{}/{}", kind, name));
    args.extend(strings(["-o", "yaml"]));
    args
}

/// `logs [--namespace <ns>] -c <container> [--tail <n>] [-f] <name>`
pub fn logs_args(
    namespace: Option<&str>,
    container: &str,
    name: &str,
    tail: Option<u32>,
    follow: bool,
) -> Vec<String> {
    let mut args = strings(["logs"]);
    push_namespace(&mut args, namespace);
    args.extend(strings(["-c", container]));
    if let Some(n) = tail {
        args.push("--tail".to_string());
        args.push(n.to_string());
    }
    if follow {
        args.push("-f".to_string());
    }
    args.push(name.to_string());
    args
}

/// `exec -it [--namespace <ns>] -c <container> <name> -- <shell>`
pub fn exec_args(namespace: Option<&str>, container: &str, name: &str, shell: &str) -> Vec<String> {
    let mut args = strings(["exec", "-it"]);
    push_namespace(&mut args, namespace);
    args.extend(strings(["-c", container, name, "--", shell]));
    args
}

/// `config current-context`
pub fn current_context_args() -> Vec<String> {
    strings(["config", "current-context"])
}

/// `get namespaces -o json`
pub fn namespaces_args() -> Vec<String> {
    strings(["get", "namespaces", "-o", "json"])
}

/// Compute Engine instance named by a node's `spec.providerID`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GceInstance {
    pub project: String,
    pub zone: String,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported provider ID: {0}")]
pub struct UnsupportedProvider(pub String);

impl FromStr for GceInstance {
    type Err = UnsupportedProvider;

    /// Parses `gce://<project>/<zone>/<host>`
    fn from_str(provider_id: &str) -> Result<Self, Self::Err> {
        let unsupported = || UnsupportedProvider(provider_id.to_string());
        let rest = provider_id.strip_prefix("gce://").ok_or_else(unsupported)?;
        let parts: Vec<&str> = rest.split('/').collect();
        match parts.as_slice() {
            [project, zone, host] if !zone.is_empty() && !host.is_empty() => Ok(Self {
                project: project.to_string(),
                zone: zone.to_string(),
                host: host.to_string(),
            }),
            _ => Err(unsupported()),
        }
    }
}

/// `compute ssh --zone <zone> <host>`, run through the configured gcloud command
pub fn ssh_args(instance: &GceInstance) -> Vec<String> {
    strings(["compute", "ssh", "--zone", &instance.zone, &instance.host])
}

/// Shell-quoted rendering of an argv for logs and error messages
pub fn display(argv: &[String]) -> String {
    shell_words::join(argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_scopes() {
        assert_eq!(
            list_args("pod", NamespaceScope::Named("web")),
            ["get", "pod", "-o", "json", "--namespace", "web"]
        );
        assert_eq!(
            list_args("pod", NamespaceScope::All),
            ["get", "pod", "-o", "json", "--all-namespaces"]
        );
        assert_eq!(
            list_args("node", NamespaceScope::Cluster),
            ["get", "node", "-o", "json"]
        );
    }

    #[test]
    fn test_object_args() {
        assert_eq!(
            delete_args(Some("web"), "pod", "api-1"),
            ["delete", "--namespace", "web", "pod/api-1"]
        );
        assert_eq!(
            view_args(None, "node", "n1"),
            ["get", "node/n1", "-o", "yaml"]
        );
        assert_eq!(
            logs_args(Some("web"), "app", "api-1", Some(10), true),
            ["logs", "--namespace", "web", "-c", "app", "--tail", "10", "-f", "api-1"]
        );
        assert_eq!(
            exec_args(Some("web"), "app", "api-1", "sh"),
            ["exec", "-it", "--namespace", "web", "-c", "app", "api-1", "--", "sh"]
        );
    }

    #[test]
    fn test_gce_provider_id() {
        let instance: GceInstance = "gce://my-project/us-central1-a/gke-node-1".parse().unwrap();
        assert_eq!(instance.zone, "us-central1-a");
        assert_eq!(
            ssh_args(&instance),
            ["compute", "ssh", "--zone", "us-central1-a", "gke-node-1"]
        );
        assert!("aws:///us-east-1a/i-0abc".parse::<GceInstance>().is_err());
        assert!("gce://project/zone".parse::<GceInstance>().is_err());
    }

    #[test]
    fn test_display_quotes_arguments() {
        let argv = vec!["kubectl".to_string(), "get".to_string(), "a b".to_string()];
        assert_eq!(display(&argv), "kubectl get 'a b'");
    }
}
