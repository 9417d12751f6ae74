//! Status session
//!
//! The dashboard's single source of truth: which resource kind and namespace
//! are shown, the active filter, the last listing and its rendered table.
//! Refreshes are all-or-nothing, a failed listing leaves everything as it was.

use crate::kubectl::args::{self, NamespaceScope};
use crate::kubectl::{run_checked, CommandRunner, KubectlError};
use crate::models::{KubeObject, ObjectList, ParseError};
use crate::registry::{RegistryError, ResourceRegistry, ResourceType};
use crate::table::{render_object_list, FilterExpr, RenderOptions, RenderedTable};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Session handle shared between the UI and background tasks
pub type SharedSession = Arc<Mutex<StatusSession>>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Command(#[from] KubectlError),

    #[error("`{command}` returned invalid JSON: {source}")]
    InvalidJson {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected kubectl output: {0}")]
    Document(#[from] ParseError),

    #[error("invalid filter: {0}")]
    Filter(#[from] regex::Error),
}

/// Treat `""` and `all` as "every namespace"
pub fn normalize_namespace(namespace: &str) -> Option<String> {
    let namespace = namespace.trim();
    if namespace.is_empty() || namespace.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(namespace.to_string())
    }
}

/// Point-in-time copy of what the session shows
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub kind: &'static str,
    pub namespace: Option<String>,
    pub has_namespace: bool,
    pub filter: Option<String>,
    pub objects: ObjectList,
    pub table: RenderedTable,
}

impl SessionSnapshot {
    /// Object rendered on a table line
    pub fn object_at(&self, line: usize) -> Option<&KubeObject> {
        self.table
            .object_at(line)
            .and_then(|index| self.objects.get(index))
    }

    /// Namespace label for headers
    pub fn namespace_label(&self) -> &str {
        match (&self.namespace, self.has_namespace) {
            (_, false) => "-",
            (Some(ns), true) => ns,
            (None, true) => "all",
        }
    }
}

#[derive(Debug)]
pub struct StatusSession {
    registry: &'static ResourceRegistry,
    resource_type: &'static ResourceType,
    namespace: Option<String>,
    filter: Option<FilterExpr>,
    objects: ObjectList,
    table: RenderedTable,
}

impl StatusSession {
    /// Create a session showing `kind` in `namespace` (`""`/`all` for all namespaces).
    /// Nothing is listed until the first [`refresh`](Self::refresh).
    pub fn new(
        registry: &'static ResourceRegistry,
        kind: &str,
        namespace: &str,
    ) -> Result<Self, SessionError> {
        let resource_type = registry.lookup(kind)?;
        let mut session = Self {
            registry,
            resource_type,
            namespace: normalize_namespace(namespace),
            filter: None,
            objects: ObjectList::default(),
            table: RenderedTable::default(),
        };
        session.rerender();
        Ok(session)
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn resource_type(&self) -> &'static ResourceType {
        self.resource_type
    }

    pub fn kind(&self) -> &'static str {
        self.resource_type.kind
    }

    /// Selected namespace, `None` for all namespaces
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn filter(&self) -> Option<&FilterExpr> {
        self.filter.as_ref()
    }

    pub fn objects(&self) -> &ObjectList {
        &self.objects
    }

    pub fn table(&self) -> &RenderedTable {
        &self.table
    }

    /// Namespace qualifier a listing of the current kind uses
    pub fn scope(&self) -> NamespaceScope<'_> {
        scope_for(self.resource_type, self.namespace.as_deref())
    }

    /// List objects and rebuild the table.
    ///
    /// `kind` and `namespace` default to the session's current values. The
    /// session only changes if the listing succeeds and parses.
    pub async fn refresh(
        &mut self,
        runner: &dyn CommandRunner,
        kind: Option<&str>,
        namespace: Option<&str>,
    ) -> Result<(), SessionError> {
        let resource_type = match kind {
            Some(kind) => self.registry.lookup(kind)?,
            None => self.resource_type,
        };
        let namespace = match namespace {
            Some(ns) => normalize_namespace(ns),
            None => self.namespace.clone(),
        };

        let args = args::list_args(
            resource_type.kind,
            scope_for(resource_type, namespace.as_deref()),
        );
        let output = run_checked(runner, &args).await?;
        let document: serde_json::Value =
            serde_json::from_str(&output.stdout).map_err(|source| SessionError::InvalidJson {
                command: args::display(&runner.command_line(&args)),
                source,
            })?;
        let objects = ObjectList::from_document(document)?;

        info!(
            "Listed {} {} object(s) in {}",
            objects.len(),
            resource_type.kind,
            namespace.as_deref().unwrap_or("all namespaces")
        );

        self.resource_type = resource_type;
        self.namespace = namespace;
        self.objects = objects;
        self.rerender();
        Ok(())
    }

    /// Switch namespace (`""` for all) and refresh
    pub async fn select_namespace(
        &mut self,
        runner: &dyn CommandRunner,
        namespace: &str,
    ) -> Result<(), SessionError> {
        self.refresh(runner, None, Some(namespace)).await
    }

    /// Switch resource kind and refresh
    pub async fn select_resource(
        &mut self,
        runner: &dyn CommandRunner,
        kind: &str,
    ) -> Result<(), SessionError> {
        self.refresh(runner, Some(kind), None).await
    }

    /// Replace the filter and re-render the cached objects. Blank clears it.
    pub fn set_filter(&mut self, expr: &str) -> Result<(), SessionError> {
        self.filter = FilterExpr::parse(expr)?;
        debug!(
            "Filter set to {:?}",
            self.filter.as_ref().map(FilterExpr::as_str)
        );
        self.rerender();
        Ok(())
    }

    /// Object behind a rendered line
    pub fn selected_object(&self, line: usize) -> Option<&KubeObject> {
        self.table
            .object_at(line)
            .and_then(|index| self.objects.get(index))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            kind: self.resource_type.kind,
            namespace: self.namespace.clone(),
            has_namespace: self.resource_type.has_namespace,
            filter: self.filter.as_ref().map(|f| f.as_str().to_string()),
            objects: self.objects.clone(),
            table: self.table.clone(),
        }
    }

    fn rerender(&mut self) {
        let options = RenderOptions {
            show_namespace: self.resource_type.has_namespace && self.namespace.is_none(),
            filter: self.filter.as_ref(),
        };
        self.table = render_object_list(self.resource_type, &self.objects, &options);
    }
}

fn scope_for<'a>(resource_type: &ResourceType, namespace: Option<&'a str>) -> NamespaceScope<'a> {
    match (resource_type.has_namespace, namespace) {
        (false, _) => NamespaceScope::Cluster,
        (true, Some(ns)) => NamespaceScope::Named(ns),
        (true, None) => NamespaceScope::All,
    }
}

/// Names of every namespace in the cluster, for the namespace picker
pub async fn list_namespaces(runner: &dyn CommandRunner) -> Result<Vec<String>, SessionError> {
    let args = args::namespaces_args();
    let output = run_checked(runner, &args).await?;
    let document: serde_json::Value =
        serde_json::from_str(&output.stdout).map_err(|source| SessionError::InvalidJson {
            command: args::display(&runner.command_line(&args)),
            source,
        })?;
    let objects = ObjectList::from_document(document)?;
    Ok(objects.iter().map(|ns| ns.name.clone()).collect())
}

/// Name of the kubeconfig context kubectl will talk to
pub async fn current_context(runner: &dyn CommandRunner) -> Result<String, KubectlError> {
    let output = run_checked(runner, &args::current_context_args()).await?;
    Ok(output.stdout.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubectl::{CommandOutput, MockCommandRunner};

    fn pods_json() -> String {
        serde_json::json!({
            "kind": "List",
            "items": [
                {"kind": "Pod", "metadata": {"name": "api-1", "namespace": "web"}},
                {"kind": "Pod", "metadata": {"name": "db-0", "namespace": "data"}}
            ]
        })
        .to_string()
    }

    fn command_line(runner: &mut MockCommandRunner) {
        runner
            .expect_command_line()
            .returning(|args| std::iter::once("kubectl".to_string()).chain(args.iter().cloned()).collect());
    }

    #[test]
    fn test_normalize_namespace() {
        assert_eq!(normalize_namespace(""), None);
        assert_eq!(normalize_namespace("ALL"), None);
        assert_eq!(normalize_namespace(" web "), Some("web".to_string()));
    }

    #[test]
    fn test_new_session_shows_placeholder() {
        let session = StatusSession::new(ResourceRegistry::global(), "po", "web").unwrap();
        assert_eq!(session.kind(), "pod");
        assert!(session.table().is_placeholder());
        assert!(StatusSession::new(ResourceRegistry::global(), "widget", "").is_err());
    }

    #[tokio::test]
    async fn test_refresh_all_namespaces_adds_namespace_column() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|args| {
                assert!(args.iter().any(|a| a == "--all-namespaces"));
                Ok(CommandOutput::ok(pods_json()))
            });
        command_line(&mut runner);

        let mut session = StatusSession::new(ResourceRegistry::global(), "pod", "").unwrap();
        session.refresh(&runner, None, None).await.unwrap();

        assert_eq!(session.objects().len(), 2);
        assert!(session.table().lines[0].text.starts_with("NAMESPACE"));
        assert_eq!(session.selected_object(2).map(|o| o.name.as_str()), Some("db-0"));
    }

    #[tokio::test]
    async fn test_filter_rerenders_without_commands() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(CommandOutput::ok(pods_json())));
        command_line(&mut runner);

        let mut session = StatusSession::new(ResourceRegistry::global(), "pod", "all").unwrap();
        session.refresh(&runner, None, None).await.unwrap();

        session.set_filter("namespace: ^data$").unwrap();
        assert_eq!(session.table().row_count(), 1);
        assert_eq!(session.selected_object(1).map(|o| o.name.as_str()), Some("db-0"));

        session.set_filter("nothing-matches").unwrap();
        assert!(session.table().is_placeholder());

        session.set_filter("").unwrap();
        assert_eq!(session.table().row_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_state() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(CommandOutput::failed(1, "error: the server doesn't have a resource type")));
        command_line(&mut runner);

        let mut session = StatusSession::new(ResourceRegistry::global(), "pod", "web").unwrap();
        let err = session
            .refresh(&runner, Some("svc"), Some("other"))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Command(KubectlError::Failed { .. })));
        assert_eq!(session.kind(), "pod");
        assert_eq!(session.namespace(), Some("web"));
    }

    #[tokio::test]
    async fn test_unknown_kind_issues_no_command() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let mut session = StatusSession::new(ResourceRegistry::global(), "pod", "web").unwrap();
        let err = session.select_resource(&runner, "widget").await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource kind: widget");
    }
}
