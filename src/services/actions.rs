//! Action dispatch
//!
//! Keyboard-triggered operations on the selected object. Actions are trait
//! objects in an [`ActionRegistry`] keyed by their keybinding; the
//! [`ActionDispatcher`] checks the object's resource type allows the
//! operation before anything is run.

use crate::config::Config;
use crate::kubectl::args::{self, GceInstance, UnsupportedProvider};
use crate::kubectl::{run_checked, CommandRunner, KubectlError, StreamEvent};
use crate::models::{KubeObject, OperationKind};
use crate::registry::ResourceRegistry;
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Command(#[from] KubectlError),

    #[error("{0} has no containers")]
    NoContainers(String),

    #[error("{object} has no spec.providerID")]
    MissingProviderId { object: String },

    #[error(transparent)]
    Provider(#[from] UnsupportedProvider),
}

/// What an action produced, for the UI to present
#[derive(Debug)]
pub enum ActionOutcome {
    Deleted { target: String },
    /// Read-only text such as YAML or a log tail
    Detail { title: String, content: String },
    /// Live output, ends with [`StreamEvent::Exited`]
    Stream {
        title: String,
        events: mpsc::UnboundedReceiver<StreamEvent>,
    },
    /// Started in a separate terminal window
    Launched { description: String },
    /// Must run in the dashboard's own terminal, with the UI suspended
    Interactive {
        description: String,
        argv: Vec<String>,
    },
    /// Nothing was run
    NotSupported(String),
}

/// Per-invocation choices made by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionArgs {
    pub container: Option<String>,
    pub tail: Option<u32>,
}

/// Settings actions read from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSettings {
    pub log_tail: u32,
    pub stream_tail: u32,
    /// Terminal emulator prefix, empty for the dashboard's own terminal
    pub terminal: Vec<String>,
    pub shell: String,
    pub ssh_command: Vec<String>,
    pub read_only: bool,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            log_tail: 1000,
            stream_tail: 10,
            terminal: Vec::new(),
            shell: "sh".to_string(),
            ssh_command: vec!["gcloud".to_string()],
            read_only: false,
        }
    }
}

impl ActionSettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let ssh_command = shell_words::split(&config.terminal.ssh_command)
            .context("terminal.sshCommand is not a valid command line")?;
        anyhow::ensure!(!ssh_command.is_empty(), "terminal.sshCommand must not be empty");

        Ok(Self {
            log_tail: config.logger.tail,
            stream_tail: config.logger.stream_tail,
            terminal: shell_words::split(&config.terminal.command)
                .context("terminal.command is not a valid command line")?,
            shell: config.terminal.shell.clone(),
            ssh_command,
            read_only: config.read_only,
        })
    }
}

/// Everything an action needs to run
#[derive(Clone)]
pub struct ActionContext {
    pub runner: Arc<dyn CommandRunner>,
    pub settings: ActionSettings,
}

/// Container names of a pod, from its status or, before it has one, its spec
pub fn container_names(object: &KubeObject) -> Vec<String> {
    let names = |pointer: &str| -> Vec<String> {
        object
            .raw
            .pointer(pointer)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("name").and_then(|n| n.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    let from_status = names("/status/containerStatuses");
    if from_status.is_empty() {
        names("/spec/containers")
    } else {
        from_status
    }
}

fn resolve_container(object: &KubeObject, args: &ActionArgs) -> Result<String, ActionError> {
    if let Some(container) = &args.container {
        return Ok(container.clone());
    }
    container_names(object)
        .into_iter()
        .next()
        .ok_or_else(|| ActionError::NoContainers(object.display_name()))
}

/// Operation triggered from the resource table
#[async_trait]
pub trait DashboardAction: Send + Sync {
    /// Operation the resource type must allow
    fn operation(&self) -> OperationKind;

    fn keybinding(&self) -> char;

    /// Human-readable name for this action
    fn name(&self) -> &'static str;

    fn requires_confirmation(&self) -> bool {
        false
    }

    fn confirmation_message(&self, object: &KubeObject) -> String {
        format!("{} {}?", self.name(), object.display_name())
    }

    /// Whether the UI should let the user pick a container first
    fn needs_container(&self, object: &KubeObject) -> bool {
        let _ = object;
        false
    }

    /// Whether the UI should ask for a tail line count first
    fn prompts_for_tail(&self) -> bool {
        false
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        object: &KubeObject,
        args: &ActionArgs,
    ) -> Result<ActionOutcome, ActionError>;
}

/// `delete [--namespace ns] kind/name`
pub struct DeleteAction;

#[async_trait]
impl DashboardAction for DeleteAction {
    fn operation(&self) -> OperationKind {
        OperationKind::Delete
    }

    fn keybinding(&self) -> char {
        'd'
    }

    fn name(&self) -> &'static str {
        "Delete"
    }

    fn requires_confirmation(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        object: &KubeObject,
        _args: &ActionArgs,
    ) -> Result<ActionOutcome, ActionError> {
        let args = args::delete_args(object.namespace.as_deref(), &object.kind, &object.name);
        run_checked(ctx.runner.as_ref(), &args).await?;
        info!("Deleted {}", object.display_name());
        Ok(ActionOutcome::Deleted {
            target: object.display_name(),
        })
    }
}

/// `get [--namespace ns] kind/name -o yaml`
pub struct ViewDetailsAction;

#[async_trait]
impl DashboardAction for ViewDetailsAction {
    fn operation(&self) -> OperationKind {
        OperationKind::ViewDetails
    }

    fn keybinding(&self) -> char {
        'v'
    }

    fn name(&self) -> &'static str {
        "View"
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        object: &KubeObject,
        _args: &ActionArgs,
    ) -> Result<ActionOutcome, ActionError> {
        let args = args::view_args(object.namespace.as_deref(), &object.kind, &object.name);
        let output = run_checked(ctx.runner.as_ref(), &args).await?;
        Ok(ActionOutcome::Detail {
            title: object.qualified_name(),
            content: output.stdout,
        })
    }
}

/// Log tail of one container, shown once fetched
pub struct ShowLogsAction {
    prompted: bool,
}

impl ShowLogsAction {
    /// Tail length from configuration
    pub fn configured() -> Self {
        Self { prompted: false }
    }

    /// Tail length asked from the user
    pub fn prompted() -> Self {
        Self { prompted: true }
    }
}

#[async_trait]
impl DashboardAction for ShowLogsAction {
    fn operation(&self) -> OperationKind {
        OperationKind::Logs
    }

    fn keybinding(&self) -> char {
        if self.prompted { 'L' } else { 'l' }
    }

    fn name(&self) -> &'static str {
        "Logs"
    }

    fn needs_container(&self, object: &KubeObject) -> bool {
        container_names(object).len() > 1
    }

    fn prompts_for_tail(&self) -> bool {
        self.prompted
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        object: &KubeObject,
        args: &ActionArgs,
    ) -> Result<ActionOutcome, ActionError> {
        let container = resolve_container(object, args)?;
        let tail = args.tail.unwrap_or(ctx.settings.log_tail);
        let command = args::logs_args(
            object.namespace.as_deref(),
            &container,
            &object.name,
            Some(tail),
            false,
        );
        // kubectl's own error text is shown in the view rather than failing
        let output = ctx.runner.run(&command).await?;
        if !output.success {
            debug!("Logs for {} exited with {:?}", object.name, output.status);
        }
        Ok(ActionOutcome::Detail {
            title: format!("logs {} [{}]", object.qualified_name(), container),
            content: output.combined(),
        })
    }
}

/// Follow a container's log, streaming into a live view
pub struct StreamLogsAction;

#[async_trait]
impl DashboardAction for StreamLogsAction {
    fn operation(&self) -> OperationKind {
        OperationKind::Logs
    }

    fn keybinding(&self) -> char {
        'f'
    }

    fn name(&self) -> &'static str {
        "Follow logs"
    }

    fn needs_container(&self, object: &KubeObject) -> bool {
        container_names(object).len() > 1
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        object: &KubeObject,
        args: &ActionArgs,
    ) -> Result<ActionOutcome, ActionError> {
        let container = resolve_container(object, args)?;
        let command = args::logs_args(
            object.namespace.as_deref(),
            &container,
            &object.name,
            Some(ctx.settings.stream_tail),
            true,
        );
        let events = ctx.runner.stream(&command)?;
        Ok(ActionOutcome::Stream {
            title: format!("logs -f {} [{}]", object.qualified_name(), container),
            events,
        })
    }
}

/// Shell into a pod container or ssh into a node
pub struct LaunchTerminalAction;

impl LaunchTerminalAction {
    fn pod_command(
        ctx: &ActionContext,
        object: &KubeObject,
        args: &ActionArgs,
    ) -> Result<(String, Vec<String>), ActionError> {
        let container = resolve_container(object, args)?;
        let command = args::exec_args(
            object.namespace.as_deref(),
            &container,
            &object.name,
            &ctx.settings.shell,
        );
        Ok((
            format!("exec into {} [{}]", object.qualified_name(), container),
            ctx.runner.command_line(&command),
        ))
    }

    fn node_command(
        ctx: &ActionContext,
        object: &KubeObject,
    ) -> Result<(String, Vec<String>), ActionError> {
        let provider_id = object
            .raw
            .pointer("/spec/providerID")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ActionError::MissingProviderId {
                object: object.qualified_name(),
            })?;
        let instance: GceInstance = provider_id.parse()?;
        let argv = ctx
            .settings
            .ssh_command
            .iter()
            .cloned()
            .chain(args::ssh_args(&instance))
            .collect();
        Ok((format!("ssh to {}", instance.host), argv))
    }
}

#[async_trait]
impl DashboardAction for LaunchTerminalAction {
    fn operation(&self) -> OperationKind {
        OperationKind::Exec
    }

    fn keybinding(&self) -> char {
        'x'
    }

    fn name(&self) -> &'static str {
        "Exec"
    }

    fn needs_container(&self, object: &KubeObject) -> bool {
        object.kind == "pod" && container_names(object).len() > 1
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        object: &KubeObject,
        args: &ActionArgs,
    ) -> Result<ActionOutcome, ActionError> {
        let (description, argv) = match object.kind.as_str() {
            "pod" => Self::pod_command(ctx, object, args)?,
            "node" => Self::node_command(ctx, object)?,
            other => {
                return Ok(ActionOutcome::NotSupported(format!(
                    "Exec is not supported for {}",
                    other
                )));
            }
        };

        if ctx.settings.terminal.is_empty() {
            return Ok(ActionOutcome::Interactive { description, argv });
        }

        let full: Vec<String> = ctx.settings.terminal.iter().cloned().chain(argv).collect();
        ctx.runner.launch(&full)?;
        info!("Launched {}", args::display(&full));
        Ok(ActionOutcome::Launched { description })
    }
}

/// Actions keyed by keybinding
pub struct ActionRegistry {
    actions: Vec<Box<dyn DashboardAction>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            actions: Vec::new(),
        };

        registry.register(Box::new(DeleteAction));
        registry.register(Box::new(ViewDetailsAction));
        registry.register(Box::new(ShowLogsAction::configured()));
        registry.register(Box::new(ShowLogsAction::prompted()));
        registry.register(Box::new(StreamLogsAction));
        registry.register(Box::new(LaunchTerminalAction));

        registry
    }

    pub fn register(&mut self, action: Box<dyn DashboardAction>) {
        self.actions.push(action);
    }

    pub fn get_by_keybinding(&self, key: char) -> Option<&dyn DashboardAction> {
        self.actions
            .iter()
            .find(|action| action.keybinding() == key)
            .map(|action| action.as_ref())
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates and runs actions on selected objects
pub struct ActionDispatcher {
    registry: &'static ResourceRegistry,
    actions: ActionRegistry,
    ctx: ActionContext,
}

impl ActionDispatcher {
    pub fn new(registry: &'static ResourceRegistry, ctx: ActionContext) -> Self {
        Self {
            registry,
            actions: ActionRegistry::new(),
            ctx,
        }
    }

    pub fn context(&self) -> &ActionContext {
        &self.ctx
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Resolve the action bound to `key` and check it may run on `object`.
    /// The error is a notice for the status line.
    pub fn check(
        &self,
        key: char,
        object: Option<&KubeObject>,
    ) -> Result<&dyn DashboardAction, String> {
        let action = self
            .actions
            .get_by_keybinding(key)
            .ok_or_else(|| format!("No action bound to '{}'", key))?;
        let object = object.ok_or_else(|| "No object selected".to_string())?;

        if action.operation() == OperationKind::Delete && self.ctx.settings.read_only {
            return Err("Read-only mode: delete is disabled".to_string());
        }
        if !self
            .registry
            .is_operation_allowed(&object.kind, action.operation())
        {
            return Err(format!(
                "{} is not supported for {}",
                action.name(),
                object.kind
            ));
        }
        Ok(action)
    }

    /// Run the action bound to `key` on `object`.
    ///
    /// A disallowed or unknown action yields [`ActionOutcome::NotSupported`]
    /// without running any command.
    pub async fn dispatch(
        &self,
        key: char,
        object: Option<&KubeObject>,
        args: &ActionArgs,
    ) -> Result<ActionOutcome, ActionError> {
        let action = match self.check(key, object) {
            Ok(action) => action,
            Err(notice) => {
                debug!("Action '{}' rejected: {}", key, notice);
                return Ok(ActionOutcome::NotSupported(notice));
            }
        };
        let Some(object) = object else {
            return Ok(ActionOutcome::NotSupported("No object selected".to_string()));
        };
        debug!("Dispatching {} on {}", action.name(), object.display_name());
        action.execute(&self.ctx, object, args).await
    }
}
