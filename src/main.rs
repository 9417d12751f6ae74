//! kubedash - a kubectl-backed terminal dashboard for Kubernetes resources

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kubedash::cli::{self, ConfigSubcommand};
use kubedash::config::{Config, ConfigLoader};
use kubedash::kubectl::KubectlRunner;
use kubedash::registry::ResourceRegistry;
use kubedash::services::{self, ActionContext, ActionDispatcher, ActionSettings, StatusSession};
use std::sync::Arc;

/// kubedash - list, inspect and act on Kubernetes resources through kubectl
#[derive(Parser, Debug)]
#[command(name = "kubedash", version)]
#[command(about = "A kubectl-backed terminal dashboard for Kubernetes resources", long_about = None)]
struct Args {
    /// Namespace to show ("all" for every namespace)
    #[arg(long, short = 'n')]
    namespace: Option<String>,

    /// Resource kind to show (e.g. pod, deploy, svc)
    #[arg(long, short = 'r')]
    resource: Option<String>,

    /// kubeconfig context to use
    #[arg(long)]
    context: Option<String>,

    /// Path to the kubectl binary
    #[arg(long)]
    kubectl: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

impl Args {
    /// Command-line flags win over every configuration layer
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(kubectl) = &self.kubectl {
            config.kubectl.binary = Some(kubectl.clone());
        }
        if let Some(context) = &self.context {
            config.kubectl.context = Some(context.clone());
        }
        if let Some(namespace) = &self.namespace {
            config.default_namespace = namespace.clone();
        }
        if let Some(resource) = &self.resource {
            config.default_resource = resource.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(Command::Config { subcommand }) = args.command {
        return cli::handle_config_command(subcommand);
    }

    let log_file = cli::init_logging(args.debug)?;
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    // The root layer decides which kubectl and context to talk to
    let mut config = ConfigLoader::load(None).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);

    let context = match &config.kubectl.context {
        Some(context) => context.clone(),
        None => {
            let runner = KubectlRunner::from_config(&config.kubectl);
            match services::current_context(&runner).await {
                Ok(context) => context,
                Err(e) => {
                    tracing::warn!("Could not determine current context: {}", e);
                    String::from("unknown")
                }
            }
        }
    };
    tracing::info!("Using context {}", context);

    let mut config = ConfigLoader::load(Some(&context))
        .with_context(|| format!("Failed to load configuration for context {}", context))?;
    args.apply_overrides(&mut config);
    tracing::debug!(
        "Configuration loaded: readOnly={}, namespace={}, resource={}",
        config.read_only,
        config.default_namespace,
        config.default_resource
    );

    let runner = Arc::new(KubectlRunner::from_config(&config.kubectl));
    tracing::debug!("Using kubectl at {}", runner.binary().display());
    let registry = ResourceRegistry::global();
    let session = StatusSession::new(
        registry,
        &config.default_resource,
        &config.default_namespace,
    )
    .with_context(|| format!("Cannot show resource '{}'", config.default_resource))?;

    let settings = ActionSettings::from_config(&config)?;
    let dispatcher = ActionDispatcher::new(registry, ActionContext { runner, settings });

    run(session, dispatcher, context, &config).await
}

#[cfg(feature = "tui")]
async fn run(
    session: StatusSession,
    dispatcher: ActionDispatcher,
    context: String,
    config: &Config,
) -> Result<()> {
    kubedash::tui::run_tui(
        session.into_shared(),
        Arc::new(dispatcher),
        context,
        config,
        kubedash::tui::Theme::default(),
    )
    .await
}

/// Without the terminal UI, print one listing and exit
#[cfg(not(feature = "tui"))]
async fn run(
    mut session: StatusSession,
    dispatcher: ActionDispatcher,
    context: String,
    _config: &Config,
) -> Result<()> {
    session
        .refresh(dispatcher.context().runner.as_ref(), None, None)
        .await
        .with_context(|| format!("Failed to list {} in context {}", session.kind(), context))?;
    println!("{}", session.table().text());
    Ok(())
}
