//! kubectl process plumbing
//!
//! Everything the dashboard knows about the cluster comes from running the
//! `kubectl` binary. [`CommandRunner`] is the seam: the real implementation
//! spawns processes with `tokio::process`, tests substitute a recording fake.

pub mod args;

use crate::config::KubectlConfig;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// stdout followed by stderr, as a terminal would show them
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Output of a long-running streamed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Line(String),
    /// stderr output or a read failure
    Error(String),
    Exited(Option<i32>),
}

#[derive(Debug, thiserror::Error)]
pub enum KubectlError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {}:\n{output}", display_status(.status))]
    Failed {
        command: String,
        status: Option<i32>,
        output: String,
    },

    #[error("empty command line")]
    EmptyCommand,
}

fn display_status(status: &Option<i32>) -> String {
    status.map_or_else(|| "unknown".to_string(), |code| code.to_string())
}

/// Runs kubectl (and terminal launchers) on behalf of the dashboard
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run kubectl with `args` to completion and capture its output.
    /// A non-zero exit is not an error at this level.
    async fn run(&self, args: &[String]) -> Result<CommandOutput, KubectlError>;

    /// Start kubectl with `args` and stream its output line by line.
    /// Dropping the receiver stops the process.
    fn stream(&self, args: &[String]) -> Result<mpsc::UnboundedReceiver<StreamEvent>, KubectlError>;

    /// Start an arbitrary program detached from the dashboard
    fn launch(&self, argv: &[String]) -> Result<(), KubectlError>;

    /// Full argv kubectl would be started with, including global flags
    fn command_line(&self, args: &[String]) -> Vec<String>;
}

/// Run a command and turn a non-zero exit into [`KubectlError::Failed`]
pub async fn run_checked(
    runner: &dyn CommandRunner,
    args: &[String],
) -> Result<CommandOutput, KubectlError> {
    let output = runner.run(args).await?;
    if output.success {
        return Ok(output);
    }
    Err(KubectlError::Failed {
        command: args::display(&runner.command_line(args)),
        status: output.status,
        output: output.combined(),
    })
}

/// [`CommandRunner`] backed by a real kubectl binary
#[derive(Debug, Clone)]
pub struct KubectlRunner {
    binary: PathBuf,
    global_args: Vec<String>,
}

impl KubectlRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            global_args: Vec::new(),
        }
    }

    /// Resolve the binary (configured name or `kubectl`) on `PATH` and apply
    /// the configured context and kubeconfig as global flags
    pub fn from_config(config: &KubectlConfig) -> Self {
        let name = config.binary.as_deref().unwrap_or("kubectl");
        let binary = which::which(name).unwrap_or_else(|e| {
            warn!("Could not resolve {} on PATH ({}), using it as-is", name, e);
            PathBuf::from(name)
        });

        let mut runner = Self::new(binary);
        if let Some(context) = config.context.as_deref().filter(|c| !c.is_empty()) {
            runner.global_args.push(format!("--context={}", context));
        }
        if let Some(kubeconfig) = config.kubeconfig.as_deref().filter(|k| !k.is_empty()) {
            runner.global_args.push(format!("--kubeconfig={}", kubeconfig));
        }
        runner
    }

    pub fn binary(&self) -> &std::path::Path {
        &self.binary
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.binary);
        command.args(&self.global_args).args(args).stdin(Stdio::null());
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> KubectlError {
        KubectlError::Spawn {
            program: self.binary.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl CommandRunner for KubectlRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput, KubectlError> {
        debug!("Running {}", args::display(&self.command_line(args)));
        let output = self
            .command(args)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        Ok(CommandOutput {
            status: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn stream(&self, args: &[String]) -> Result<mpsc::UnboundedReceiver<StreamEvent>, KubectlError> {
        debug!("Streaming {}", args::display(&self.command_line(args)));
        let mut child = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let (tx, rx) = mpsc::unbounded_channel();

        if let Some(stderr) = child.stderr.take() {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tx.send(StreamEvent::Error(line)).is_err() {
                        break;
                    }
                }
            });
        }

        let stdout = child.stdout.take();
        tokio::spawn(async move {
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                loop {
                    tokio::select! {
                        _ = tx.closed() => {
                            debug!("Stream view closed, stopping process");
                            return;
                        }
                        line = lines.next_line() => match line {
                            Ok(Some(line)) => {
                                let _ = tx.send(StreamEvent::Line(line));
                            }
                            Ok(None) => break,
                            Err(e) => {
                                let _ = tx.send(StreamEvent::Error(e.to_string()));
                                break;
                            }
                        }
                    }
                }
            }

            let status = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    warn!("Failed to wait for streamed process: {}", e);
                    None
                }
            };
            let _ = tx.send(StreamEvent::Exited(status));
        });

        Ok(rx)
    }

    fn launch(&self, argv: &[String]) -> Result<(), KubectlError> {
        let (program, rest) = argv.split_first().ok_or(KubectlError::EmptyCommand)?;
        debug!("Launching {}", args::display(argv));
        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| KubectlError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Reap the child so it does not linger as a zombie
        tokio::spawn(async move {
            if let Err(e) = child.wait().await {
                warn!("Launched process failed: {}", e);
            }
        });
        Ok(())
    }

    fn command_line(&self, args: &[String]) -> Vec<String> {
        std::iter::once(self.binary.display().to_string())
            .chain(self.global_args.iter().cloned())
            .chain(args.iter().cloned())
            .collect()
    }
}
