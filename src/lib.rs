//! kubedash library
//!
//! A kubectl-backed dashboard for Kubernetes resources: a registry of known
//! resource kinds and their columns, a path extractor for pulling values out
//! of kubectl's JSON, a column-aligned table renderer, the status session that
//! ties listing and rendering together, and the actions that can be run on a
//! selected object. The terminal UI lives behind the `tui` feature.

pub mod cli;
pub mod config;
pub mod extract;
pub mod kubectl;
pub mod models;
pub mod registry;
pub mod services;
pub mod table;
#[cfg(feature = "tui")]
pub mod tui;

pub use kubectl::{CommandOutput, CommandRunner, KubectlRunner, StreamEvent};
pub use models::{KubeObject, ObjectList, OperationKind};
pub use registry::{ResourceRegistry, ResourceType};
pub use services::{ActionDispatcher, ActionOutcome, SessionSnapshot, StatusSession};
