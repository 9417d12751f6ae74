//! Service layer
//!
//! The status session (what is shown) and the action dispatcher (what can be
//! done to it). Both talk to kubectl through a [`CommandRunner`](crate::kubectl::CommandRunner)
//! and carry no UI dependencies.

pub mod actions;
pub mod status_session;

pub use actions::{
    ActionArgs, ActionContext, ActionDispatcher, ActionError, ActionOutcome, ActionSettings,
    DashboardAction,
};
pub use status_session::{
    current_context, list_namespaces, normalize_namespace, SessionError, SessionSnapshot,
    SharedSession, StatusSession,
};
