//! Application state structures
//!
//! State sub-structures that organize the App's fields into logical groupings.

use crate::kubectl::StreamEvent;
use crate::models::KubeObject;
use crate::services::{ActionArgs, ActionOutcome, SessionSnapshot};
use std::collections::VecDeque;
use tokio::sync::{mpsc, oneshot};

/// View types for the application
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum View {
    ResourceTable,
    Detail,
}

/// What a text prompt is collecting
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PromptKind {
    Namespace,
    Resource,
    Filter,
    Tail,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::Namespace => "namespace",
            PromptKind::Resource => "resource",
            PromptKind::Filter => "filter",
            PromptKind::Tail => "tail lines",
        }
    }
}

/// Single-line text input
#[derive(Clone, Debug)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

impl Prompt {
    pub fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        Self {
            kind,
            buffer: initial.into(),
        }
    }
}

/// What a picker chooses
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PickerKind {
    Namespace,
    Container,
}

/// Selection from a short list
#[derive(Clone, Debug)]
pub struct Picker {
    pub kind: PickerKind,
    pub title: String,
    pub items: Vec<String>,
    pub selected: usize,
}

impl Picker {
    pub fn new(kind: PickerKind, title: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            items,
            selected: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    pub fn move_by(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }
}

/// Action collecting its arguments before dispatch
#[derive(Clone, Debug)]
pub struct PendingAction {
    pub key: char,
    pub object: KubeObject,
    pub args: ActionArgs,
    pub confirmed: bool,
}

impl PendingAction {
    pub fn new(key: char, object: KubeObject) -> Self {
        Self {
            key,
            object,
            args: ActionArgs::default(),
            confirmed: false,
        }
    }
}

/// Read-only text shown in the detail view
#[derive(Debug, Default)]
pub struct DetailContent {
    pub title: String,
    pub lines: Vec<String>,
    /// Receiving streamed output
    pub live: bool,
}

impl DetailContent {
    pub fn new(title: impl Into<String>, content: &str) -> Self {
        Self {
            title: title.into(),
            lines: content.lines().map(str::to_string).collect(),
            live: false,
        }
    }
}

/// View-related state (navigation, scrolling)
#[derive(Debug)]
pub struct ViewState {
    /// Current view being displayed
    pub current_view: View,
    /// Selected data row, counted from the first row
    pub selected_row: usize,
    /// Scroll offset for the resource table
    pub scroll_offset: usize,
    /// Scroll offset for the detail view
    pub detail_scroll_offset: usize,
    /// Detail view follows appended lines
    pub detail_follow: bool,
    pub detail: DetailContent,
    /// Cached page size for PageUp/PageDown navigation
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_view: View::ResourceTable,
            selected_row: 0,
            scroll_offset: 0,
            detail_scroll_offset: 0,
            detail_follow: true,
            detail: DetailContent::default(),
            page_size: 10,
        }
    }
}

/// Action awaiting y/n
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub pending: PendingAction,
    pub message: String,
}

/// UI-related state (overlays, status line)
#[derive(Debug, Default)]
pub struct UIState {
    pub show_help: bool,
    pub prompt: Option<Prompt>,
    pub picker: Option<Picker>,
    pub confirmation: Option<Confirmation>,
    /// Action waiting on the picker or a prompt for its arguments
    pub pending_action: Option<PendingAction>,
    /// Status message to display (message, is_error)
    pub status_message: Option<(String, bool)>,
    /// When status message was set (for auto-clearing)
    pub status_message_time: Option<std::time::Instant>,
}

/// Work the run loop should start
#[derive(Debug)]
pub enum Request {
    Refresh {
        kind: Option<String>,
        namespace: Option<String>,
    },
    Filter(String),
    Namespaces,
    Action(PendingAction),
    /// Run with the terminal handed over, UI suspended
    Interactive {
        description: String,
        argv: Vec<String>,
    },
}

pub type SessionResult = Result<SessionSnapshot, String>;
pub type ActionResult = Result<ActionOutcome, String>;
pub type NamespacesResult = Result<Vec<String>, String>;

/// Async operation state (queued requests and their result channels)
#[derive(Debug, Default)]
pub struct AsyncOperationState {
    pub requests: VecDeque<Request>,
    pub session_rx: Option<oneshot::Receiver<SessionResult>>,
    pub action_rx: Option<oneshot::Receiver<ActionResult>>,
    pub namespaces_rx: Option<oneshot::Receiver<NamespacesResult>>,
    pub stream_rx: Option<mpsc::UnboundedReceiver<StreamEvent>>,
    /// Refresh once the current action completes
    pub refresh_after_action: bool,
}

impl AsyncOperationState {
    /// A listing or action is running; other work is rejected
    pub fn is_busy(&self) -> bool {
        self.session_rx.is_some() || self.action_rx.is_some() || self.namespaces_rx.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_movement_is_clamped() {
        let mut picker = Picker::new(
            PickerKind::Container,
            "Container",
            vec!["app".to_string(), "sidecar".to_string()],
        );
        picker.move_by(-1);
        assert_eq!(picker.current(), Some("app"));
        picker.move_by(5);
        assert_eq!(picker.current(), Some("sidecar"));
    }

    #[test]
    fn test_detail_content_splits_lines() {
        let detail = DetailContent::new("pod/web", "a: 1\nb: 2\n");
        assert_eq!(detail.lines, ["a: 1", "b: 2"]);
        assert!(!detail.live);
    }
}
