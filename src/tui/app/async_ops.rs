//! Async operation management
//!
//! Queued [`Request`]s become [`Job`]s carrying a result channel; the run loop
//! spawns them and the app polls the receivers with `try_recv` every tick.

use super::core::App;
use super::state::{
    ActionResult, DetailContent, NamespacesResult, PendingAction, Picker, PickerKind, Request,
    SessionResult,
};
use crate::kubectl::StreamEvent;
use crate::services::ActionOutcome;
use crate::tui::constants::MAX_STREAM_LINES;
use tokio::sync::mpsc::error::TryRecvError as StreamTryRecvError;
use tokio::sync::oneshot;

/// Work for the run loop to spawn
pub enum Job {
    Refresh {
        kind: Option<String>,
        namespace: Option<String>,
        tx: oneshot::Sender<SessionResult>,
    },
    Filter {
        expr: String,
        tx: oneshot::Sender<SessionResult>,
    },
    Namespaces {
        tx: oneshot::Sender<NamespacesResult>,
    },
    Action {
        pending: PendingAction,
        tx: oneshot::Sender<ActionResult>,
    },
    /// Run in the foreground with the UI suspended
    Interactive {
        description: String,
        argv: Vec<String>,
    },
}

/// Take a finished result out of `slot`, if there is one
fn poll_channel<T>(
    slot: &mut Option<oneshot::Receiver<Result<T, String>>>,
    what: &str,
) -> Option<Result<T, String>> {
    let rx = slot.as_mut()?;
    match rx.try_recv() {
        Ok(result) => {
            *slot = None;
            Some(result)
        }
        Err(oneshot::error::TryRecvError::Empty) => None,
        Err(oneshot::error::TryRecvError::Closed) => {
            *slot = None;
            Some(Err(format!("{} task ended without a result", what)))
        }
    }
}

impl App {
    /// Next queued job, wiring its result channel into the app
    pub fn next_job(&mut self) -> Option<Job> {
        let request = self.async_state.requests.pop_front()?;
        let job = match request {
            Request::Refresh { kind, namespace } => {
                let (tx, rx) = oneshot::channel();
                self.async_state.session_rx = Some(rx);
                Job::Refresh { kind, namespace, tx }
            }
            Request::Filter(expr) => {
                let (tx, rx) = oneshot::channel();
                self.async_state.session_rx = Some(rx);
                Job::Filter { expr, tx }
            }
            Request::Namespaces => {
                let (tx, rx) = oneshot::channel();
                self.async_state.namespaces_rx = Some(rx);
                Job::Namespaces { tx }
            }
            Request::Action(pending) => {
                let (tx, rx) = oneshot::channel();
                self.async_state.action_rx = Some(rx);
                Job::Action { pending, tx }
            }
            Request::Interactive { description, argv } => Job::Interactive { description, argv },
        };
        Some(job)
    }

    /// Apply every finished result. Returns true when something changed.
    pub fn poll_async(&mut self) -> bool {
        let mut changed = false;

        if let Some(result) = poll_channel(&mut self.async_state.session_rx, "Refresh") {
            self.apply_session_result(result);
            changed = true;
        }
        if let Some(result) = poll_channel(&mut self.async_state.namespaces_rx, "Namespace listing")
        {
            self.apply_namespaces_result(result);
            changed = true;
        }
        if let Some(result) = poll_channel(&mut self.async_state.action_rx, "Action") {
            self.apply_action_result(result);
            changed = true;
        }
        changed |= self.drain_stream();

        changed
    }

    pub(crate) fn apply_session_result(&mut self, result: SessionResult) {
        match result {
            Ok(snapshot) => {
                tracing::debug!(
                    "Showing {} {} row(s)",
                    snapshot.table.row_count(),
                    snapshot.kind
                );
                self.set_snapshot(snapshot);
            }
            Err(e) => self.report_error("Refresh", &e),
        }
    }

    pub(crate) fn apply_namespaces_result(&mut self, result: NamespacesResult) {
        match result {
            Ok(namespaces) => {
                let items: Vec<String> = std::iter::once("all".to_string())
                    .chain(namespaces)
                    .collect();
                let mut picker = Picker::new(PickerKind::Namespace, "Namespace", items);
                if let Some(current) = &self.snapshot.namespace {
                    picker.selected = picker
                        .items
                        .iter()
                        .position(|ns| ns == current)
                        .unwrap_or(0);
                }
                self.ui_state.picker = Some(picker);
            }
            Err(e) => {
                // Typing a name still works without list permissions
                self.report_error("Listing namespaces", &e);
                self.open_prompt(super::state::PromptKind::Namespace);
            }
        }
    }

    pub(crate) fn apply_action_result(&mut self, result: ActionResult) {
        let refresh = std::mem::take(&mut self.async_state.refresh_after_action);
        match result {
            Ok(ActionOutcome::Deleted { target }) => {
                self.set_status_message((format!("Deleted {}", target), false));
                if refresh {
                    self.request_refresh(None, None);
                }
            }
            Ok(ActionOutcome::Detail { title, content }) => {
                self.show_detail(DetailContent::new(title, &content));
            }
            Ok(ActionOutcome::Stream { title, events }) => {
                let mut detail = DetailContent::new(title, "");
                detail.live = true;
                self.show_detail(detail);
                self.async_state.stream_rx = Some(events);
            }
            Ok(ActionOutcome::Launched { description }) => {
                self.set_status_message((format!("Launched {}", description), false));
            }
            Ok(ActionOutcome::Interactive { description, argv }) => {
                self.push_request(Request::Interactive { description, argv });
            }
            Ok(ActionOutcome::NotSupported(notice)) => {
                self.set_status_message((notice, true));
            }
            Err(e) => self.report_error("Action", &e),
        }
    }

    /// Append streamed output to the detail view. Returns true when lines arrived.
    pub fn drain_stream(&mut self) -> bool {
        let Some(rx) = self.async_state.stream_rx.as_mut() else {
            return false;
        };

        let mut received = Vec::new();
        let mut finished = false;
        loop {
            match rx.try_recv() {
                Ok(StreamEvent::Line(line)) => received.push(line),
                Ok(StreamEvent::Error(line)) => received.push(format!("! {}", line)),
                Ok(StreamEvent::Exited(status)) => {
                    received.push(match status {
                        Some(code) => format!("[process exited with status {}]", code),
                        None => "[process terminated]".to_string(),
                    });
                    finished = true;
                }
                Err(StreamTryRecvError::Empty) => break,
                Err(StreamTryRecvError::Disconnected) => {
                    finished = true;
                    break;
                }
            }
        }

        if finished {
            self.async_state.stream_rx = None;
            self.view_state.detail.live = false;
        }
        if received.is_empty() {
            return finished;
        }

        let lines = &mut self.view_state.detail.lines;
        lines.extend(received);
        if lines.len() > MAX_STREAM_LINES {
            let excess = lines.len() - MAX_STREAM_LINES;
            lines.drain(..excess);
        }
        true
    }

    /// Report a failure: first line on the status line, full text in the detail view
    pub(crate) fn report_error(&mut self, what: &str, error: &str) {
        let mut lines = error.lines().filter(|line| !line.trim().is_empty());
        let first = lines.next().unwrap_or(error).to_string();
        let multi_line = lines.next().is_some();

        self.set_status_message((format!("{} failed: {}", what, first), true));
        if multi_line {
            self.show_detail(DetailContent::new(format!("{} failed", what), error));
        }
    }
}
