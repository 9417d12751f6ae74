//! Application state and main TUI logic

use super::state::{
    AsyncOperationState, DetailContent, Request, UIState, View, ViewState,
};
use crate::models::KubeObject;
use crate::registry::ResourceRegistry;
use crate::services::{ActionDispatcher, SessionSnapshot};
use crate::tui::Theme;
use std::sync::Arc;

/// Main application state
pub struct App {
    // Core data
    pub(crate) registry: &'static ResourceRegistry,
    pub(crate) dispatcher: Arc<ActionDispatcher>,
    pub(crate) snapshot: SessionSnapshot,
    pub(crate) theme: Theme,
    pub(crate) context: String,

    // Organized state
    pub(crate) view_state: ViewState,
    pub(crate) ui_state: UIState,
    pub(crate) async_state: AsyncOperationState,
}

impl App {
    pub fn new(
        registry: &'static ResourceRegistry,
        dispatcher: Arc<ActionDispatcher>,
        snapshot: SessionSnapshot,
        context: String,
        theme: Theme,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            snapshot,
            theme,
            context,
            view_state: ViewState::default(),
            ui_state: UIState::default(),
            async_state: AsyncOperationState::default(),
        }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// Replace the displayed listing, keeping the selection in range
    pub fn set_snapshot(&mut self, snapshot: SessionSnapshot) {
        let rows = snapshot.table.row_count();
        self.view_state.selected_row = self.view_state.selected_row.min(rows.saturating_sub(1));
        self.snapshot = snapshot;
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn read_only(&self) -> bool {
        self.dispatcher.context().settings.read_only
    }

    pub fn current_view(&self) -> View {
        self.view_state.current_view
    }

    pub fn set_view(&mut self, view: View) {
        self.view_state.current_view = view;
    }

    /// Selected data row, counted from the first row
    pub fn selected_row(&self) -> usize {
        self.view_state.selected_row
    }

    /// Object under the selection, `None` when the table has no rows
    pub fn selected_object(&self) -> Option<&KubeObject> {
        let first_row = self.snapshot.table.first_row_line()?;
        self.snapshot
            .object_at(first_row + self.view_state.selected_row)
    }

    pub fn is_busy(&self) -> bool {
        self.async_state.is_busy()
    }

    pub fn detail(&self) -> &DetailContent {
        &self.view_state.detail
    }

    /// Switch to the detail view showing `content`
    pub fn show_detail(&mut self, detail: DetailContent) {
        self.async_state.stream_rx = None;
        self.view_state.detail = detail;
        self.view_state.detail_scroll_offset = 0;
        self.view_state.detail_follow = self.view_state.detail.live;
        self.set_view(View::Detail);
    }

    /// Leave the detail view, stopping any stream feeding it
    pub fn close_detail(&mut self) {
        if self.async_state.stream_rx.take().is_some() {
            tracing::debug!("Closing live stream for {}", self.view_state.detail.title);
        }
        self.view_state.detail = DetailContent::default();
        self.set_view(View::ResourceTable);
    }

    /// Queue work for the run loop
    pub fn push_request(&mut self, request: Request) {
        self.async_state.requests.push_back(request);
    }

    pub fn request_refresh(&mut self, kind: Option<String>, namespace: Option<String>) {
        self.push_request(Request::Refresh { kind, namespace });
    }

    pub fn set_status_message(&mut self, message: (String, bool)) {
        if message.1 {
            tracing::warn!("{}", message.0);
        }
        self.ui_state.status_message = Some(message);
        self.ui_state.status_message_time = Some(std::time::Instant::now());
    }

    /// Clear the status message once it has been shown long enough
    pub fn check_status_message_timeout(&mut self) {
        use crate::tui::constants::STATUS_MESSAGE_TIMEOUT_SECS;
        if let Some(set_at) = self.ui_state.status_message_time {
            if set_at.elapsed() >= std::time::Duration::from_secs(STATUS_MESSAGE_TIMEOUT_SECS) {
                self.ui_state.status_message = None;
                self.ui_state.status_message_time = None;
            }
        }
    }

    pub fn status_message(&self) -> Option<&(String, bool)> {
        self.ui_state.status_message.as_ref()
    }
}
