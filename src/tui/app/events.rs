//! Event handling for the application
//!
//! Keyboard input for the table and detail views, prompts, pickers and the
//! confirmation dialog. Anything that talks to kubectl is queued as a
//! [`Request`] for the run loop.

use super::core::App;
use super::state::{
    Confirmation, PendingAction, Picker, PickerKind, Prompt, PromptKind, Request, View,
};
use crate::models::OperationKind;
use crate::services::actions::container_names;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;

const BUSY_NOTICE: &str = "Busy: waiting for the current operation to finish";

impl App {
    /// Main keyboard event handler
    ///
    /// Returns Some(true) to quit, None for normal continuation
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(true);
        }

        self.check_status_message_timeout();

        if self.ui_state.confirmation.is_some() {
            self.handle_confirmation_key(key);
            return None;
        }
        if self.ui_state.picker.is_some() {
            self.handle_picker_key(key);
            return None;
        }
        if self.ui_state.prompt.is_some() {
            self.handle_prompt_key(key);
            return None;
        }
        if self.ui_state.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.ui_state.show_help = false;
            }
            return None;
        }

        match self.current_view() {
            View::ResourceTable => self.handle_table_key(key),
            View::Detail => {
                self.handle_detail_key(key);
                None
            }
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<bool> {
        match key.code {
            KeyCode::Char('q') => return Some(true),
            KeyCode::Char('?') => self.ui_state.show_help = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(self.view_state.page_size as isize),
            KeyCode::PageUp => self.move_selection(-(self.view_state.page_size as isize)),
            KeyCode::Home => self.view_state.selected_row = 0,
            KeyCode::End => self.move_selection(isize::MAX),
            KeyCode::Esc if self.snapshot.filter.is_some() => {
                if !self.reject_if_busy() {
                    self.push_request(Request::Filter(String::new()));
                }
            }
            KeyCode::Esc => {
                self.ui_state.status_message = None;
                self.ui_state.status_message_time = None;
            }
            KeyCode::Char('g') => {
                if !self.reject_if_busy() {
                    self.request_refresh(None, None);
                }
            }
            KeyCode::Char('n') => {
                if !self.reject_if_busy() {
                    self.push_request(Request::Namespaces);
                }
            }
            KeyCode::Char('N') => self.open_prompt(PromptKind::Namespace),
            KeyCode::Char('r') => self.open_prompt(PromptKind::Resource),
            KeyCode::Char('/') => self.open_prompt(PromptKind::Filter),
            KeyCode::Enter => self.begin_action('v'),
            KeyCode::Char(c) if self.dispatcher.actions().get_by_keybinding(c).is_some() => {
                self.begin_action(c)
            }
            _ => {}
        }
        None
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.close_detail();
                return;
            }
            KeyCode::Char('?') => {
                self.ui_state.show_help = true;
                return;
            }
            _ => {}
        }

        let page = self.view_state.page_size;
        let view = &mut self.view_state;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                view.detail_follow = false;
                view.detail_scroll_offset = view.detail_scroll_offset.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                view.detail_follow = false;
                view.detail_scroll_offset = view.detail_scroll_offset.saturating_sub(1);
            }
            KeyCode::PageDown | KeyCode::Char(' ') => {
                view.detail_follow = false;
                view.detail_scroll_offset = view.detail_scroll_offset.saturating_add(page);
            }
            KeyCode::PageUp => {
                view.detail_follow = false;
                view.detail_scroll_offset = view.detail_scroll_offset.saturating_sub(page);
            }
            KeyCode::Char('g') | KeyCode::Home => {
                view.detail_follow = false;
                view.detail_scroll_offset = 0;
            }
            KeyCode::Char('G') | KeyCode::End => view.detail_follow = true,
            _ => {}
        }
    }

    fn handle_confirmation_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(Confirmation { mut pending, .. }) = self.ui_state.confirmation.take() {
                    pending.confirmed = true;
                    self.advance_action(pending);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.ui_state.confirmation = None;
                self.set_status_message(("Cancelled".to_string(), false));
            }
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.ui_state.picker.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => picker.move_by(1),
            KeyCode::Char('k') | KeyCode::Up => picker.move_by(-1),
            KeyCode::Esc => {
                self.ui_state.picker = None;
                self.ui_state.pending_action = None;
            }
            KeyCode::Enter => {
                let Some(picker) = self.ui_state.picker.take() else {
                    return;
                };
                let Some(choice) = picker.current().map(str::to_string) else {
                    self.ui_state.pending_action = None;
                    return;
                };
                match picker.kind {
                    PickerKind::Namespace => {
                        if !self.reject_if_busy() {
                            self.request_refresh(None, Some(choice));
                        }
                    }
                    PickerKind::Container => {
                        if let Some(mut pending) = self.ui_state.pending_action.take() {
                            pending.args.container = Some(choice);
                            self.advance_action(pending);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.ui_state.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                if prompt.kind == PromptKind::Tail {
                    self.ui_state.pending_action = None;
                }
                self.ui_state.prompt = None;
            }
            KeyCode::Backspace => {
                prompt.buffer.pop();
            }
            KeyCode::Tab => {
                if let Some(kind) = self.resource_completion() {
                    if let Some(prompt) = self.ui_state.prompt.as_mut() {
                        prompt.buffer = kind.to_string();
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.ui_state.prompt.take() {
                    self.submit_prompt(prompt);
                }
            }
            KeyCode::Char(c) => prompt.buffer.push(c),
            _ => {}
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        let value = prompt.buffer.trim().to_string();
        match prompt.kind {
            PromptKind::Namespace => {
                if !self.reject_if_busy() {
                    self.request_refresh(None, Some(value));
                }
            }
            PromptKind::Resource => match self.registry.lookup(&value) {
                Ok(resource_type) => {
                    if !self.reject_if_busy() {
                        self.request_refresh(Some(resource_type.kind.to_string()), None);
                    }
                }
                Err(e) => self.set_status_message((e.to_string(), true)),
            },
            PromptKind::Filter => {
                if !self.reject_if_busy() {
                    self.push_request(Request::Filter(value));
                }
            }
            PromptKind::Tail => {
                let Some(mut pending) = self.ui_state.pending_action.take() else {
                    return;
                };
                match value.parse::<u32>() {
                    Ok(tail) if tail > 0 => {
                        pending.args.tail = Some(tail);
                        self.advance_action(pending);
                    }
                    _ => self.set_status_message((
                        format!("Invalid line count: '{}'", value),
                        true,
                    )),
                }
            }
        }
    }

    /// Open a text prompt, pre-filled where there is a sensible default
    pub(crate) fn open_prompt(&mut self, kind: PromptKind) {
        let initial = match kind {
            PromptKind::Filter => self.snapshot.filter.clone().unwrap_or_default(),
            PromptKind::Tail => self.dispatcher.context().settings.log_tail.to_string(),
            PromptKind::Namespace | PromptKind::Resource => String::new(),
        };
        self.ui_state.prompt = Some(Prompt::new(kind, initial));
    }

    /// Kind the resource prompt would complete to
    pub fn resource_completion(&self) -> Option<&'static str> {
        let prompt = self.ui_state.prompt.as_ref()?;
        if prompt.kind != PromptKind::Resource {
            return None;
        }
        let typed = prompt.buffer.trim().to_lowercase();
        if typed.is_empty() {
            return None;
        }
        let mut matches: Vec<&'static str> = self
            .registry
            .iter()
            .filter(|rt| {
                rt.kind.starts_with(&typed) || rt.aliases.iter().any(|a| a.starts_with(&typed))
            })
            .map(|rt| rt.kind)
            .collect();
        matches.sort_unstable();
        matches.first().copied()
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.snapshot.table.row_count();
        if rows == 0 {
            self.view_state.selected_row = 0;
            return;
        }
        self.view_state.selected_row = self
            .view_state
            .selected_row
            .saturating_add_signed(delta)
            .min(rows - 1);
    }

    /// Returns true (and says so) when input has to wait
    fn reject_if_busy(&mut self) -> bool {
        if self.is_busy() {
            self.set_status_message((BUSY_NOTICE.to_string(), true));
            return true;
        }
        false
    }

    /// Start the action bound to `key` on the selected object
    fn begin_action(&mut self, key: char) {
        if self.reject_if_busy() {
            return;
        }
        let Some(object) = self.selected_object().cloned() else {
            self.set_status_message(("No object selected".to_string(), true));
            return;
        };
        self.advance_action(PendingAction::new(key, object));
    }

    /// Collect whatever the action still needs, then queue it
    pub(crate) fn advance_action(&mut self, mut pending: PendingAction) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let action = match dispatcher.check(pending.key, Some(&pending.object)) {
            Ok(action) => action,
            Err(notice) => {
                self.set_status_message((notice, true));
                return;
            }
        };

        if pending.args.container.is_none() && action.needs_container(&pending.object) {
            self.ui_state.picker = Some(Picker::new(
                PickerKind::Container,
                format!("Container in {}", pending.object.name),
                container_names(&pending.object),
            ));
            self.ui_state.pending_action = Some(pending);
            return;
        }

        if pending.args.tail.is_none() && action.prompts_for_tail() {
            self.ui_state.pending_action = Some(pending);
            self.open_prompt(PromptKind::Tail);
            return;
        }

        if action.requires_confirmation() && !pending.confirmed {
            let message = action.confirmation_message(&pending.object);
            self.ui_state.confirmation = Some(Confirmation { pending, message });
            return;
        }

        if action.operation() == OperationKind::Delete {
            self.async_state.refresh_after_action = true;
        }
        tracing::debug!(
            "Queueing {} on {}",
            action.name(),
            pending.object.display_name()
        );
        self.push_request(Request::Action(pending));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubectl::{MockCommandRunner, StreamEvent};
    use crate::models::ObjectList;
    use crate::registry::ResourceRegistry;
    use crate::services::{
        ActionContext, ActionDispatcher, ActionOutcome, ActionSettings, SessionSnapshot,
    };
    use crate::table::{render_object_list, RenderOptions};
    use crate::tui::Theme;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn snapshot() -> SessionSnapshot {
        let registry = ResourceRegistry::global();
        let objects = ObjectList::from_document(json!({
            "kind": "List",
            "items": [
                {
                    "kind": "Pod",
                    "metadata": {"name": "api-1", "namespace": "web"},
                    "spec": {"containers": [{"name": "app"}, {"name": "sidecar"}]}
                },
                {
                    "kind": "Pod",
                    "metadata": {"name": "db-0", "namespace": "web"},
                    "spec": {"containers": [{"name": "postgres"}]}
                }
            ]
        }))
        .unwrap();
        let resource_type = registry.lookup("pod").unwrap();
        let table = render_object_list(resource_type, &objects, &RenderOptions::default());
        SessionSnapshot {
            kind: resource_type.kind,
            namespace: Some("web".to_string()),
            has_namespace: true,
            filter: None,
            objects,
            table,
        }
    }

    fn app_with(settings: ActionSettings) -> App {
        let dispatcher = ActionDispatcher::new(
            ResourceRegistry::global(),
            ActionContext {
                runner: Arc::new(MockCommandRunner::new()),
                settings,
            },
        );
        App::new(
            ResourceRegistry::global(),
            Arc::new(dispatcher),
            snapshot(),
            "test".to_string(),
            Theme::default(),
        )
    }

    fn app() -> App {
        app_with(ActionSettings::default())
    }

    fn queued(app: &mut App) -> Vec<Request> {
        app.async_state.requests.drain(..).collect()
    }

    #[test]
    fn test_selection_is_clamped_to_rows() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.selected_row(), 0);
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected_row(), 1);
        assert_eq!(app.selected_object().map(|o| o.name.as_str()), Some("db-0"));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Some(true));
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(true)
        );
    }

    #[test]
    fn test_delete_asks_for_confirmation() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('d')));
        let confirmation = app.ui_state.confirmation.as_ref().unwrap();
        assert!(confirmation.message.contains("pod/api-1"));
        assert!(queued(&mut app).is_empty());

        app.handle_key(key(KeyCode::Char('y')));
        let requests = queued(&mut app);
        assert!(matches!(
            requests.as_slice(),
            [Request::Action(PendingAction { key: 'd', confirmed: true, .. })]
        ));
        assert!(app.async_state.refresh_after_action);
    }

    #[test]
    fn test_delete_cancelled() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Esc));
        assert!(app.ui_state.confirmation.is_none());
        assert!(queued(&mut app).is_empty());
    }

    #[test]
    fn test_read_only_blocks_delete() {
        let mut app = app_with(ActionSettings {
            read_only: true,
            ..ActionSettings::default()
        });
        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.ui_state.confirmation.is_none());
        assert_eq!(app.status_message().map(|m| m.1), Some(true));
    }

    #[test]
    fn test_logs_pick_container_first() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('l')));
        let picker = app.ui_state.picker.as_ref().unwrap();
        assert_eq!(picker.items, ["app", "sidecar"]);

        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Enter));
        match queued(&mut app).as_slice() {
            [Request::Action(pending)] => {
                assert_eq!(pending.key, 'l');
                assert_eq!(pending.args.container.as_deref(), Some("sidecar"));
                assert_eq!(pending.args.tail, None);
            }
            other => panic!("unexpected requests: {:?}", other),
        }
    }

    #[test]
    fn test_prompted_logs_ask_for_tail() {
        let mut app = app();
        // Single-container pod skips the picker
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('L')));
        assert_eq!(
            app.ui_state.prompt.as_ref().map(|p| p.buffer.as_str()),
            Some("1000")
        );

        for _ in 0..4 {
            app.handle_key(key(KeyCode::Backspace));
        }
        app.handle_key(key(KeyCode::Char('5')));
        app.handle_key(key(KeyCode::Char('0')));
        app.handle_key(key(KeyCode::Enter));
        match queued(&mut app).as_slice() {
            [Request::Action(pending)] => assert_eq!(pending.args.tail, Some(50)),
            other => panic!("unexpected requests: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_tail_is_rejected() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('L')));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Enter));
        assert!(queued(&mut app).is_empty());
        assert_eq!(app.status_message().map(|m| m.1), Some(true));
    }

    #[test]
    fn test_filter_prompt_queues_filter() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        for c in "name:api".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            queued(&mut app).as_slice(),
            [Request::Filter(expr)] if expr == "name:api"
        ));
    }

    #[test]
    fn test_resource_prompt_completes_and_validates() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('r')));
        for c in "deploy".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.resource_completion(), Some("deployment"));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            queued(&mut app).as_slice(),
            [Request::Refresh { kind: Some(kind), namespace: None }] if kind == "deployment"
        ));

        app.handle_key(key(KeyCode::Char('r')));
        for c in "widget".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(queued(&mut app).is_empty());
        assert_eq!(app.status_message().map(|m| m.1), Some(true));
    }

    #[test]
    fn test_busy_rejects_refresh() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('g')));
        assert!(app.next_job().is_some());
        assert!(app.is_busy());

        app.handle_key(key(KeyCode::Char('g')));
        assert!(queued(&mut app).is_empty());
        assert_eq!(
            app.status_message().map(|m| m.0.as_str()),
            Some(BUSY_NOTICE)
        );
    }

    #[test]
    fn test_busy_escape_keeps_filter_and_notice() {
        let mut app = app();
        app.snapshot.filter = Some("status:Pending".to_string());
        app.handle_key(key(KeyCode::Char('g')));
        assert!(app.next_job().is_some());

        app.handle_key(key(KeyCode::Esc));
        assert!(queued(&mut app).is_empty());
        assert_eq!(
            app.status_message().map(|m| m.0.as_str()),
            Some(BUSY_NOTICE)
        );
    }

    #[test]
    fn test_escape_clears_filter_then_status() {
        let mut app = app();
        app.snapshot.filter = Some("api".to_string());
        app.handle_key(key(KeyCode::Esc));
        assert!(matches!(
            queued(&mut app).as_slice(),
            [Request::Filter(expr)] if expr.is_empty()
        ));

        app.snapshot.filter = None;
        app.set_status_message(("Deleted pod/api-1".to_string(), false));
        app.handle_key(key(KeyCode::Esc));
        assert!(app.status_message().is_none());
    }

    #[test]
    fn test_delete_result_triggers_refresh() {
        let mut app = app();
        app.async_state.refresh_after_action = true;
        app.apply_action_result(Ok(ActionOutcome::Deleted {
            target: "pod/api-1".to_string(),
        }));
        assert!(matches!(
            queued(&mut app).as_slice(),
            [Request::Refresh { kind: None, namespace: None }]
        ));
    }

    #[test]
    fn test_stream_appends_until_exit() {
        let mut app = app();
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        app.apply_action_result(Ok(ActionOutcome::Stream {
            title: "logs api-1".to_string(),
            events: rx,
        }));
        assert_eq!(app.current_view(), View::Detail);
        assert!(app.detail().live);

        tx.send(StreamEvent::Line("hello".to_string())).unwrap();
        assert!(app.drain_stream());
        assert_eq!(app.detail().lines, ["hello"]);

        tx.send(StreamEvent::Exited(Some(0))).unwrap();
        app.drain_stream();
        assert!(!app.detail().live);
        assert_eq!(app.detail().lines.len(), 2);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.current_view(), View::ResourceTable);
    }

    #[test]
    fn test_multi_line_error_opens_detail() {
        let mut app = app();
        app.apply_action_result(Err(
            "`kubectl delete pod/api-1` exited with status 1:\nError from server".to_string(),
        ));
        assert_eq!(app.current_view(), View::Detail);
        assert!(app
            .status_message()
            .is_some_and(|(msg, is_error)| *is_error && msg.starts_with("Action failed")));
    }
}
