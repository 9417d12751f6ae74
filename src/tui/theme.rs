//! Theme and styling definitions
//!
//! Colors live in one place; views only ask for styles.

use crate::table::StyleHint;
use ratatui::style::{Color, Modifier, Style};

/// Status words shown in green
const HEALTHY: &[&str] = &[
    "running",
    "true",
    "active",
    "bound",
    "available",
    "succeeded",
    "complete",
    "completed",
    "ready",
    "healthy",
    "normal",
];

/// Status words shown in yellow
const PROGRESSING: &[&str] = &[
    "pending",
    "containercreating",
    "podinitializing",
    "terminating",
    "released",
    "unknown",
];

/// Theme configuration for the TUI
pub struct Theme {
    // Header colors
    pub header_context: Color,
    pub header_namespace: Color,
    pub header_namespace_all: Color,
    pub header_resources: Color,
    pub header_filter: Color,

    // Status colors
    pub status_ready: Color,
    pub status_error: Color,
    pub status_pending: Color,

    // Table colors
    pub table_header: Color,
    pub table_name: Color,
    pub table_selected: Color,
    pub table_selected_bg: Color,
    pub table_normal: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_label: Color,

    // Prompt colors
    pub command_prompt: Color,
    pub command_autocomplete: Color,

    // Operation colors
    pub operation_success: Color,
    pub operation_error: Color,
    pub operation_warning: Color,
    pub operation_confirm: Color,
    pub operation_cancel: Color,

    pub footer_key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_context: Color::Yellow,
            header_namespace: Color::Yellow,
            header_namespace_all: Color::Green,
            header_resources: Color::Cyan,
            header_filter: Color::Magenta,

            status_ready: Color::Green,
            status_error: Color::Red,
            status_pending: Color::Yellow,

            table_header: Color::Cyan,
            table_name: Color::White,
            table_selected: Color::Blue,
            table_selected_bg: Color::DarkGray,
            table_normal: Color::White,

            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_label: Color::Cyan,

            command_prompt: Color::Yellow,
            command_autocomplete: Color::Gray,

            operation_success: Color::Green,
            operation_error: Color::Red,
            operation_warning: Color::Yellow,
            operation_confirm: Color::Green,
            operation_cancel: Color::Red,

            footer_key: Color::Yellow,
        }
    }
}

impl Theme {
    pub fn header_context_style(&self) -> Style {
        Style::default()
            .fg(self.header_context)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header_namespace_style(&self, is_all: bool) -> Style {
        Style::default()
            .fg(if is_all {
                self.header_namespace_all
            } else {
                self.header_namespace
            })
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_selected_style(&self) -> Style {
        Style::default()
            .fg(self.table_selected)
            .bg(self.table_selected_bg)
    }

    pub fn footer_key_style(&self) -> Style {
        Style::default().fg(self.footer_key)
    }

    pub fn operation_success_style(&self) -> Style {
        Style::default()
            .fg(self.operation_success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn operation_error_style(&self) -> Style {
        Style::default()
            .fg(self.operation_error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn operation_warning_style(&self) -> Style {
        Style::default()
            .fg(self.operation_warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a table cell rendered with `hint`
    pub fn style_for(&self, hint: StyleHint, text: &str) -> Style {
        match hint {
            StyleHint::Normal => Style::default().fg(self.table_normal),
            StyleHint::Header => Style::default()
                .fg(self.table_header)
                .add_modifier(Modifier::BOLD),
            StyleHint::Name => Style::default()
                .fg(self.table_name)
                .add_modifier(Modifier::BOLD),
            StyleHint::Status => Style::default().fg(self.status_color(text)),
            StyleHint::Dim => Style::default().fg(self.text_secondary),
            StyleHint::Placeholder => Style::default()
                .fg(self.text_secondary)
                .add_modifier(Modifier::ITALIC),
        }
    }

    /// Color for a status cell: phase words and `ready/total` ratios
    pub fn status_color(&self, text: &str) -> Color {
        let word = text.trim().to_lowercase();
        if word.is_empty() {
            return self.table_normal;
        }
        if let Some((ready, total)) = word.split_once('/') {
            if let (Ok(ready), Ok(total)) = (ready.parse::<u32>(), total.parse::<u32>()) {
                return if ready == total {
                    self.status_ready
                } else {
                    self.status_pending
                };
            }
        }
        if HEALTHY.contains(&word.as_str()) {
            self.status_ready
        } else if PROGRESSING.contains(&word.as_str()) {
            self.status_pending
        } else {
            self.status_error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_words() {
        let theme = Theme::default();
        assert_eq!(theme.status_color("Running"), Color::Green);
        assert_eq!(theme.status_color("Pending"), Color::Yellow);
        assert_eq!(theme.status_color("CrashLoopBackOff"), Color::Red);
        assert_eq!(theme.status_color(""), Color::White);
    }

    #[test]
    fn test_ready_ratios() {
        let theme = Theme::default();
        assert_eq!(theme.status_color("2/2"), Color::Green);
        assert_eq!(theme.status_color("1/3"), Color::Yellow);
    }

    #[test]
    fn test_header_hint_is_bold() {
        let theme = Theme::default();
        let style = theme.style_for(StyleHint::Header, "NAME");
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
