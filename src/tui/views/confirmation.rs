//! Confirmation dialog rendering

use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the confirmation dialog for `message`
pub fn render_confirmation(f: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let confirm_style = Style::default()
        .fg(theme.operation_confirm)
        .add_modifier(Modifier::BOLD);
    let cancel_style = Style::default()
        .fg(theme.operation_cancel)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("⚠ ", theme.operation_warning_style()),
            Span::styled("CONFIRMATION REQUIRED", theme.operation_warning_style()),
        ]),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("y", confirm_style),
            Span::raw(" or "),
            Span::styled("Y", confirm_style),
            Span::raw(" to confirm"),
        ]),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("n", cancel_style),
            Span::raw(", "),
            Span::styled("N", cancel_style),
            Span::raw(", or "),
            Span::styled("Esc", cancel_style),
            Span::raw(" to cancel"),
        ]),
    ];

    let block = Block::default()
        .title("Confirm Operation")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.operation_warning));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
