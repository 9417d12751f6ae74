//! Footer view rendering
//!
//! The first line carries the active prompt or the latest status message;
//! the remaining lines list the keybindings.

use crate::tui::app::state::Prompt;
use crate::tui::keybindings::wrap_navigation_commands;
use crate::tui::theme::Theme;
use crate::tui::views::helpers::truncate_message;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the footer
pub fn render_footer(
    f: &mut Frame,
    area: Rect,
    prompt: Option<&Prompt>,
    completion: Option<&str>,
    status_message: &Option<(String, bool)>,
    theme: &Theme,
) {
    let first_line = if let Some(prompt) = prompt {
        prompt_line(prompt, completion, theme)
    } else if let Some((msg, is_error)) = status_message {
        Line::from(Span::styled(
            truncate_message(msg, area.width.saturating_sub(2) as usize),
            if *is_error {
                theme.operation_error_style()
            } else {
                theme.operation_success_style()
            },
        ))
    } else {
        Line::from("")
    };

    let mut lines = vec![first_line];
    for commands in wrap_navigation_commands(area.width) {
        let mut spans = Vec::new();
        for (idx, cmd) in commands.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(cmd.key.to_string(), theme.footer_key_style()));
            spans.push(Span::raw(format!(" {}", cmd.label)));
        }
        lines.push(Line::from(spans));
    }

    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn prompt_line<'a>(prompt: &'a Prompt, completion: Option<&str>, theme: &Theme) -> Line<'a> {
    let mut spans = vec![
        Span::styled(
            format!("{}> ", prompt.kind.label()),
            Style::default()
                .fg(theme.command_prompt)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(prompt.buffer.as_str()),
        Span::raw("_"),
    ];
    if let Some(completion) = completion {
        spans.push(Span::raw("  ["));
        spans.push(Span::styled(
            format!("Tab: {}", completion),
            Style::default().fg(theme.command_autocomplete),
        ));
        spans.push(Span::raw("]"));
    }
    spans.push(Span::styled(
        "  (Enter to apply, Esc to cancel)",
        Style::default().fg(theme.text_secondary),
    ));
    Line::from(spans)
}
