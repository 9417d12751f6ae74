//! Help view rendering

use crate::tui::keybindings::{get_action_help_commands, get_general_help_commands};
use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the help view as two columns
pub fn render_help(f: &mut Frame, area: Rect, theme: &Theme) {
    let inner_area = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };

    let column_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner_area);

    render_help_column(
        f,
        column_chunks[0],
        "SELECTED OBJECT",
        &get_action_help_commands(),
        theme,
    );
    render_help_column(
        f,
        column_chunks[1],
        "GENERAL",
        &get_general_help_commands(),
        theme,
    );

    let block = Block::default().title("Help").borders(Borders::ALL);
    f.render_widget(block, area);
}

/// Render a single help column (no borders, just content)
fn render_help_column(
    f: &mut Frame,
    area: Rect,
    title: &str,
    items: &[(&str, &str)],
    theme: &Theme,
) {
    let mut lines = vec![Line::from(vec![Span::styled(
        title.to_string(),
        Style::default()
            .fg(theme.table_header)
            .add_modifier(Modifier::BOLD),
    )])];

    for (key, description) in items {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", key),
                Style::default()
                    .fg(theme.footer_key)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(description.to_string()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
