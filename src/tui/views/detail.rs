//! Detail view rendering
//!
//! Read-only text produced by an action: object YAML, a log tail, or a live
//! log stream.

use crate::tui::app::state::DetailContent;
use crate::tui::theme::Theme;
use crate::tui::views::helpers::{create_themed_block, render_empty_state};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Paragraph, Wrap},
};

/// Render `detail`, clamping `scroll_offset` to the content. With `follow` the
/// view sticks to the last line.
pub fn render_detail(
    f: &mut Frame,
    area: Rect,
    detail: &DetailContent,
    scroll_offset: &mut usize,
    follow: bool,
    theme: &Theme,
) {
    let visible_height = (area.height as usize).saturating_sub(2);
    let max_offset = detail.lines.len().saturating_sub(visible_height);
    if follow || *scroll_offset > max_offset {
        *scroll_offset = max_offset;
    }

    let title = if detail.live {
        format!(" {} [live] ", detail.title)
    } else {
        format!(" {} ", detail.title)
    };

    if detail.lines.is_empty() {
        let message = if detail.live {
            "Waiting for output..."
        } else {
            "No output"
        };
        render_empty_state(f, area, &title, message, "Press Esc to go back", theme);
        return;
    }

    let lines: Vec<Line> = detail
        .lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| Line::from(line.as_str()))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(create_themed_block(&title, theme))
        .style(Style::default().fg(theme.text_primary))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
