//! Picker overlay rendering
//!
//! Centered popup over the current view for choosing a namespace or container.

use crate::tui::app::state::Picker;
use crate::tui::theme::Theme;
use crate::tui::views::helpers::centered_rect;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

/// Render the picker overlay
pub fn render_picker(f: &mut Frame, area: Rect, picker: &Picker, theme: &Theme) {
    let popup_width = area.width.clamp(30, 60);
    let popup_height = (picker.items.len() as u16)
        .saturating_add(4)
        .clamp(6, area.height.saturating_sub(4).max(6));
    let popup_area = centered_rect(popup_width, popup_height, area);

    f.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_selected_style())
        .style(Style::default().fg(theme.text_primary).bg(Color::Black));
    f.render_widget(block, popup_area);

    let inner_area = Rect {
        x: popup_area.x + 1,
        y: popup_area.y + 1,
        width: popup_area.width.saturating_sub(2),
        height: popup_area.height.saturating_sub(2),
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let title = Paragraph::new(picker.title.as_str())
        .style(
            Style::default()
                .fg(theme.table_selected)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let list_height = chunks[1].height as usize;
    let scroll_offset = picker
        .selected
        .saturating_sub(list_height.saturating_sub(1));
    let items: Vec<ListItem> = picker
        .items
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(list_height)
        .map(|(idx, item)| {
            let is_selected = idx == picker.selected;
            let style = if is_selected {
                theme.table_selected_style()
            } else {
                Style::default().fg(theme.text_primary)
            };
            let prefix = if is_selected { "> " } else { "  " };
            ListItem::new(Line::from(Span::styled(format!("{}{}", prefix, item), style)))
        })
        .collect();
    let list = List::new(items).style(Style::default().fg(theme.text_primary).bg(Color::Black));
    f.render_widget(list, chunks[1]);

    let help = Paragraph::new("j/k: move  Enter: select  Esc: cancel")
        .style(Style::default().fg(theme.text_secondary).bg(Color::Black))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}
