//! Resource table view rendering
//!
//! Draws the session's [`RenderedTable`](crate::table::RenderedTable). The
//! header line stays pinned while data rows scroll under it.

use crate::services::SessionSnapshot;
use crate::table::RenderedLine;
use crate::tui::theme::Theme;
use crate::tui::views::helpers::{create_themed_block, update_scroll_offset};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

const SCROLL_BUFFER: usize = 2;

/// Convert a rendered line into themed spans. Text between styled ranges is kept unstyled.
pub fn styled_line(line: &RenderedLine, theme: &Theme) -> Line<'static> {
    let chars: Vec<char> = line.text.chars().collect();
    let slice = |start: usize, end: usize| -> String {
        chars[start.min(chars.len())..end.min(chars.len())]
            .iter()
            .collect()
    };

    let mut spans = Vec::with_capacity(line.spans.len() * 2);
    let mut cursor = 0;
    for span in &line.spans {
        if span.start > cursor {
            spans.push(Span::raw(slice(cursor, span.start)));
        }
        let text = slice(span.start, span.end);
        let style = theme.style_for(span.style, &text);
        spans.push(Span::styled(text, style));
        cursor = cursor.max(span.end);
    }
    if cursor < chars.len() {
        spans.push(Span::raw(slice(cursor, chars.len())));
    }
    Line::from(spans)
}

/// Render the resource table with `selected_row` (counted from the first data row) highlighted
pub fn render_resource_table(
    f: &mut Frame,
    area: Rect,
    snapshot: &SessionSnapshot,
    selected_row: usize,
    scroll_offset: &mut usize,
    theme: &Theme,
) {
    let title = format!(
        " {}({})[{}] ",
        snapshot.kind,
        snapshot.namespace_label(),
        snapshot.table.row_count()
    );
    let block = create_themed_block(&title, theme);

    let table = &snapshot.table;
    let Some(first_row) = table.first_row_line() else {
        // Only a placeholder, or a header over filtered-out rows
        let lines: Vec<Line> = table
            .lines
            .iter()
            .map(|line| styled_line(line, theme))
            .collect();
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    };

    // Borders and the pinned header line
    let visible_height = (area.height as usize).saturating_sub(2 + first_row).max(1);
    update_scroll_offset(selected_row, visible_height, scroll_offset, SCROLL_BUFFER);

    let mut lines: Vec<Line> = table.lines[..first_row]
        .iter()
        .map(|line| styled_line(line, theme))
        .collect();
    for (row, line) in table.lines[first_row..]
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
    {
        let mut rendered = styled_line(line, theme);
        if row == selected_row {
            rendered = rendered.patch_style(theme.table_selected_style());
        }
        lines.push(rendered);
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{LineKind, StyleHint, StyledSpan};

    #[test]
    fn test_styled_line_keeps_gaps() {
        let line = RenderedLine {
            text: "web  Running".to_string(),
            kind: LineKind::Row { object: 0 },
            spans: vec![
                StyledSpan {
                    start: 0,
                    end: 3,
                    style: StyleHint::Name,
                },
                StyledSpan {
                    start: 5,
                    end: 12,
                    style: StyleHint::Status,
                },
            ],
        };
        let rendered = styled_line(&line, &Theme::default());
        let texts: Vec<&str> = rendered.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["web", "  ", "Running"]);
    }
}
