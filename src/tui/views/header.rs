//! Header view rendering

use crate::services::SessionSnapshot;
use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the header: context, namespace, resource kind, counts and filter
pub fn render_header(
    f: &mut Frame,
    area: Rect,
    context: &str,
    snapshot: &SessionSnapshot,
    read_only: bool,
    busy: bool,
    theme: &Theme,
) {
    let namespace_label = snapshot.namespace_label();
    let is_all = snapshot.has_namespace && snapshot.namespace.is_none();

    let mut context_line = vec![
        Span::styled("Context: ", Style::default().fg(theme.text_label)),
        Span::styled(context.to_string(), theme.header_context_style()),
        Span::raw("  "),
        Span::styled("Namespace: ", Style::default().fg(theme.text_label)),
        Span::styled(
            namespace_label.to_string(),
            theme.header_namespace_style(is_all),
        ),
    ];
    if read_only {
        context_line.push(Span::raw("  "));
        context_line.push(Span::styled("[read-only]", theme.operation_warning_style()));
    }
    if busy {
        context_line.push(Span::raw("  "));
        context_line.push(Span::styled(
            "working...",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    let mut resource_line = vec![
        Span::styled("Resource: ", Style::default().fg(theme.text_label)),
        Span::styled(
            snapshot.kind.to_string(),
            Style::default()
                .fg(theme.header_resources)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  {} of {} shown",
            snapshot.table.row_count(),
            snapshot.objects.len()
        )),
    ];
    if let Some(filter) = &snapshot.filter {
        resource_line.push(Span::raw("  "));
        resource_line.push(Span::styled(
            format!("filter='{}'", filter),
            Style::default().fg(theme.header_filter),
        ));
        resource_line.push(Span::styled(
            " (Esc to clear)",
            Style::default().fg(theme.text_secondary),
        ));
    }

    let paragraph = Paragraph::new(vec![Line::from(context_line), Line::from(resource_line)])
        .block(Block::default().borders(Borders::ALL).title(" kubedash "));
    f.render_widget(paragraph, area);
}
