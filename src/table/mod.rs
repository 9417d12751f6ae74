//! Table layout and rendering
//!
//! Turns rows of cell text into aligned lines with per-cell style spans. The
//! output is display-agnostic: the TUI maps [`StyleHint`]s to colors, tests
//! compare the plain text.

mod filter;

pub use filter::FilterExpr;

use crate::extract::{extract_text, PathStep};
use crate::models::ObjectList;
use crate::registry::{ColumnSpec, ResourceType};

/// Spaces between two columns
pub const GUTTER: usize = 2;

/// Text of the single line rendered for an empty object set
pub const EMPTY_PLACEHOLDER: &str = "no objects";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Semantic style of a span, resolved to colors by the UI theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleHint {
    #[default]
    Normal,
    Header,
    Name,
    /// Colored according to the status word in the cell
    Status,
    Dim,
    Placeholder,
}

/// Header description of one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub title: String,
    pub align: Align,
    pub style: StyleHint,
    pub min_width: Option<usize>,
}

impl From<&ColumnSpec> for TableColumn {
    fn from(spec: &ColumnSpec) -> Self {
        Self {
            title: spec.name.to_string(),
            align: spec.align,
            style: spec.style,
            min_width: spec.min_width,
        }
    }
}

/// One data row and the index of the object it was computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
    pub object: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Row { object: usize },
    Placeholder,
}

/// Styled character range `[start, end)` within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    pub start: usize,
    pub end: usize,
    pub style: StyleHint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub text: String,
    pub kind: LineKind,
    pub spans: Vec<StyledSpan>,
}

impl RenderedLine {
    fn placeholder() -> Self {
        Self {
            text: EMPTY_PLACEHOLDER.to_string(),
            kind: LineKind::Placeholder,
            spans: vec![StyledSpan {
                start: 0,
                end: EMPTY_PLACEHOLDER.chars().count(),
                style: StyleHint::Placeholder,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedTable {
    pub lines: Vec<RenderedLine>,
    pub widths: Vec<usize>,
}

impl RenderedTable {
    /// Index of the object rendered on `line`, if it is a data row
    pub fn object_at(&self, line: usize) -> Option<usize> {
        match self.lines.get(line)?.kind {
            LineKind::Row { object } => Some(object),
            _ => None,
        }
    }

    pub fn first_row_line(&self) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| matches!(line.kind, LineKind::Row { .. }))
    }

    pub fn row_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line.kind, LineKind::Row { .. }))
            .count()
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.lines.as_slice(),
            [RenderedLine {
                kind: LineKind::Placeholder,
                ..
            }]
        )
    }

    /// Plain text of every line joined with newlines
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Width of each column: the longest of header, cells and declared minimum
pub fn column_widths(columns: &[TableColumn], rows: &[Row]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let cells = rows
                .iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| cell.chars().count());
            cells
                .chain(std::iter::once(column.title.chars().count()))
                .chain(column.min_width)
                .max()
                .unwrap_or(0)
        })
        .collect()
}

/// Lay out a header and rows. An empty row set yields only the placeholder line.
pub fn render(columns: &[TableColumn], rows: &[Row]) -> RenderedTable {
    let widths = column_widths(columns, rows);
    if rows.is_empty() {
        return RenderedTable {
            lines: vec![RenderedLine::placeholder()],
            widths,
        };
    }

    let titles: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(layout_line(columns, &widths, &titles, LineKind::Header, true));
    for row in rows {
        let cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
        lines.push(layout_line(
            columns,
            &widths,
            &cells,
            LineKind::Row { object: row.object },
            false,
        ));
    }

    RenderedTable { lines, widths }
}

fn layout_line(
    columns: &[TableColumn],
    widths: &[usize],
    cells: &[&str],
    kind: LineKind,
    header: bool,
) -> RenderedLine {
    let mut text = String::new();
    let mut spans = Vec::new();
    let mut cursor = 0;
    let last = columns.len().saturating_sub(1);

    for (i, column) in columns.iter().enumerate() {
        let cell = cells.get(i).copied().unwrap_or_default();
        let len = cell.chars().count();
        let width = widths[i];
        let pad = width.saturating_sub(len);

        let start = match column.align {
            Align::Right => {
                text.extend(std::iter::repeat_n(' ', pad));
                cursor + pad
            }
            Align::Left => cursor,
        };
        text.push_str(cell);
        if len > 0 {
            spans.push(StyledSpan {
                start,
                end: start + len,
                style: if header { StyleHint::Header } else { column.style },
            });
        }

        if i == last {
            break;
        }
        if column.align == Align::Left {
            text.extend(std::iter::repeat_n(' ', pad));
        }
        text.extend(std::iter::repeat_n(' ', GUTTER));
        cursor += width + GUTTER;
    }

    RenderedLine { text, kind, spans }
}

/// Knobs for rendering an object list
#[derive(Debug, Clone, Default)]
pub struct RenderOptions<'a> {
    /// Prepend a NAMESPACE column
    pub show_namespace: bool,
    pub filter: Option<&'a FilterExpr>,
}

/// Render the objects of one resource type through its column specs.
///
/// A cell whose extraction fails renders blank; the rest of the row is kept.
/// Rows rejected by the filter are left out, and if none survive the table is
/// the placeholder line.
pub fn render_object_list(
    resource_type: &ResourceType,
    objects: &ObjectList,
    options: &RenderOptions<'_>,
) -> RenderedTable {
    let namespace_column = ColumnSpec::new("NAMESPACE", "metadata.namespace");
    let specs: Vec<&ColumnSpec> = options
        .show_namespace
        .then_some(&namespace_column)
        .into_iter()
        .chain(resource_type.columns.iter())
        .collect();
    let columns: Vec<TableColumn> = specs.iter().map(|spec| TableColumn::from(*spec)).collect();
    let titles: Vec<&str> = specs.iter().map(|spec| spec.name).collect();

    let rows: Vec<Row> = objects
        .iter()
        .enumerate()
        .map(|(index, object)| Row {
            cells: specs
                .iter()
                .map(|spec| cell_text(spec.name, &spec.path, spec.format, object))
                .collect(),
            object: index,
        })
        .filter(|row| {
            options
                .filter
                .is_none_or(|filter| filter.matches(&titles, &row.cells))
        })
        .collect();

    render(&columns, &rows)
}

fn cell_text(
    column: &str,
    path: &[PathStep],
    format: crate::extract::FormatHint,
    object: &crate::models::KubeObject,
) -> String {
    extract_text(path, &object.raw, format).unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to extract column {} for {}: {}",
            column,
            object.qualified_name(),
            e
        );
        String::new()
    })
}
