//! Row filters over rendered cell text

use regex::Regex;

/// Row filter typed by the user.
///
/// `COLUMN: PATTERN` matches one column's cell when COLUMN names a column of
/// the table being filtered. Anything else is a pattern matched against every
/// cell. Patterns that are not valid regexes match literally.
#[derive(Debug, Clone)]
pub struct FilterExpr {
    source: String,
    column: Option<(String, Regex)>,
    whole: Regex,
}

impl FilterExpr {
    /// Parse a filter. Blank input means "no filter".
    pub fn parse(expr: &str) -> Result<Option<Self>, regex::Error> {
        let source = expr.trim();
        if source.is_empty() {
            return Ok(None);
        }

        let column = match source.split_once(':') {
            Some((name, pattern)) if !name.trim().is_empty() => {
                Some((name.trim().to_string(), compile(pattern.trim())?))
            }
            _ => None,
        };

        Ok(Some(Self {
            source: source.to_string(),
            column,
            whole: compile(source)?,
        }))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether a row with the given headers and cells passes the filter
    pub fn matches(&self, headers: &[&str], cells: &[String]) -> bool {
        if let Some((name, pattern)) = &self.column {
            if let Some(position) = headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
                return cells
                    .get(position)
                    .is_some_and(|cell| pattern.is_match(cell));
            }
        }
        cells.iter().any(|cell| self.whole.is_match(cell))
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern).or_else(|_| Regex::new(&regex::escape(pattern)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    const HEADERS: &[&str] = &["NAME", "STATUS"];

    #[test]
    fn test_blank_filter_is_none() {
        assert!(FilterExpr::parse("   ").unwrap().is_none());
    }

    #[test]
    fn test_column_filter() {
        let filter = FilterExpr::parse("status: ^Run").unwrap().unwrap();
        assert!(filter.matches(HEADERS, &cells(&["web", "Running"])));
        assert!(!filter.matches(HEADERS, &cells(&["Running-job", "Pending"])));
    }

    #[test]
    fn test_unknown_column_falls_back_to_whole_row() {
        let filter = FilterExpr::parse("app: web").unwrap().unwrap();
        assert!(filter.matches(HEADERS, &cells(&["app: web", "Running"])));
        assert!(!filter.matches(HEADERS, &cells(&["web", "Running"])));
    }

    #[test]
    fn test_whole_row_regex() {
        let filter = FilterExpr::parse("api-.*").unwrap().unwrap();
        assert!(filter.matches(HEADERS, &cells(&["api-7f9", "Running"])));
        assert!(!filter.matches(HEADERS, &cells(&["web", "Running"])));
    }

    #[test]
    fn test_invalid_regex_matches_literally() {
        let filter = FilterExpr::parse("web(").unwrap().unwrap();
        assert!(filter.matches(HEADERS, &cells(&["web(1)", "Running"])));
        assert!(!filter.matches(HEADERS, &cells(&["web", "Running"])));
        assert_eq!(filter.as_str(), "web(");
    }
}
