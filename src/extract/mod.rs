//! Path extraction over kubectl JSON documents
//!
//! A column declares a small program of [`PathStep`]s. Evaluation starts at the
//! object's root document and applies each step to a "current value":
//!
//! - `Field(key)` looks up a map key
//! - `Index(i)` looks up an array element
//! - `Transform(f)` replaces the current value with `f(current)`
//!
//! A missing key or an out-of-range index makes the current value absent
//! (`Value::Null`); later lookups keep it absent. Only a transform can fail,
//! and that failure is confined to the cell being extracted.

pub mod transforms;

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Extraction errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("transform `{transform}` failed: {message}")]
    Transform {
        transform: &'static str,
        message: String,
    },
}

type TransformFn = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;

/// A named projection applied to the current value
#[derive(Clone)]
pub struct Transform {
    name: &'static str,
    func: Arc<TransformFn>,
}

impl Transform {
    pub fn new<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, value: &Value) -> Result<Value, ExtractError> {
        (self.func)(value).map_err(|message| ExtractError::Transform {
            transform: self.name,
            message,
        })
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&self.name).finish()
    }
}

/// One step of a column's path program
#[derive(Debug, Clone)]
pub enum PathStep {
    Field(String),
    Index(usize),
    Transform(Transform),
}

impl PathStep {
    pub fn field(key: impl Into<String>) -> Self {
        PathStep::Field(key.into())
    }

    pub fn index(index: usize) -> Self {
        PathStep::Index(index)
    }
}

impl From<Transform> for PathStep {
    fn from(transform: Transform) -> Self {
        PathStep::Transform(transform)
    }
}

/// How the final extracted value is turned into cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatHint {
    /// Strings verbatim, scalars via Display, containers as compact JSON
    #[default]
    Text,
    /// `true`/`false` rendered as `True`/`False`
    Boolean,
    /// Array elements joined with `,`
    List,
    /// Object entries rendered as `key=value` joined with `,`
    Map,
}

/// Parse a dotted path such as `status.containerStatuses[0].image` into steps.
///
/// Segments that are not valid `[n]` indices are kept as literal keys, so the
/// parser never fails. An empty expression yields an empty program (the root).
pub fn path(expr: &str) -> Vec<PathStep> {
    let mut steps = Vec::new();
    for segment in expr.split('.').filter(|s| !s.is_empty()) {
        let (key, mut rest) = match segment.find('[') {
            Some(pos) => (&segment[..pos], &segment[pos..]),
            None => (segment, ""),
        };
        if !key.is_empty() {
            steps.push(PathStep::field(key));
        }
        while let Some(stripped) = rest.strip_prefix('[') {
            let Some(close) = stripped.find(']') else {
                steps.push(PathStep::field(rest));
                break;
            };
            let inner = &stripped[..close];
            match inner.parse::<usize>() {
                Ok(index) => steps.push(PathStep::index(index)),
                Err(_) => steps.push(PathStep::field(inner)),
            }
            rest = &stripped[close + 1..];
        }
    }
    steps
}

/// Run a path program against a document
pub fn extract(steps: &[PathStep], root: &Value) -> Result<Value, ExtractError> {
    let mut current: Cow<'_, Value> = Cow::Borrowed(root);
    for step in steps {
        current = match step {
            PathStep::Field(key) => descend(current, |v| v.get(key.as_str())),
            PathStep::Index(index) => descend(current, |v| v.get(*index)),
            PathStep::Transform(transform) => Cow::Owned(transform.apply(&current)?),
        };
    }
    Ok(current.into_owned())
}

fn descend<'a>(current: Cow<'a, Value>, lookup: impl Fn(&Value) -> Option<&Value>) -> Cow<'a, Value> {
    match current {
        Cow::Borrowed(value) => lookup(value)
            .map(Cow::Borrowed)
            .unwrap_or(Cow::Owned(Value::Null)),
        Cow::Owned(value) => Cow::Owned(lookup(&value).cloned().unwrap_or(Value::Null)),
    }
}

/// Render an extracted value as cell text. Absent values render blank.
pub fn render_value(value: &Value, format: FormatHint) -> String {
    match (format, value) {
        (_, Value::Null) => String::new(),
        (FormatHint::Boolean, Value::Bool(b)) => if *b { "True" } else { "False" }.to_string(),
        (FormatHint::List, Value::Array(items)) => items
            .iter()
            .map(|item| render_value(item, FormatHint::Text))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(","),
        (FormatHint::Map, Value::Object(map)) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, render_value(v, FormatHint::Text)))
            .collect::<Vec<_>>()
            .join(","),
        (_, Value::String(s)) => s.clone(),
        (_, Value::Number(n)) => n.to_string(),
        (_, Value::Bool(b)) => b.to_string(),
        (_, Value::Array(_)) | (_, Value::Object(_)) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

/// Extract and render in one go
pub fn extract_text(
    steps: &[PathStep],
    root: &Value,
    format: FormatHint,
) -> Result<String, ExtractError> {
    extract(steps, root).map(|value| render_value(&value, format))
}
