//! Resource registry
//!
//! Static description of every resource kind the dashboard knows about: how it
//! is displayed (columns), whether it lives in a namespace, and which operations
//! may be dispatched on it. The table is built once and shared for the lifetime
//! of the process.

mod builtin;

use crate::extract::{FormatHint, PathStep};
use crate::models::OperationKind;
use crate::table::{Align, StyleHint};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// Registry lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),
}

/// How one column of a resource table is computed and displayed
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub path: Vec<PathStep>,
    pub format: FormatHint,
    pub align: Align,
    pub style: StyleHint,
    pub min_width: Option<usize>,
}

impl ColumnSpec {
    /// Column reading a dotted path from the object's document
    pub fn new(name: &'static str, expr: &str) -> Self {
        Self {
            name,
            path: crate::extract::path(expr),
            format: FormatHint::default(),
            align: Align::Left,
            style: StyleHint::Normal,
            min_width: None,
        }
    }

    /// Append a step (usually a transform) to the column's path program
    pub fn then(mut self, step: PathStep) -> Self {
        self.path.push(step);
        self
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    pub fn style(mut self, style: StyleHint) -> Self {
        self.style = style;
        self
    }

    pub fn format(mut self, format: FormatHint) -> Self {
        self.format = format;
        self
    }

    pub fn min_width(mut self, width: usize) -> Self {
        self.min_width = Some(width);
        self
    }
}

/// Display and dispatch metadata for one resource kind
#[derive(Debug, Clone)]
pub struct ResourceType {
    /// Lower-cased singular kind, as passed to kubectl
    pub kind: &'static str,
    pub aliases: &'static [&'static str],
    pub columns: Vec<ColumnSpec>,
    pub has_namespace: bool,
    pub allowed_ops: BTreeSet<OperationKind>,
}

impl ResourceType {
    pub fn allows(&self, op: OperationKind) -> bool {
        self.allowed_ops.contains(&op)
    }

    /// Find a column by header name, case-insensitively
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.name).collect()
    }
}

/// Registry of resource types keyed by kind and alias
#[derive(Debug)]
pub struct ResourceRegistry {
    types: Vec<ResourceType>,
    index: HashMap<String, usize>,
}

impl ResourceRegistry {
    pub fn new(types: Vec<ResourceType>) -> Self {
        let mut index = HashMap::new();
        for (position, resource_type) in types.iter().enumerate() {
            index.insert(resource_type.kind.to_string(), position);
            for alias in resource_type.aliases {
                // Kind names win over aliases that happen to collide
                index.entry(alias.to_lowercase()).or_insert(position);
            }
        }
        Self { types, index }
    }

    /// Registry populated with the built-in kinds
    pub fn builtin() -> Self {
        Self::new(builtin::resource_types())
    }

    /// Process-wide built-in registry
    pub fn global() -> &'static ResourceRegistry {
        static REGISTRY: OnceLock<ResourceRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ResourceRegistry::builtin)
    }

    /// Resolve a kind name or alias, ignoring case and surrounding whitespace
    pub fn lookup(&self, kind: &str) -> Result<&ResourceType, RegistryError> {
        let key = kind.trim().to_lowercase();
        self.index
            .get(&key)
            .map(|position| &self.types[*position])
            .ok_or_else(|| RegistryError::UnknownKind(kind.trim().to_string()))
    }

    pub fn kinds(&self) -> BTreeSet<&'static str> {
        self.types.iter().map(|t| t.kind).collect()
    }

    /// Unknown kinds allow nothing
    pub fn is_operation_allowed(&self, kind: &str, op: OperationKind) -> bool {
        self.lookup(kind).map(|t| t.allows(op)).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
