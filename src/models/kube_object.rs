//! Kubernetes objects as returned by `kubectl get -o json`
//!
//! The raw document is kept as the single source of truth. Only the identity
//! fields (kind, namespace, name) are lifted out; every displayed value is
//! derived from `raw` on demand by the path extractor.

use serde_json::Value;

/// Errors raised while turning a kubectl response into objects
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("document has no `kind` field")]
    MissingKind,

    #[error("{0} document has no `metadata.name`")]
    MissingName(String),

    #[error("List document has no `items` array")]
    MissingItems,
}

/// A single object reported by kubectl
#[derive(Debug, Clone, PartialEq)]
pub struct KubeObject {
    /// Lower-cased resource kind (`pod`, `node`, ...)
    pub kind: String,
    /// `metadata.namespace`, absent for cluster-scoped objects
    pub namespace: Option<String>,
    /// `metadata.name`
    pub name: String,
    /// The full parsed document
    pub raw: Value,
}

impl KubeObject {
    /// Build an object from a single (non-List) document
    pub fn from_document(raw: Value) -> Result<Self, ParseError> {
        if !raw.is_object() {
            return Err(ParseError::NotAnObject(json_type_name(&raw)));
        }

        let kind = raw
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingKind)?
            .to_lowercase();

        let metadata = raw.get("metadata");
        let name = metadata
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::MissingName(kind.clone()))?
            .to_string();
        let namespace = metadata
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            kind,
            namespace,
            name,
            raw,
        })
    }

    /// `kind/name`, the form kubectl accepts as a resource argument
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.kind, self.name)
    }

    /// Human-readable reference including the namespace when there is one
    pub fn display_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{} in {}", self.qualified_name(), ns),
            None => self.qualified_name(),
        }
    }
}

/// Ordered list of objects produced by one listing call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectList {
    pub items: Vec<KubeObject>,
}

impl ObjectList {
    /// Parse a kubectl response.
    ///
    /// A document whose `kind` is `List` is unwrapped through its `items`
    /// (recursively, nested lists are flattened). Any other document is
    /// promoted to a one-item list so callers never special-case single gets.
    pub fn from_document(document: Value) -> Result<Self, ParseError> {
        let mut items = Vec::new();
        collect_objects(document, &mut items)?;
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KubeObject> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KubeObject> {
        self.items.iter()
    }
}

fn collect_objects(document: Value, out: &mut Vec<KubeObject>) -> Result<(), ParseError> {
    let is_list = document
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.eq_ignore_ascii_case("list"));

    if !is_list {
        out.push(KubeObject::from_document(document)?);
        return Ok(());
    }

    let Value::Object(mut map) = document else {
        return Err(ParseError::NotAnObject("non-object"));
    };
    match map.remove("items") {
        Some(Value::Array(items)) => {
            for item in items {
                collect_objects(item, out)?;
            }
            Ok(())
        }
        Some(Value::Null) => Ok(()),
        _ => Err(ParseError::MissingItems),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
