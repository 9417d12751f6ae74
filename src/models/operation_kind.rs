//! Operations a resource type can permit

use std::fmt;
use std::str::FromStr;

/// Operation that may be allowed on a resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    Delete,
    ViewDetails,
    Logs,
    Exec,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Delete => "delete",
            OperationKind::ViewDetails => "view-details",
            OperationKind::Logs => "logs",
            OperationKind::Exec => "exec",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            OperationKind::Delete,
            OperationKind::ViewDetails,
            OperationKind::Logs,
            OperationKind::Exec,
        ]
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "delete" => Ok(OperationKind::Delete),
            "view-details" | "view" | "details" => Ok(OperationKind::ViewDetails),
            "logs" => Ok(OperationKind::Logs),
            "exec" => Ok(OperationKind::Exec),
            _ => Err(format!("Unknown operation: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for op in OperationKind::all() {
            assert_eq!(op.as_str().parse::<OperationKind>(), Ok(*op));
        }
    }

    #[test]
    fn test_unknown_operation() {
        assert!("scale".parse::<OperationKind>().is_err());
    }
}
