//! Domain models
//!
//! Objects parsed out of kubectl output and the operations that can be applied to them.

mod kube_object;
mod operation_kind;

pub use kube_object::{KubeObject, ObjectList, ParseError};
pub use operation_kind::OperationKind;
