//! TUI view components
//!
//! Each component renders one part of the interface from plain data; none of
//! them own state.

mod confirmation;
mod detail;
mod footer;
mod header;
mod help;
pub mod helpers;
mod picker;
mod resource_table;

pub use confirmation::*;
pub use detail::*;
pub use footer::*;
pub use header::*;
pub use help::*;
pub use picker::*;
pub use resource_table::*;
