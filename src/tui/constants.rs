//! Constants used throughout the TUI module

/// Status message timeout in seconds
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 4;

/// Header height including borders
pub const HEADER_HEIGHT: u16 = 4;

/// Event poll interval in milliseconds
pub const EVENT_POLL_MS: u64 = 100;

/// Lines kept in the detail view while streaming
pub const MAX_STREAM_LINES: usize = 10_000;
