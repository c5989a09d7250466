//! IO utilities
//!
//! Reader/writer based codecs; opening files stays with the caller.

pub mod delimited;

// Re-export commonly used functions for convenience
pub use delimited::{format_record, parse_line, read_records, write_records};
