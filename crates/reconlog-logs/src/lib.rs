//! Log processing for reconlog
//!
//! This crate turns raw controller-runtime log lines into records: it joins
//! multi-line error blocks, parses klog and JSON encodings, and filters the
//! result.

mod filter;
mod parser;
mod reassembler;

pub use filter::RecordFilter;
pub use parser::{ParseError, RecordParser};
pub use reassembler::Reassembler;

// Re-export types used in our public API
pub use reconlog_types::{Fields, Level, Record};
