//! Trace parsing and tree model.
//!
//! This module handles:
//! - Reading trace files emitted by the runtime instrumentation
//! - Converting markup into an owned node tree
//! - Validating instruction counts up front

pub mod schema;
pub mod trace_xml;

// Re-export main types
pub use schema::{TraceIter, TraceNode};
pub use trace_xml::{has_trace_extension, parse_instruction_count, parse_trace_file, parse_trace_str};
