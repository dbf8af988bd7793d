//! Trace file parser.
//!
//! Reads the XML emitted by the runtime's resource tracker into an owned
//! `TraceNode` tree. The document root element is a container; each traced
//! operation below it is an element named after the operation kind.

use super::schema::TraceNode;
use crate::utils::config::{INSTRUCTIONS_ATTR, TRACE_FILE_EXTENSION};
use crate::utils::error::ParseError;
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parse one trace file from disk
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::UnsupportedExtension` - File is not a `.xml` trace
/// * `ParseError::Unreadable` - File cannot be read
/// * `ParseError::Malformed` - Markup does not parse
/// * `ParseError::InvalidInstructionCount` - An `ins` attribute is not a number
pub fn parse_trace_file(path: impl AsRef<Path>) -> Result<TraceNode, ParseError> {
    let path = path.as_ref();

    if !has_trace_extension(path) {
        return Err(ParseError::UnsupportedExtension(path.to_path_buf()));
    }

    debug!("Parsing trace file: {}", path.display());
    let contents = fs::read_to_string(path)?;
    let root = parse_trace_str(&contents)?;

    debug!(
        "Parsed {} nodes from {}",
        root.node_count(),
        path.display()
    );
    Ok(root)
}

/// Parse trace markup held in memory
pub fn parse_trace_str(contents: &str) -> Result<TraceNode, ParseError> {
    let document = roxmltree::Document::parse(contents)?;
    convert_element(document.root_element())
}

/// Whether a path carries the trace file extension
pub fn has_trace_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TRACE_FILE_EXTENSION))
}

/// Convert a markup element and everything below it
///
/// **Private** - internal helper for parse_trace_str
fn convert_element(element: roxmltree::Node<'_, '_>) -> Result<TraceNode, ParseError> {
    let tag = element.tag_name().name().to_string();

    let attributes: BTreeMap<String, String> = element
        .attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();

    if let Some(value) = attributes.get(INSTRUCTIONS_ATTR) {
        if parse_instruction_count(value).is_err() {
            return Err(ParseError::InvalidInstructionCount {
                tag,
                value: value.clone(),
            });
        }
    }

    let children = element
        .children()
        .filter(|n| n.is_element())
        .map(convert_element)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TraceNode {
        tag,
        attributes,
        children,
    })
}

/// Parse an instruction count from hex or decimal
pub fn parse_instruction_count(value: &str) -> Result<u64, std::num::ParseIntError> {
    let value = value.trim();
    if let Some(hex_str) = value.strip_prefix("0x") {
        u64::from_str_radix(hex_str, 16)
    } else {
        value.parse::<u64>()
    }
}
