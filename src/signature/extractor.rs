//! Canonical signature construction.
//!
//! A signature is the operation tag followed by the discriminant values
//! selected by the tag's rule, joined with `::`. Size-dependent operations
//! carry their input size as a final segment so the whole family can be
//! regressed against it later.

use super::rules::rule_for;
use crate::parser::TraceNode;
use crate::utils::config::SEGMENT_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical call-site key for one traced operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    /// Full key, including the size segment when present
    pub key: String,

    /// Key without the size segment; shared by a size family
    pub base: String,

    /// Input size for size-dependent operations
    pub size: Option<u64>,
}

impl Signature {
    /// Signature for a tag with no discriminants
    pub fn bare(tag: &str) -> Self {
        let key = balance_parens(tag);
        Self {
            base: key.clone(),
            key,
            size: None,
        }
    }

    pub fn is_size_dependent(&self) -> bool {
        self.size.is_some()
    }

    /// Operation tag the signature was built from
    pub fn tag(&self) -> &str {
        self.key
            .split(SEGMENT_SEPARATOR)
            .next()
            .unwrap_or(&self.key)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Build the signature of a node
///
/// **Public** - main entry point for signature extraction
///
/// Steps whose source is missing contribute no segment. Attributes that
/// no step names never influence the result.
pub fn signature(node: &TraceNode) -> Signature {
    let Some(rule) = rule_for(&node.tag) else {
        return Signature::bare(&node.tag);
    };

    let mut segments = vec![node.tag.clone()];
    segments.extend(
        rule.steps
            .iter()
            .filter_map(|step| step.resolve(node))
            .map(normalize_value)
            .filter(|v| !v.is_empty()),
    );
    let base = balance_parens(&segments.join(SEGMENT_SEPARATOR));

    let size = rule
        .size_step(node)
        .and_then(|step| step.resolve(node))
        .and_then(|v| normalize_value(v).parse::<u64>().ok());

    let key = match size {
        Some(size) => format!("{}{}{}", base, SEGMENT_SEPARATOR, size),
        None => base.clone(),
    };

    Signature { key, base, size }
}

/// Unquote a raw attribute value and cut list values at their first item
pub fn normalize_value(raw: &str) -> String {
    let mut value = raw.trim();

    if let Some(list) = value.strip_prefix('[') {
        let list = list.strip_suffix(']').unwrap_or(list);
        value = list.split(',').next().unwrap_or(list).trim();
    }

    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value = &value[1..value.len() - 1];
    }

    value.to_string()
}

/// Make parentheses in a key balanced
///
/// Closing parentheses without an opener are dropped, and every opener
/// left unclosed gets a `)` appended.
pub fn balance_parens(key: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(key.len());

    for c in key.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' if depth == 0 => {}
            ')' => {
                depth -= 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out.extend(std::iter::repeat(')').take(depth));
    out
}
