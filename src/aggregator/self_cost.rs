//! Exclusive (self) cost of a traced operation.
//!
//! The instrumentation reports inclusive instruction counts: a node's
//! count covers everything nested inside it. Two kinds of nested cost are
//! removed so each operation is only charged for its own work:
//! - nested operations of the same kind, which are aggregated at their
//!   own level;
//! - separately metered operations, which carry their own cost entry.

use crate::parser::TraceNode;
use crate::utils::config::{EXECUTE_SCOPE_TAG, NESTED_SEARCH_DEPTH};

/// Result of costing one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfCost {
    /// Node carries no instruction count (containers, argument nodes)
    Unmetered,

    /// Zero-cost call that returned early; not a real invocation
    ReturnedEarly,

    /// Exclusive instruction count; may be negative when nested
    /// subtractions overlap
    Exclusive(i128),
}

/// Compute the exclusive cost of a node
///
/// **Public** - main entry point for self-cost calculation
pub fn exclusive_cost(node: &TraceNode) -> SelfCost {
    let Some(reported) = node.instructions() else {
        return SelfCost::Unmetered;
    };

    if reported == 0 && node.any_in_subtree(&TraceNode::returned_early) {
        return SelfCost::ReturnedEarly;
    }

    let nested: i128 = nested_same_kind(node)
        .iter()
        .chain(separately_metered_children(node).iter())
        .map(|n| i128::from(n.instructions().unwrap_or(0)))
        .sum();

    SelfCost::Exclusive(i128::from(reported) - nested)
}

/// Nearest descendants sharing the node's tag
///
/// A match may sit behind at most `NESTED_SEARCH_DEPTH` intervening
/// nodes of other kinds. The walk never descends past a same-tag node, so
/// occurrences shadowed by an intermediate same-tag operation are left to
/// that operation.
pub fn nested_same_kind(node: &TraceNode) -> Vec<&TraceNode> {
    let mut found = Vec::new();
    collect_same_kind(&node.tag, &node.children, 0, &mut found);
    found
}

/// **Private** - recursive helper for nested_same_kind
///
/// `crossed` counts the non-matching nodes between the origin and `children`.
fn collect_same_kind<'a>(
    tag: &str,
    children: &'a [TraceNode],
    crossed: usize,
    found: &mut Vec<&'a TraceNode>,
) {
    for child in children {
        if child.tag == tag {
            found.push(child);
        } else if crossed < NESTED_SEARCH_DEPTH {
            collect_same_kind(tag, &child.children, crossed + 1, found);
        }
    }
}

/// Direct children, and children of a direct `execute` scope, whose cost
/// is metered separately
pub fn separately_metered_children(node: &TraceNode) -> Vec<&TraceNode> {
    node.children
        .iter()
        .flat_map(|child| {
            let scoped: &[TraceNode] = if child.tag == EXECUTE_SCOPE_TAG {
                &child.children
            } else {
                &[]
            };
            std::iter::once(child).chain(scoped.iter())
        })
        .filter(|n| n.is_separately_metered())
        .collect()
}
