//! In-memory trace tree definitions.
//!
//! A trace file is one recorded run of the instrumented runtime. Every
//! traced operation becomes a node named after the operation kind, with
//! the logged call arguments as attributes and nested operations as
//! children.

use crate::utils::config::{INSTRUCTIONS_ATTR, MULTIPLIER_ATTR, RETURN_ATTR};
use std::collections::BTreeMap;

/// One traced operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraceNode {
    /// Operation kind (e.g. "kernel_invoke")
    pub tag: String,

    /// Kind-specific arguments as written by the instrumentation
    pub attributes: BTreeMap<String, String>,

    /// Nested operations in recording order
    pub children: Vec<TraceNode>,
}

impl TraceNode {
    /// Create a leaf node without attributes
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style instruction count setter
    pub fn with_instructions(self, ins: u64) -> Self {
        self.with_attr(INSTRUCTIONS_ATTR, ins.to_string())
    }

    /// Builder-style child appender
    pub fn with_child(mut self, child: TraceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Reported instruction count, if this node was metered
    ///
    /// Counts are validated when the file is parsed, so a present but
    /// unparsable value can only come from a hand-built tree.
    pub fn instructions(&self) -> Option<u64> {
        self.attr(INSTRUCTIONS_ATTR)
            .and_then(|v| super::trace_xml::parse_instruction_count(v).ok())
    }

    /// Whether the call was marked as returning before doing any work
    pub fn returned_early(&self) -> bool {
        self.attr(RETURN_ATTR) == Some("true")
    }

    /// Whether this operation's cost is tracked and multiplied on its own
    pub fn is_separately_metered(&self) -> bool {
        self.attributes.contains_key(MULTIPLIER_ATTR)
    }

    /// Direct children with the given tag, in recording order
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceNode> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Every node reached by following `path` one child level per element
    pub fn follow_path(&self, path: &[&str]) -> Vec<&TraceNode> {
        let Some((first, rest)) = path.split_first() else {
            return vec![self];
        };
        self.children
            .iter()
            .filter(|c| c.tag == *first)
            .flat_map(|c| c.follow_path(rest))
            .collect()
    }

    /// Whether this node or any node below it satisfies `pred`
    pub fn any_in_subtree(&self, pred: &impl Fn(&TraceNode) -> bool) -> bool {
        pred(self) || self.children.iter().any(|c| c.any_in_subtree(pred))
    }

    /// Total number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TraceNode::node_count).sum::<usize>()
    }

    /// Pre-order iterator over this subtree, including self
    pub fn iter(&self) -> TraceIter<'_> {
        TraceIter { stack: vec![self] }
    }
}

/// Pre-order traversal over a trace tree
pub struct TraceIter<'a> {
    stack: Vec<&'a TraceNode>,
}

impl<'a> Iterator for TraceIter<'a> {
    type Item = &'a TraceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
