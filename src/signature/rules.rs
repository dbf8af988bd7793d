//! Operation-kind rule registry.
//!
//! Each traced operation kind maps to the ordered list of attribute
//! lookups whose values distinguish its call sites. Kinds without a rule
//! are keyed by their bare tag.

use super::extractor::normalize_value;
use crate::parser::TraceNode;
use log::debug;

/// Invoked functions whose cost scales with the invocation input size
pub const SIZED_INVOKE_FUNCTIONS: &[&str] = &["publish_native", "publish_wasm_advanced"];

/// Where a signature segment is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStep {
    /// Attribute on the node itself
    Attribute(&'static str),

    /// Attribute of the direct children with `tag`
    Child {
        tag: &'static str,
        attribute: &'static str,
    },

    /// Attribute of the nodes reached from a descendant (pre-order, self
    /// excluded) tagged `path[0]` by following the rest of `path` one
    /// child level per element
    Descendant {
        path: &'static [&'static str],
        attribute: &'static str,
    },
}

impl ExtractionStep {
    /// Raw attribute value, or `None` when the source is absent
    ///
    /// `Child` and `Descendant` sources must be unambiguous: when several
    /// matches carry different values the segment is omitted.
    pub fn resolve<'a>(&self, node: &'a TraceNode) -> Option<&'a str> {
        match *self {
            ExtractionStep::Attribute(name) => node.attr(name),
            ExtractionStep::Child { tag, attribute } => unique_value(
                node.children_tagged(tag).filter_map(|c| c.attr(attribute)),
                tag,
            ),
            ExtractionStep::Descendant { path, attribute } => {
                let (first, rest) = path.split_first()?;
                let matches = node
                    .iter()
                    .skip(1)
                    .filter(|d| d.tag == *first)
                    .flat_map(|d| d.follow_path(rest));
                unique_value(matches.filter_map(|d| d.attr(attribute)), first)
            }
        }
    }
}

/// **Private** - the single value shared by every match, if any
fn unique_value<'a>(mut values: impl Iterator<Item = &'a str>, source: &str) -> Option<&'a str> {
    let first = values.next()?;
    match values.find(|v| *v != first) {
        None => Some(first),
        Some(other) => {
            debug!(
                "Ambiguous <{}> source ({:?} vs {:?}), segment omitted",
                source, first, other
            );
            None
        }
    }
}

/// Limits a size step to call sites whose gate value is listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeGate {
    pub step: ExtractionStep,
    pub values: &'static [&'static str],
}

/// Signature rule for one operation kind
#[derive(Debug, Clone, Copy)]
pub struct OperationRule {
    pub tag: &'static str,

    /// Discriminant segments, in key order
    pub steps: &'static [ExtractionStep],

    /// Input size the cost scales with, appended as the last segment
    pub size: Option<ExtractionStep>,

    /// When set, `size` only applies to call sites passing the gate
    pub size_gate: Option<SizeGate>,
}

impl OperationRule {
    /// Whether any call site of this kind can carry a size segment
    pub fn is_size_dependent(&self) -> bool {
        self.size.is_some()
    }

    /// Size step applying to this particular node
    pub fn size_step(&self, node: &TraceNode) -> Option<ExtractionStep> {
        let step = self.size?;
        match self.size_gate {
            None => Some(step),
            Some(gate) => {
                let value = normalize_value(gate.step.resolve(node)?);
                gate.values.contains(&value.as_str()).then_some(step)
            }
        }
    }
}

const fn keyed(tag: &'static str, steps: &'static [ExtractionStep]) -> OperationRule {
    OperationRule {
        tag,
        steps,
        size: None,
        size_gate: None,
    }
}

const fn sized(
    tag: &'static str,
    steps: &'static [ExtractionStep],
    size_attr: &'static str,
) -> OperationRule {
    OperationRule {
        tag,
        steps,
        size: Some(ExtractionStep::Attribute(size_attr)),
        size_gate: None,
    }
}

use ExtractionStep::{Attribute, Child, Descendant};

/// Built-in rule table
pub const RULES: &[OperationRule] = &[
    OperationRule {
        tag: "kernel_invoke",
        steps: &[
            Child { tag: "invoke", attribute: "kind" },
            Child { tag: "invoke", attribute: "package" },
            Child { tag: "invoke", attribute: "function" },
        ],
        size: Some(Child { tag: "before_invoke", attribute: "size" }),
        size_gate: Some(SizeGate {
            step: Child { tag: "invoke", attribute: "function" },
            values: SIZED_INVOKE_FUNCTIONS,
        }),
    },
    keyed("kernel_create_node", &[Attribute("node_type")]),
    keyed("kernel_drop_node", &[Attribute("node_type")]),
    keyed("kernel_allocate_node_id", &[Attribute("entity_type")]),
    keyed("kernel_lock_substate", &[Attribute("module"), Attribute("offset")]),
    keyed(
        "kernel_read_substate",
        &[Descendant { path: &["on_read_substate"], attribute: "module" }],
    ),
    keyed(
        "kernel_write_substate",
        &[Descendant { path: &["on_write_substate"], attribute: "module" }],
    ),
    keyed("consume_cost_units", &[Attribute("reason")]),
    sized("kernel_drain_substates", &[Attribute("module")], "count"),
    sized("kernel_scan_sorted_substates", &[Attribute("module")], "count"),
    sized("before_invoke", &[], "size"),
    sized("after_invoke", &[], "size"),
    sized("crypto_utils_keccak256_hash", &[], "size"),
    sized("crypto_utils_blake2b_256_hash", &[], "size"),
    sized("crypto_utils_ed25519_verify", &[], "size"),
    sized("crypto_utils_secp256k1_ecdsa_verify", &[], "size"),
];

/// Rule registered for an operation kind
pub fn rule_for(tag: &str) -> Option<&'static OperationRule> {
    RULES.iter().find(|r| r.tag == tag)
}
