//! Call-site signatures for traced operations.
//!
//! Per-kind extraction knowledge lives in a declarative rule table;
//! the extractor evaluates it uniformly for every node.

pub mod extractor;
pub mod rules;

pub use extractor::{balance_parens, normalize_value, signature, Signature};
pub use rules::{rule_for, ExtractionStep, OperationRule, SizeGate, RULES, SIZED_INVOKE_FUNCTIONS};
