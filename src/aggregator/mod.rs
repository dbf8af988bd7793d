//! Aggregation of trace trees into per-signature cost samples.
//!
//! This module transforms parsed traces into:
//! - Exclusive (self) costs per traced operation
//! - Sample multisets keyed by call-site signature
//! - Run counters for dropped and excluded samples

pub mod batch;
pub mod collector;
pub mod self_cost;

// Re-export main types and functions
pub use batch::{aggregate_files, aggregate_files_with_jobs, discover_trace_files, BatchResult};
pub use collector::{AggregateCounters, AggregateEntry, AggregateTable, CostAggregator};
pub use self_cost::{exclusive_cost, nested_same_kind, separately_metered_children, SelfCost};
