//! Trace Cost Studio
//!
//! Exclusive cost attribution, aggregation and cost modeling for kernel
//! execution traces.
//!
//! The pipeline runs one way:
//! - `parser` reads trace files into `TraceNode` trees
//! - `signature` and `aggregator` attribute an exclusive cost to each
//!   traced operation and group the samples by call-site signature
//! - `stats` summarizes each signature, fits size models and derives
//!   normalized cost coefficients
//! - `output` exposes the report tables and writes them out
//!
//! This crate provides the core implementation for the `trace-cost` CLI tool.

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod signature;
pub mod stats;
pub mod utils;
