//! Exclusive-cost aggregation by signature.
//!
//! One `CostAggregator` owns all state for the files it has ingested.
//! Aggregators built independently (e.g. one per worker) are combined with
//! `merge`, which is a plain multiset union, and frozen with `finalize`.
//! Entries are keyed by the whole signature while aggregating; `finalize`
//! rejects keys that two differently shaped signatures render to.

use super::self_cost::{exclusive_cost, SelfCost};
use crate::parser::TraceNode;
use crate::signature::{signature, Signature};
use crate::utils::config::OVERFLOW_THRESHOLD;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// All exclusive-cost samples recorded for one signature
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateEntry {
    pub signature: Signature,
    pub samples: Vec<i64>,
}

/// Run-level counters for samples that did not make it into an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounters {
    /// Trace trees ingested
    pub files_processed: usize,

    /// Samples dropped because they exceeded the calibration threshold
    pub overflow_samples: u64,

    /// Samples below the calibration threshold that do not fit a signed
    /// 64-bit sample
    #[serde(default)]
    pub unrepresentable_samples: u64,

    /// Samples dropped because their key is shared by signatures of
    /// different shapes (sized vs. unsized)
    #[serde(default)]
    pub conflicting_samples: u64,

    /// Recorded samples whose exclusive cost was negative
    pub negative_samples: u64,

    /// Nodes excluded as early-returning calls
    pub excluded_early_returns: u64,
}

impl AggregateCounters {
    fn absorb(&mut self, other: &AggregateCounters) {
        self.files_processed += other.files_processed;
        self.overflow_samples += other.overflow_samples;
        self.unrepresentable_samples += other.unrepresentable_samples;
        self.conflicting_samples += other.conflicting_samples;
        self.negative_samples += other.negative_samples;
        self.excluded_early_returns += other.excluded_early_returns;
    }
}

/// Mutable aggregation state
#[derive(Debug, Clone, Default)]
pub struct CostAggregator {
    entries: HashMap<Signature, AggregateEntry>,
    counters: AggregateCounters,
}

impl CostAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one parsed trace tree
    ///
    /// **Public** - main entry point for aggregation
    ///
    /// Every node of the tree is costed; sibling order does not matter.
    pub fn ingest(&mut self, root: &TraceNode) {
        for node in root.iter() {
            match exclusive_cost(node) {
                SelfCost::Unmetered => {}
                SelfCost::ReturnedEarly => self.counters.excluded_early_returns += 1,
                SelfCost::Exclusive(cost) => self.record(signature(node), cost),
            }
        }

        self.counters.files_processed += 1;
        debug!(
            "Ingested trace: {} signatures so far, {} overflow samples",
            self.entries.len(),
            self.counters.overflow_samples
        );
    }

    /// Record one exclusive-cost sample
    ///
    /// Values above the calibration threshold are counted and dropped,
    /// as are values outside the signed 64-bit sample range.
    pub fn record(&mut self, signature: Signature, cost: i128) {
        if cost > i128::from(OVERFLOW_THRESHOLD) {
            warn!("Dropping overflow sample {} for {}", cost, signature);
            self.counters.overflow_samples += 1;
            return;
        }
        let Ok(sample) = i64::try_from(cost) else {
            warn!("Dropping out-of-range sample {} for {}", cost, signature);
            self.counters.unrepresentable_samples += 1;
            return;
        };

        if sample < 0 {
            self.counters.negative_samples += 1;
        }

        self.entries
            .entry(signature.clone())
            .or_insert_with(|| AggregateEntry {
                signature,
                samples: Vec::new(),
            })
            .samples
            .push(sample);
    }

    /// Multiset union of two aggregates
    pub fn merge(mut self, other: CostAggregator) -> CostAggregator {
        for (signature, entry) in other.entries {
            match self.entries.entry(signature) {
                Entry::Occupied(mut existing) => existing.get_mut().samples.extend(entry.samples),
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
            }
        }
        self.counters.absorb(&other.counters);
        self
    }

    pub fn counters(&self) -> &AggregateCounters {
        &self.counters
    }

    pub fn signature_count(&self) -> usize {
        self.entries.len()
    }

    /// Freeze into a read-only table ordered by signature key
    ///
    /// A key rendered by more than one signature shape cannot identify a
    /// call site; all of its samples are dropped and counted.
    pub fn finalize(self) -> AggregateTable {
        let mut counters = self.counters;
        let mut by_key: BTreeMap<String, Vec<AggregateEntry>> = BTreeMap::new();
        for (signature, entry) in self.entries {
            by_key.entry(signature.key).or_default().push(entry);
        }

        let mut entries = BTreeMap::new();
        for (key, mut shapes) in by_key {
            if shapes.len() == 1 {
                if let Some(entry) = shapes.pop() {
                    entries.insert(key, entry);
                }
                continue;
            }

            let dropped: usize = shapes.iter().map(|e| e.samples.len()).sum();
            warn!(
                "Key {} is shared by {} signature shapes, dropping {} samples",
                key,
                shapes.len(),
                dropped
            );
            counters.conflicting_samples += dropped as u64;
        }

        AggregateTable { entries, counters }
    }
}

/// Read-only aggregate, ordered by signature key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateTable {
    pub entries: BTreeMap<String, AggregateEntry>,
    pub counters: AggregateCounters,
}

impl AggregateTable {
    pub fn get(&self, key: &str) -> Option<&AggregateEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_samples(&self) -> usize {
        self.entries.values().map(|e| e.samples.len()).sum()
    }
}
