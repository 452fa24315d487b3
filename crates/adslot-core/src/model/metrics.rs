use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::HashMap};

///
/// MetricKind
/// Enumerates the SDK-facing actions we count.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[remain::sorted]
pub enum MetricKind {
    CommandDropped,
    CommandFailed,
    ConsentTimeout,
    OutOfPageDeclined,
    OutOfPageDisplayed,
    PrivacyApplied,
    RefreshIssued,
    ScriptInjected,
    ServicesEnabled,
    SlotDefined,
    SlotDestroyed,
    SlotDisplayed,
}

///
/// MetricEntry
/// Snapshot entry pairing a metric kind with its count.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MetricEntry {
    pub kind: MetricKind,
    pub count: u64,
}

///
/// MetricsSnapshot
///

pub type MetricsSnapshot = Vec<MetricEntry>;

///
/// Metrics
///
/// Volatile per-session counters. They live as long as the session and are
/// never persisted.
///

#[derive(Debug, Default)]
pub struct Metrics {
    counts: RefCell<HashMap<MetricKind, u64>>,
}

impl Metrics {
    pub fn increment(&self, kind: MetricKind) {
        self.add(kind, 1);
    }

    pub fn add(&self, kind: MetricKind, n: u64) {
        let mut counts = self.counts.borrow_mut();
        let entry = counts.entry(kind).or_insert(0);
        *entry = entry.saturating_add(n);
    }

    #[must_use]
    pub fn get(&self, kind: MetricKind) -> u64 {
        self.counts.borrow().get(&kind).copied().unwrap_or(0)
    }

    /// All non-zero counters, sorted by kind.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut entries: Vec<MetricEntry> = self
            .counts
            .borrow()
            .iter()
            .map(|(kind, count)| MetricEntry {
                kind: *kind,
                count: *count,
            })
            .collect();
        entries.sort_by_key(|entry| entry.kind);

        entries
    }
}

///
/// TESTS
///
