//! Tool usage tracking for tool-picker personalization.
//!
//! Advisory by contract: a failed persist is logged and reported through an
//! error the caller may ignore, and ranking keeps working from the in-memory
//! ledger. Nothing here may panic or block the host UI.

pub mod store;

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use store::{FileUsageStore, UsageResult, UsageStore, UsageStoreError};

/// Per-slug counter. `last_used` is epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolUsage {
    pub count: u64,
    pub last_used: i64,
}

/// Flat mapping from tool slug to its counter. Serializes as a single JSON
/// object, which is also the on-disk shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageLedger {
    entries: BTreeMap<String, ToolUsage>,
}

impl UsageLedger {
    pub fn get(&self, slug: &str) -> Option<ToolUsage> {
        self.entries.get(slug).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn bump(&mut self, slug: &str, timestamp_millis: i64) {
        match self.entries.entry(slug.to_string()) {
            Entry::Occupied(mut entry) => {
                let usage = entry.get_mut();
                usage.count = usage.count.saturating_add(1);
                usage.last_used = timestamp_millis;
            }
            Entry::Vacant(entry) => {
                entry.insert(ToolUsage {
                    count: 1,
                    last_used: timestamp_millis,
                });
            }
        }
    }

    fn ranked(&self) -> Vec<(&str, ToolUsage)> {
        let mut entries: Vec<(&str, ToolUsage)> = self
            .entries
            .iter()
            .map(|(slug, usage)| (slug.as_str(), *usage))
            .collect();
        entries.sort_by(|a, b| compare_usage(&b.1, &a.1));
        entries
    }
}

/// Primary key descending count, tie-break descending recency.
fn compare_usage(a: &ToolUsage, b: &ToolUsage) -> Ordering {
    a.count
        .cmp(&b.count)
        .then_with(|| a.last_used.cmp(&b.last_used))
}

/// Tracks how often and how recently each tool was invoked.
#[derive(Debug)]
pub struct UsageTracker<S> {
    store: S,
    ledger: UsageLedger,
}

impl<S: UsageStore> UsageTracker<S> {
    /// Load the persisted ledger through `store`. A missing, unreadable, or
    /// corrupt ledger degrades to an empty one with a logged warning.
    pub fn new(store: S) -> Self {
        let ledger = store.load().unwrap_or_else(|err| {
            tracing::warn!(?err, "failed to load usage ledger; starting empty");
            UsageLedger::default()
        });
        Self { store, ledger }
    }

    /// Record one invocation of `slug` and persist the ledger. The returned
    /// error is advisory: the in-memory ledger is already updated, and the
    /// caller may ignore the failure.
    pub fn record_usage(&mut self, slug: &str) -> UsageResult<()> {
        self.record_usage_at(slug, Utc::now().timestamp_millis())
    }

    /// Same as [`record_usage`](Self::record_usage) with an explicit
    /// timestamp, for replaying history.
    pub fn record_usage_at(&mut self, slug: &str, timestamp_millis: i64) -> UsageResult<()> {
        self.ledger.bump(slug, timestamp_millis);
        self.store.save(&self.ledger).inspect_err(|err| {
            tracing::warn!(slug, ?err, "failed to persist usage ledger");
        })
    }

    pub fn usage_of(&self, slug: &str) -> Option<ToolUsage> {
        self.ledger.get(slug)
    }

    /// Up to `limit` slugs, most used first, most recent on ties. Empty when
    /// nothing was ever recorded.
    pub fn ranked_slugs(&self, limit: usize) -> Vec<String> {
        self.ledger
            .ranked()
            .into_iter()
            .take(limit)
            .map(|(slug, _)| slug.to_string())
            .collect()
    }

    /// Stable partition of `items`: entries with a usage record first,
    /// ordered as in [`ranked_slugs`](Self::ranked_slugs); entries without
    /// one follow in their original relative order. Unused tools are
    /// deprioritized, never hidden.
    pub fn sort_by_usage<T, F>(&self, items: Vec<T>, slug_of: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        let mut recorded: Vec<(ToolUsage, T)> = Vec::new();
        let mut unrecorded: Vec<T> = Vec::new();

        for item in items {
            match self.ledger.get(slug_of(&item)) {
                Some(usage) => recorded.push((usage, item)),
                None => unrecorded.push(item),
            }
        }

        recorded.sort_by(|a, b| compare_usage(&b.0, &a.0));

        recorded
            .into_iter()
            .map(|(_, item)| item)
            .chain(unrecorded)
            .collect()
    }
}
