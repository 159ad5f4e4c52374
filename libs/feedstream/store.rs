//! Bounded, time-ordered store of transaction records.
//!
//! The store is the single source of truth the presentation layer reads.
//! Ordering is maintained on `append` rather than re-sorted on every read,
//! so a snapshot is a plain ordered copy.

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use crate::record::{TransactionRecord, TxId};
use crate::traits::error::{FeedError, Result};

/// Ordering key: timestamp first, then arrival sequence.
///
/// Iterating the map ascending yields oldest-timestamp first; among equal
/// timestamps, the earlier arrival first. Snapshots reverse this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct EntryKey {
    timestamp: NaiveDateTime,
    seq: u64,
}

#[derive(Debug, Default)]
struct StoreInner {
    ordered: BTreeMap<EntryKey, TransactionRecord>,
    index: HashMap<TxId, EntryKey>,
    next_seq: u64,
}

/// Ordered, deduplicated, capacity-bounded collection of transactions
///
/// Shared as `Arc<FeedStore>` between the consumer task (sole writer via
/// [`append`](FeedStore::append)) and presentation readers (via
/// [`snapshot`](FeedStore::snapshot)).
///
/// Dedup policy: **latest write for an `id` wins** and fully replaces the
/// prior entry — content and ordering position both follow the new record.
/// The backend re-emits an `id` when a verdict lands on a previously pending
/// transaction, and the re-emission is the authoritative record.
#[derive(Debug)]
pub struct FeedStore {
    capacity: usize,
    inner: RwLock<StoreInner>,
}

impl FeedStore {
    /// Create a store retaining at most `capacity` records
    ///
    /// A capacity of zero is rejected: a store that can hold nothing cannot
    /// satisfy its ordering contract.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(FeedError::Configuration(
                "feed store capacity must be positive".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            inner: RwLock::new(StoreInner::default()),
        })
    }

    /// Insert a record, replacing any prior record with the same `id`
    ///
    /// When the store exceeds capacity, oldest-by-timestamp records are
    /// evicted until it is back at capacity. A record older than everything
    /// retained may be evicted by its own append.
    pub fn append(&self, record: TransactionRecord) {
        let mut inner = self.inner.write();

        if let Some(prior) = inner.index.remove(&record.id) {
            inner.ordered.remove(&prior);
        }

        let key = EntryKey {
            timestamp: record.timestamp,
            seq: inner.next_seq,
        };
        inner.next_seq += 1;
        inner.index.insert(record.id.clone(), key);
        inner.ordered.insert(key, record);

        while inner.ordered.len() > self.capacity {
            if let Some((_, evicted)) = inner.ordered.pop_first() {
                inner.index.remove(&evicted.id);
            }
        }
    }

    /// Point-in-time copy of the store, newest timestamp first
    ///
    /// Equal timestamps order by arrival, most recent arrival first. The
    /// returned records are owned; later appends never show through.
    pub fn snapshot(&self) -> Vec<TransactionRecord> {
        self.inner.read().ordered.values().rev().cloned().collect()
    }

    /// Number of records currently retained
    pub fn len(&self) -> usize {
        self.inner.read().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().ordered.is_empty()
    }

    /// Configured retention bound
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a record with this `id` is currently retained
    pub fn contains(&self, id: &TxId) -> bool {
        self.inner.read().index.contains_key(id)
    }
}
