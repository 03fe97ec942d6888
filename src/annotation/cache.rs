use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use dashmap::DashMap;

use crate::annotation::model::AnnotationRecord;

/// Bounds for [`RecordCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CacheOpts {
    /// Maximum retained records; the oldest insertions are evicted past this. `0` disables
    /// caching.
    pub max_entries: usize,
    /// Records older than this are treated as absent and dropped on access.
    #[serde(default, with = "crate::foundation::core::opt_secs")]
    pub ttl: Option<Duration>,
}

impl Default for CacheOpts {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            ttl: None,
        }
    }
}

/// Snapshot of cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Retained records.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that fell through to the store.
    pub misses: u64,
    /// Records dropped by the size bound or TTL.
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Clone, Debug)]
struct CacheSlot {
    record: Arc<AnnotationRecord>,
    inserted_at: Instant,
    seq: u64,
}

/// Process-wide memo of fetched records keyed by track name.
///
/// Entries are write-once: an insert for a key that already holds a live record returns the
/// existing record instead of replacing it, so concurrent first writers converge on one value.
#[derive(Debug)]
pub struct RecordCache {
    opts: CacheOpts,
    slots: DashMap<String, CacheSlot>,
    next_seq: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new(CacheOpts::default())
    }
}

impl RecordCache {
    /// Create an empty cache.
    pub fn new(opts: CacheOpts) -> Self {
        Self {
            opts,
            slots: DashMap::new(),
            next_seq: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Configured bounds.
    pub fn opts(&self) -> CacheOpts {
        self.opts
    }

    /// Look up a live record, counting a hit or a miss.
    pub fn get(&self, name: &str) -> Option<Arc<AnnotationRecord>> {
        let now = Instant::now();
        let found = self.slots.get(name).map(|slot| {
            if self.is_expired(&slot, now) {
                None
            } else {
                Some(Arc::clone(&slot.record))
            }
        });
        match found {
            Some(Some(record)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(record)
            }
            Some(None) => {
                if self
                    .slots
                    .remove_if(name, |_, slot| self.is_expired(slot, now))
                    .is_some()
                {
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                }
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert `record` unless a live record already exists; returns the retained record.
    pub fn insert(&self, name: &str, record: AnnotationRecord) -> Arc<AnnotationRecord> {
        let record = Arc::new(record);
        if self.opts.max_entries == 0 {
            return record;
        }

        let now = Instant::now();
        let fresh = CacheSlot {
            record: Arc::clone(&record),
            inserted_at: now,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        let retained = {
            let mut slot = self
                .slots
                .entry(name.to_string())
                .or_insert_with(|| fresh.clone());
            if !Arc::ptr_eq(&slot.record, &record) && self.is_expired(&slot, now) {
                *slot = fresh;
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
            Arc::clone(&slot.record)
        };

        self.enforce_capacity(name);
        retained
    }

    /// Drop every record whose TTL elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.slots.len();
        self.slots.retain(|_, slot| !self.is_expired(slot, now));
        let removed = before.saturating_sub(self.slots.len());
        self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    /// Drop everything; counters are kept.
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of retained records (live or not yet purged).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Return `true` when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.slots.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn is_expired(&self, slot: &CacheSlot, now: Instant) -> bool {
        self.opts
            .ttl
            .is_some_and(|ttl| now.saturating_duration_since(slot.inserted_at) >= ttl)
    }

    // Evicts oldest insertions first, never the key that was just written.
    fn enforce_capacity(&self, keep: &str) {
        while self.slots.len() > self.opts.max_entries {
            let oldest = self
                .slots
                .iter()
                .filter(|e| e.key() != keep)
                .min_by_key(|e| e.value().seq)
                .map(|e| e.key().clone());
            let Some(key) = oldest else { break };
            if self.slots.remove(&key).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/annotation/cache.rs"]
mod tests;
