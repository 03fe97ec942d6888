use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    annotation::{cache::RecordCache, model::AnnotationRecord, store::AnnotationStore},
    foundation::error::{BoardError, BoardResult},
};

/// Answer of the sequence-length query, serialized as `{"limit": N}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Limit {
    /// Maximum known sequence length across the queried tracks.
    pub limit: u64,
}

/// Outcome of [`AnnotationFetcher::warm_group`].
#[derive(Debug, Default)]
pub struct WarmReport {
    /// Group that was warmed.
    pub group: String,
    /// Records now held by the cache, in group order.
    pub loaded: Vec<String>,
    /// Tracks whose fetch failed, in group order.
    pub failed: Vec<(String, BoardError)>,
}

/// Cache-first retrieval of annotation records.
#[derive(Clone)]
pub struct AnnotationFetcher {
    store: Arc<dyn AnnotationStore>,
    cache: Option<Arc<RecordCache>>,
}

impl std::fmt::Debug for AnnotationFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationFetcher")
            .field("cache", &self.cache.as_ref().map(|c| c.stats()))
            .finish_non_exhaustive()
    }
}

impl AnnotationFetcher {
    /// Fetcher consulting `cache` before `store`. `None` always goes to the store.
    pub fn new(store: Arc<dyn AnnotationStore>, cache: Option<Arc<RecordCache>>) -> Self {
        Self { store, cache }
    }

    /// Backing store.
    pub fn store(&self) -> &Arc<dyn AnnotationStore> {
        &self.store
    }

    /// Cache in front of the store, if any.
    pub fn cache(&self) -> Option<&Arc<RecordCache>> {
        self.cache.as_ref()
    }

    /// Return the record for `track_name`.
    ///
    /// Concurrent misses for the same name may each reach the store; the first record inserted
    /// into the cache is the one every caller gets back.
    pub fn fetch(&self, track_name: &str) -> BoardResult<Arc<AnnotationRecord>> {
        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(track_name)
        {
            tracing::debug!(track = track_name, "record cache hit");
            return Ok(hit);
        }

        let record = self
            .store
            .lookup_by_track_name(track_name)
            .map_err(|e| normalize_fetch_error(track_name, e))?;
        tracing::debug!(
            track = track_name,
            gaps = record.gaps.len(),
            boundaries = record.exon_boundaries.len(),
            "record fetched from store"
        );

        Ok(match &self.cache {
            Some(cache) => cache.insert(track_name, record),
            None => Arc::new(record),
        })
    }

    /// Maximum known sequence length across `track_names`. Not cached.
    pub fn limit(&self, track_names: &[String]) -> BoardResult<Limit> {
        if track_names.is_empty() {
            return Err(BoardError::validation("limit query needs at least one track"));
        }
        let mut limit = 0u64;
        for name in track_names {
            let len = self
                .store
                .sequence_length(name)
                .map_err(|e| normalize_fetch_error(name, e))?;
            limit = limit.max(len);
        }
        Ok(Limit { limit })
    }

    /// Load every track of `group` into the cache concurrently on `pool`.
    #[tracing::instrument(skip(self, pool))]
    pub fn warm_group(&self, group: &str, pool: &rayon::ThreadPool) -> BoardResult<WarmReport> {
        let names = self
            .store
            .track_names_in_group(group)
            .map_err(|e| normalize_fetch_error(group, e))?;

        let results: Vec<(String, BoardResult<Arc<AnnotationRecord>>)> = pool.install(|| {
            names
                .into_par_iter()
                .map(|name| {
                    let r = self.fetch(&name);
                    (name, r)
                })
                .collect()
        });

        let mut report = WarmReport {
            group: group.to_string(),
            ..WarmReport::default()
        };
        for (name, r) in results {
            match r {
                Ok(_) => report.loaded.push(name),
                Err(e) => {
                    tracing::warn!(track = %name, error = %e, "warm-up fetch failed");
                    report.failed.push((name, e));
                }
            }
        }
        tracing::debug!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "group warmed"
        );
        Ok(report)
    }
}

// Stores may report plain errors; anything that is not already a fetch failure is a
// connectivity problem from the caller's point of view.
fn normalize_fetch_error(track: &str, e: BoardError) -> BoardError {
    match e {
        BoardError::FetchFailed { .. } => e,
        other => BoardError::unavailable(track, other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/annotation/fetch.rs"]
mod tests;
