use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::annotation::{
    cache::CacheOpts,
    store::{InMemoryStore, SyntheticOpts, synthetic_store},
};
use crate::foundation::error::FetchFailure;

struct CountingStore {
    inner: InMemoryStore,
    lookups: AtomicUsize,
}

impl AnnotationStore for CountingStore {
    fn lookup_by_track_name(&self, name: &str) -> BoardResult<AnnotationRecord> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup_by_track_name(name)
    }

    fn track_names_in_group(&self, group: &str) -> BoardResult<Vec<String>> {
        self.inner.track_names_in_group(group)
    }
}

struct DownStore;

impl AnnotationStore for DownStore {
    fn lookup_by_track_name(&self, _name: &str) -> BoardResult<AnnotationRecord> {
        Err(BoardError::Other(anyhow::anyhow!("connection refused")))
    }

    fn track_names_in_group(&self, _group: &str) -> BoardResult<Vec<String>> {
        Ok(vec!["a".to_string()])
    }
}

fn counting(tracks: u32) -> Arc<CountingStore> {
    Arc::new(CountingStore {
        inner: synthetic_store(SyntheticOpts {
            tracks,
            ..SyntheticOpts::default()
        }),
        lookups: AtomicUsize::new(0),
    })
}

fn pool() -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .build()
        .unwrap()
}

#[test]
fn second_fetch_is_served_from_cache() {
    let store = counting(1);
    let cache = Arc::new(RecordCache::default());
    let fetcher = AnnotationFetcher::new(store.clone(), Some(cache.clone()));

    let a = fetcher.fetch("track_0").unwrap();
    let b = fetcher.fetch("track_0").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn without_cache_every_fetch_hits_the_store() {
    let store = counting(1);
    let fetcher = AnnotationFetcher::new(store.clone(), None);
    fetcher.fetch("track_0").unwrap();
    fetcher.fetch("track_0").unwrap();
    assert_eq!(store.lookups.load(Ordering::SeqCst), 2);
}

#[test]
fn missing_record_is_not_found_and_not_cached() {
    let store = counting(1);
    let cache = Arc::new(RecordCache::default());
    let fetcher = AnnotationFetcher::new(store, Some(cache.clone()));

    let err = fetcher.fetch("nope").unwrap_err();
    match err {
        BoardError::FetchFailed { track, reason } => {
            assert_eq!(track, "nope");
            assert_eq!(reason, FetchFailure::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(cache.is_empty());
}

#[test]
fn store_errors_become_unavailable() {
    let fetcher = AnnotationFetcher::new(Arc::new(DownStore), None);
    let err = fetcher.fetch("a").unwrap_err();
    assert_eq!(err.code(), "FETCH_UNAVAILABLE");
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn limit_is_max_sequence_length() {
    let store = InMemoryStore::from_records([
        AnnotationRecord {
            id: "a".to_string(),
            sequence: "ACGT".to_string(),
            ..AnnotationRecord::default()
        },
        AnnotationRecord {
            id: "b".to_string(),
            length: Some(12_000),
            ..AnnotationRecord::default()
        },
    ]);
    let fetcher = AnnotationFetcher::new(Arc::new(store), None);
    let limit = fetcher
        .limit(&["a".to_string(), "b".to_string()])
        .unwrap();
    assert_eq!(limit, Limit { limit: 12_000 });
    assert_eq!(serde_json::to_string(&limit).unwrap(), r#"{"limit":12000}"#);

    assert_eq!(fetcher.limit(&[]).unwrap_err().code(), "VALIDATION");
    assert_eq!(
        fetcher.limit(&["zz".to_string()]).unwrap_err().code(),
        "FETCH_NOT_FOUND"
    );
}

#[test]
fn warm_group_fills_cache() {
    let store = counting(4);
    let cache = Arc::new(RecordCache::new(CacheOpts::default()));
    let fetcher = AnnotationFetcher::new(store.clone(), Some(cache.clone()));

    let report = fetcher.warm_group("synthetic", &pool()).unwrap();
    assert_eq!(report.group, "synthetic");
    assert_eq!(
        report.loaded,
        vec!["track_0", "track_1", "track_2", "track_3"]
    );
    assert!(report.failed.is_empty());
    assert_eq!(cache.len(), 4);

    fetcher.fetch("track_2").unwrap();
    assert_eq!(store.lookups.load(Ordering::SeqCst), 4);
}

#[test]
fn warm_group_reports_failures() {
    let fetcher = AnnotationFetcher::new(Arc::new(DownStore), None);
    let report = fetcher.warm_group("any", &pool()).unwrap();
    assert!(report.loaded.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "a");
}
