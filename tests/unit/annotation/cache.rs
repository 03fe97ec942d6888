use super::*;

fn rec(id: &str, seq: &str) -> AnnotationRecord {
    AnnotationRecord {
        id: id.to_string(),
        sequence: seq.to_string(),
        ..AnnotationRecord::default()
    }
}

#[test]
fn get_counts_hits_and_misses() {
    let cache = RecordCache::default();
    assert!(cache.get("a").is_none());
    cache.insert("a", rec("a", "AC"));
    assert_eq!(cache.get("a").unwrap().sequence, "AC");
    let st = cache.stats();
    assert_eq!(st.hits, 1);
    assert_eq!(st.misses, 1);
    assert_eq!(st.entries, 1);
    assert_eq!(st.hit_rate(), 0.5);
}

#[test]
fn first_writer_wins() {
    let cache = RecordCache::default();
    let first = cache.insert("a", rec("a", "FIRST"));
    let second = cache.insert("a", rec("a", "SECOND"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.get("a").unwrap().sequence, "FIRST");
}

#[test]
fn concurrent_inserts_converge_on_one_record() {
    let cache = Arc::new(RecordCache::default());
    let retained: Vec<Arc<AnnotationRecord>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                s.spawn(move || cache.insert("shared", rec("shared", &format!("w{i}"))))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for r in &retained {
        assert!(Arc::ptr_eq(r, &retained[0]));
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn zero_ttl_expires_immediately() {
    let cache = RecordCache::new(CacheOpts {
        max_entries: 8,
        ttl: Some(Duration::ZERO),
    });
    cache.insert("a", rec("a", "AC"));
    assert!(cache.get("a").is_none());
    assert!(cache.is_empty());
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn expired_entry_is_replaced_on_insert() {
    let cache = RecordCache::new(CacheOpts {
        max_entries: 8,
        ttl: Some(Duration::ZERO),
    });
    cache.insert("a", rec("a", "OLD"));
    let kept = cache.insert("a", rec("a", "NEW"));
    assert_eq!(kept.sequence, "NEW");
}

#[test]
fn purge_expired_drops_stale_records() {
    let cache = RecordCache::new(CacheOpts {
        max_entries: 8,
        ttl: Some(Duration::ZERO),
    });
    cache.insert("a", rec("a", ""));
    cache.insert("b", rec("b", ""));
    assert_eq!(cache.purge_expired(), 2);
    assert!(cache.is_empty());
}

#[test]
fn size_bound_evicts_oldest_insertions() {
    let cache = RecordCache::new(CacheOpts {
        max_entries: 2,
        ttl: None,
    });
    cache.insert("a", rec("a", ""));
    cache.insert("b", rec("b", ""));
    cache.insert("c", rec("c", ""));
    assert_eq!(cache.len(), 2);
    assert!(cache.get("a").is_none());
    assert!(cache.get("b").is_some());
    assert!(cache.get("c").is_some());
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn zero_capacity_disables_retention() {
    let cache = RecordCache::new(CacheOpts {
        max_entries: 0,
        ttl: None,
    });
    let r = cache.insert("a", rec("a", "AC"));
    assert_eq!(r.sequence, "AC");
    assert!(cache.is_empty());
}

#[test]
fn opts_parse_ttl_seconds() {
    let opts: CacheOpts = serde_json::from_str(r#"{"max_entries": 4, "ttl": 1.5}"#).unwrap();
    assert_eq!(opts.ttl, Some(Duration::from_millis(1500)));
    let opts: CacheOpts = serde_json::from_str(r#"{"max_entries": 4}"#).unwrap();
    assert_eq!(opts.ttl, None);
    assert!(serde_json::from_str::<CacheOpts>(r#"{"max_entries": 4, "ttl": -1}"#).is_err());
}
