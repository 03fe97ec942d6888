use std::time::Duration;

use super::*;
use crate::annotation::store::InMemoryStore;

#[test]
fn empty_object_uses_defaults() {
    let cfg = BoardConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, BoardConfig::default());
    assert!(cfg.compositor.parallel);
    assert_eq!(cfg.cache.max_entries, 1024);
}

#[test]
fn parses_nested_sections() {
    let cfg = BoardConfig::from_json_str(
        r#"{"compositor": {"parallel": false, "threads": 2, "timeout": 5},
            "cache": {"max_entries": 16, "ttl": 60}}"#,
    )
    .unwrap();
    assert!(!cfg.compositor.parallel);
    assert_eq!(cfg.compositor.threads, Some(2));
    assert_eq!(cfg.compositor.timeout, Some(Duration::from_secs(5)));
    assert_eq!(cfg.cache.ttl, Some(Duration::from_secs(60)));
}

#[test]
fn zero_threads_is_rejected() {
    let err = BoardConfig::from_json_str(r#"{"compositor": {"threads": 0}}"#).unwrap_err();
    assert_eq!(err.code(), "VALIDATION");
}

#[test]
fn zero_capacity_context_has_no_cache() {
    let store = Arc::new(InMemoryStore::default());
    let cfg = BoardConfig::from_json_str(r#"{"cache": {"max_entries": 0}}"#).unwrap();
    assert!(cfg.context(store.clone()).cache.is_none());
    assert!(BoardConfig::default().context(store).cache.is_some());
}
