use super::*;

#[test]
fn lookup_hits_and_misses() {
    let store = InMemoryStore::from_records([AnnotationRecord {
        id: "a".to_string(),
        sequence: "ACGT".to_string(),
        ..AnnotationRecord::default()
    }]);
    assert_eq!(store.lookup_by_track_name("a").unwrap().sequence, "ACGT");
    let err = store.lookup_by_track_name("b").unwrap_err();
    assert_eq!(err.code(), "FETCH_NOT_FOUND");
}

#[test]
fn sequence_length_prefers_explicit_length() {
    let store = InMemoryStore::from_records([
        AnnotationRecord {
            id: "a".to_string(),
            sequence: "ACGT".to_string(),
            ..AnnotationRecord::default()
        },
        AnnotationRecord {
            id: "b".to_string(),
            sequence: "AC".to_string(),
            length: Some(5000),
            ..AnnotationRecord::default()
        },
    ]);
    assert_eq!(store.sequence_length("a").unwrap(), 4);
    assert_eq!(store.sequence_length("b").unwrap(), 5000);
    assert!(store.sequence_length("c").is_err());
}

#[test]
fn json_accepts_original_field_names() {
    let json = r#"[
        {"id": "ENSG1", "subseq": "ACGTACGT", "genetree": "GT1",
         "exon_boundaries": [3, 6],
         "gaps": [{"start": 1, "end": 2, "type": "low"}, {"start": 4, "end": 5, "type": "weird"}]}
    ]"#;
    let store = InMemoryStore::from_json_str(json).unwrap();
    let rec = store.lookup_by_track_name("ENSG1").unwrap();
    assert_eq!(rec.sequence, "ACGTACGT");
    assert_eq!(rec.group.as_deref(), Some("GT1"));
    assert_eq!(rec.gaps[0].kind, GapKind::Low);
    assert_eq!(rec.gaps[1].kind, GapKind::Other("weird".to_string()));
    assert_eq!(store.track_names_in_group("GT1").unwrap(), vec!["ENSG1"]);
}

#[test]
fn json_round_trip_keeps_records() {
    let store = synthetic_store(SyntheticOpts {
        tracks: 2,
        elements: 3,
        span: 5,
        sep: 20,
    });
    let back = InMemoryStore::from_json_str(&store.to_json_string().unwrap()).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(
        back.lookup_by_track_name("track_1").unwrap(),
        store.lookup_by_track_name("track_1").unwrap()
    );
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = InMemoryStore::from_json_str("{not json").unwrap_err();
    assert_eq!(err.code(), "SERDE");
}

#[test]
fn synthetic_layout_follows_opts() {
    let store = synthetic_store(SyntheticOpts {
        tracks: 3,
        elements: 4,
        span: 2,
        sep: 10,
    });
    assert_eq!(store.len(), 3);
    let rec = store.lookup_by_track_name("track_2").unwrap();
    let spans: Vec<(f64, f64)> = rec.gaps.iter().map(|g| (g.start, g.end)).collect();
    assert_eq!(spans, vec![(10.0, 12.0), (20.0, 22.0), (30.0, 32.0), (40.0, 42.0)]);
    assert_eq!(rec.gaps[1].kind, GapKind::High);
    assert_eq!(rec.exon_boundaries[0], 15.0);
    assert_eq!(rec.sequence.len(), 60);
    assert_eq!(
        store.track_names_in_group("synthetic").unwrap(),
        vec!["track_0", "track_1", "track_2"]
    );
}
