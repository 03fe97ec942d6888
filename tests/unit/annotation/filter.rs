use super::*;
use crate::annotation::model::{Gap, GapKind};

fn record_with_gaps(gaps: Vec<Gap>) -> AnnotationRecord {
    AnnotationRecord {
        id: "t".to_string(),
        gaps,
        ..AnnotationRecord::default()
    }
}

fn window(a: f64, b: f64) -> GenomicWindow {
    GenomicWindow::new(a, b).unwrap()
}

#[test]
fn gap_overlap_is_true_interval_overlap() {
    let rec = record_with_gaps(vec![
        Gap::new(500.0, 2500.0, "low"),  // straddles the whole window
        Gap::new(1200.0, 1300.0, "high"), // fully inside
        Gap::new(800.0, 1000.0, "low"),  // touches `from`
        Gap::new(2000.0, 2100.0, "low"), // touches `to`
        Gap::new(100.0, 200.0, "high"),  // entirely before
        Gap::new(3000.0, 3100.0, "high"), // entirely after
        Gap::new(900.0, 1001.0, "low"),  // ends just inside
        Gap::new(1999.0, 2200.0, "high"), // starts just inside
    ]);
    let out = filter_record(&rec, &window(1000.0, 2000.0));
    let kept: Vec<(f64, f64)> = out.gaps.iter().map(|g| (g.start, g.end)).collect();
    assert_eq!(
        kept,
        vec![
            (500.0, 2500.0),
            (1200.0, 1300.0),
            (900.0, 1001.0),
            (1999.0, 2200.0)
        ]
    );
}

#[test]
fn gap_ending_inside_window_is_kept() {
    // The left-edge case a strict-interior start check would drop.
    let rec = record_with_gaps(vec![Gap::new(10.0, 60.0, "low")]);
    let out = filter_record(&rec, &window(50.0, 100.0));
    assert_eq!(out.gaps.len(), 1);
    assert_eq!(out.gaps[0].kind, GapKind::Low);
}

#[test]
fn overlap_matches_predicate_over_a_grid() {
    let w = window(10.0, 20.0);
    for start in 0..30 {
        for len in 0..15 {
            let (s, e) = (f64::from(start), f64::from(start + len));
            let rec = record_with_gaps(vec![Gap::new(s, e, "low")]);
            let kept = filter_record(&rec, &w).gaps.len() == 1;
            assert_eq!(kept, s < 20.0 && e > 10.0, "gap [{s}, {e}]");
        }
    }
}

#[test]
fn boundaries_on_window_edges_are_excluded() {
    let rec = AnnotationRecord {
        id: "t".to_string(),
        exon_boundaries: vec![999.0, 1000.0, 1000.5, 1800.0, 2000.0, 2001.0],
        ..AnnotationRecord::default()
    };
    let out = filter_record(&rec, &window(1000.0, 2000.0));
    assert_eq!(out.exon_boundaries, vec![1000.5, 1800.0]);
}

#[test]
fn subsequence_is_empty_when_sequence_too_short() {
    let rec = AnnotationRecord {
        id: "t".to_string(),
        sequence: "A".repeat(1999),
        ..AnnotationRecord::default()
    };
    let out = filter_record(&rec, &window(1000.0, 2000.0));
    assert!(out.subsequence.is_empty());
}

#[test]
fn subsequence_has_window_length_and_absolute_offsets() {
    let seq: String = (0..3000).map(|i| if i < 1500 { 'A' } else { 'C' }).collect();
    let rec = AnnotationRecord {
        id: "t".to_string(),
        sequence: seq,
        ..AnnotationRecord::default()
    };
    let out = filter_record(&rec, &window(1000.0, 2000.0));
    assert_eq!(out.subsequence.len(), 1000);
    assert!(out.subsequence[..500].bytes().all(|b| b == b'A'));
    assert!(out.subsequence[500..].bytes().all(|b| b == b'C'));

    let exact = AnnotationRecord {
        id: "t".to_string(),
        sequence: "ACGT".repeat(500),
        ..AnnotationRecord::default()
    };
    let out = filter_record(&exact, &window(1000.0, 2000.0));
    assert_eq!(out.subsequence.len(), 1000);
    assert!(out.subsequence.starts_with("ACGT"));
}

#[test]
fn fractional_window_bounds_truncate_toward_zero() {
    let rec = AnnotationRecord {
        id: "t".to_string(),
        sequence: "ACGTACGTAC".to_string(),
        ..AnnotationRecord::default()
    };
    assert_eq!(filter_record(&rec, &window(0.0, 10.5)).subsequence, "ACGTACGTAC");
    assert_eq!(filter_record(&rec, &window(2.9, 6.2)).subsequence, "GTAC");
}

#[test]
fn id_is_carried_over() {
    let rec = AnnotationRecord {
        id: "ENSG1".to_string(),
        ..AnnotationRecord::default()
    };
    assert_eq!(filter_record(&rec, &window(0.0, 1.0)).id, "ENSG1");
}
