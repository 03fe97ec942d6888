use crate::{
    annotation::model::{AnnotationRecord, FilteredRecord},
    foundation::core::GenomicWindow,
};

/// Restrict `record` to the elements overlapping `window`.
///
/// - gaps are kept on true interval overlap (`start < to && end > from`)
/// - exon boundaries are kept when strictly inside the window
/// - the subsequence is the absolute slice `[from, to)` of the stored sequence, or empty when
///   the stored sequence is shorter than `to`
///
/// Fractional window bounds are truncated toward zero before slicing, so a window ending at
/// `10.5` over a 10-base sequence yields all 10 bases.
pub fn filter_record(record: &AnnotationRecord, window: &GenomicWindow) -> FilteredRecord {
    let gaps = record
        .gaps
        .iter()
        .filter(|g| window.overlaps(g.start, g.end))
        .cloned()
        .collect();

    let exon_boundaries = record
        .exon_boundaries
        .iter()
        .copied()
        .filter(|&b| window.contains_strict(b))
        .collect();

    FilteredRecord {
        id: record.id.clone(),
        subsequence: window_subsequence(&record.sequence, window).to_string(),
        exon_boundaries,
        gaps,
    }
}

fn window_subsequence<'a>(seq: &'a str, window: &GenomicWindow) -> &'a str {
    if window.from < 0.0 {
        return "";
    }
    // Coordinates are truncated toward zero.
    let from = window.from as usize;
    let to = window.to as usize;
    if seq.len() < to {
        return "";
    }
    seq.get(from..to).unwrap_or("")
}

#[cfg(test)]
#[path = "../../tests/unit/annotation/filter.rs"]
mod tests;
