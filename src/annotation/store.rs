use std::{collections::BTreeMap, path::Path};

use anyhow::Context;

use crate::{
    annotation::model::{AnnotationRecord, Gap, GapKind},
    foundation::error::{BoardError, BoardResult},
};

/// Source of annotation records, keyed by track name.
///
/// Implementations are called from pool worker threads and may block. A missing record must be
/// reported with [`BoardError::not_found`] and connectivity problems with
/// [`BoardError::unavailable`], so callers can tell them apart.
pub trait AnnotationStore: Send + Sync {
    /// Return the record whose id equals `name`.
    fn lookup_by_track_name(&self, name: &str) -> BoardResult<AnnotationRecord>;

    /// Maximum known sequence length of one track.
    fn sequence_length(&self, name: &str) -> BoardResult<u64> {
        self.lookup_by_track_name(name).map(|r| r.sequence_length())
    }

    /// Names of every track that belongs to `group`, in a stable order.
    fn track_names_in_group(&self, group: &str) -> BoardResult<Vec<String>>;
}

/// Store holding every record in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    records: BTreeMap<String, AnnotationRecord>,
}

impl InMemoryStore {
    /// Build from records; a later record with a repeated id replaces the earlier one.
    pub fn from_records(records: impl IntoIterator<Item = AnnotationRecord>) -> Self {
        let mut out = Self::default();
        for r in records {
            out.insert(r);
        }
        out
    }

    /// Parse a JSON array of records.
    pub fn from_json_str(s: &str) -> BoardResult<Self> {
        let records: Vec<AnnotationRecord> =
            serde_json::from_str(s).map_err(|e| BoardError::serde(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    /// Load a JSON array of records from disk.
    pub fn from_path(path: impl AsRef<Path>) -> BoardResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read annotation store '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize all records as a pretty JSON array.
    pub fn to_json_string(&self) -> BoardResult<String> {
        let records: Vec<&AnnotationRecord> = self.records.values().collect();
        serde_json::to_string_pretty(&records).map_err(|e| BoardError::serde(e.to_string()))
    }

    /// Add or replace one record.
    pub fn insert(&mut self, record: AnnotationRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AnnotationStore for InMemoryStore {
    fn lookup_by_track_name(&self, name: &str) -> BoardResult<AnnotationRecord> {
        self.records
            .get(name)
            .cloned()
            .ok_or_else(|| BoardError::not_found(name))
    }

    fn sequence_length(&self, name: &str) -> BoardResult<u64> {
        self.records
            .get(name)
            .map(AnnotationRecord::sequence_length)
            .ok_or_else(|| BoardError::not_found(name))
    }

    fn track_names_in_group(&self, group: &str) -> BoardResult<Vec<String>> {
        Ok(self
            .records
            .values()
            .filter(|r| r.group.as_deref() == Some(group))
            .map(|r| r.id.clone())
            .collect())
    }
}

/// Shape of a generated test/benchmark store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntheticOpts {
    /// Number of tracks (`track_0`, `track_1`, ...).
    pub tracks: u32,
    /// Gaps per track.
    pub elements: u32,
    /// Length of each gap.
    pub span: u32,
    /// Distance between consecutive gap starts.
    pub sep: u32,
}

impl Default for SyntheticOpts {
    fn default() -> Self {
        Self {
            tracks: 1,
            elements: 10,
            span: 1,
            sep: 10,
        }
    }
}

/// Generate a deterministic store of evenly spaced gaps.
///
/// Track `i` is named `track_{i}` and belongs to group `synthetic`. Gap `j` spans
/// `[(j+1)*sep, (j+1)*sep + span]` and alternates low/high; an exon boundary sits halfway
/// between consecutive gaps. The sequence covers the full span with a repeating `ACGT`.
pub fn synthetic_store(opts: SyntheticOpts) -> InMemoryStore {
    let mut store = InMemoryStore::default();
    for i in 0..opts.tracks {
        let mut gaps = Vec::with_capacity(opts.elements as usize);
        let mut exon_boundaries = Vec::with_capacity(opts.elements as usize);
        for j in 0..opts.elements {
            let start = f64::from(j + 1) * f64::from(opts.sep);
            let kind = if j % 2 == 0 { GapKind::Low } else { GapKind::High };
            gaps.push(Gap::new(start, start + f64::from(opts.span), kind));
            exon_boundaries.push(start + f64::from(opts.sep) / 2.0);
        }
        let total = (u64::from(opts.elements) + 2) * u64::from(opts.sep.max(1));
        let sequence: String = b"ACGT"
            .iter()
            .cycle()
            .take(total as usize)
            .map(|&b| char::from(b))
            .collect();
        store.insert(AnnotationRecord {
            id: format!("track_{i}"),
            sequence,
            exon_boundaries,
            gaps,
            length: None,
            group: Some("synthetic".to_string()),
        });
    }
    store
}

#[cfg(test)]
#[path = "../../tests/unit/annotation/store.rs"]
mod tests;
