/// Classification of a gap block.
///
/// Unknown classifications are kept as-is when records are loaded; the renderer rejects them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GapKind {
    /// Low-identity gap.
    Low,
    /// High-identity gap.
    High,
    /// Any classification the renderer has no color for.
    Other(String),
}

impl GapKind {
    /// Wire spelling of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            GapKind::Low => "low",
            GapKind::High => "high",
            GapKind::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for GapKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "low" => GapKind::Low,
            "high" => GapKind::High,
            _ => GapKind::Other(s),
        }
    }
}

impl From<&str> for GapKind {
    fn from(s: &str) -> Self {
        GapKind::from(s.to_string())
    }
}

impl From<GapKind> for String {
    fn from(k: GapKind) -> Self {
        match k {
            GapKind::Other(s) => s,
            k => k.as_str().to_string(),
        }
    }
}

/// Discontinuous region within a track's span.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gap {
    /// Start coordinate.
    pub start: f64,
    /// End coordinate.
    pub end: f64,
    /// Gap classification.
    #[serde(alias = "type")]
    pub kind: GapKind,
}

impl Gap {
    /// Convenience constructor.
    pub fn new(start: f64, end: f64, kind: impl Into<GapKind>) -> Self {
        Self {
            start,
            end,
            kind: kind.into(),
        }
    }
}

/// Stored annotation for one track: sequence, exon boundaries and gaps.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnnotationRecord {
    /// Track identifier, matched against [`crate::TrackSpec::name`].
    pub id: String,
    /// Full stored sequence.
    #[serde(default, alias = "subseq", alias = "seq")]
    pub sequence: String,
    /// Exon boundary coordinates, in stored order.
    #[serde(default)]
    pub exon_boundaries: Vec<f64>,
    /// Gap blocks, in stored order.
    #[serde(default)]
    pub gaps: Vec<Gap>,
    /// Known full sequence length, when it differs from `sequence.len()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Track set (gene tree) this record belongs to.
    #[serde(default, alias = "genetree", skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl AnnotationRecord {
    /// Length used by the limit query.
    pub fn sequence_length(&self) -> u64 {
        self.length.unwrap_or(self.sequence.len() as u64)
    }
}

/// Request-scoped view of an [`AnnotationRecord`] restricted to one window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredRecord {
    /// Track identifier.
    pub id: String,
    /// Window slice of the stored sequence, empty when the window runs past it.
    pub subsequence: String,
    /// Boundaries strictly inside the window.
    pub exon_boundaries: Vec<f64>,
    /// Gaps overlapping the window.
    pub gaps: Vec<Gap>,
}
