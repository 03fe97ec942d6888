/// Convenience result type used across trackboard.
pub type BoardResult<T> = Result<T, BoardError>;

/// Why a record could not be fetched for a track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchFailure {
    /// The store answered, but holds no record for the track name.
    NotFound,
    /// The store could not be reached or failed while answering.
    Unavailable(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::NotFound => write!(f, "record not found"),
            FetchFailure::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

/// Top-level error taxonomy used by the compositing pipeline.
#[derive(thiserror::Error, Debug)]
pub enum BoardError {
    /// Degenerate, inverted or non-finite genomic window.
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// Non-positive or unsupported canvas dimensions.
    #[error("invalid canvas config: {0}")]
    InvalidCanvasConfig(String),

    /// The annotation record for a track could not be retrieved.
    #[error("fetch failed for track '{track}': {reason}")]
    FetchFailed {
        /// Requested track name.
        track: String,
        /// Not-found vs connectivity failure.
        reason: FetchFailure,
    },

    /// A gap carried a classification the renderer has no color for.
    #[error("unknown gap kind '{kind}' in track '{track}'")]
    UnknownGapKind {
        /// Track being rendered.
        track: String,
        /// The unrecognized classification.
        kind: String,
    },

    /// The request deadline elapsed before the work finished.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Invalid user-provided data outside the window/canvas checks.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures inside the drawing or encoding layer.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoardError {
    /// Build a [`BoardError::InvalidWindow`] value.
    pub fn invalid_window(msg: impl Into<String>) -> Self {
        Self::InvalidWindow(msg.into())
    }

    /// Build a [`BoardError::InvalidCanvasConfig`] value.
    pub fn invalid_canvas(msg: impl Into<String>) -> Self {
        Self::InvalidCanvasConfig(msg.into())
    }

    /// Build a [`BoardError::FetchFailed`] for a missing record.
    pub fn not_found(track: impl Into<String>) -> Self {
        Self::FetchFailed {
            track: track.into(),
            reason: FetchFailure::NotFound,
        }
    }

    /// Build a [`BoardError::FetchFailed`] for an unreachable store.
    pub fn unavailable(track: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::FetchFailed {
            track: track.into(),
            reason: FetchFailure::Unavailable(msg.into()),
        }
    }

    /// Build a [`BoardError::UnknownGapKind`] value.
    pub fn unknown_gap_kind(track: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnknownGapKind {
            track: track.into(),
            kind: kind.into(),
        }
    }

    /// Build a [`BoardError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`BoardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BoardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Stable machine-readable code, reported to clients next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            BoardError::InvalidWindow(_) => "INVALID_WINDOW",
            BoardError::InvalidCanvasConfig(_) => "INVALID_CANVAS_CONFIG",
            BoardError::FetchFailed {
                reason: FetchFailure::NotFound,
                ..
            } => "FETCH_NOT_FOUND",
            BoardError::FetchFailed {
                reason: FetchFailure::Unavailable(_),
                ..
            } => "FETCH_UNAVAILABLE",
            BoardError::UnknownGapKind { .. } => "UNKNOWN_GAP_KIND",
            BoardError::Timeout(_) => "TIMEOUT",
            BoardError::Validation(_) => "VALIDATION",
            BoardError::Render(_) => "RENDER",
            BoardError::Serde(_) => "SERDE",
            BoardError::Other(_) => "INTERNAL",
        }
    }

    /// `true` for errors that reject the whole request before any fetch starts.
    pub fn is_request_level(&self) -> bool {
        matches!(
            self,
            BoardError::InvalidWindow(_)
                | BoardError::InvalidCanvasConfig(_)
                | BoardError::Validation(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
