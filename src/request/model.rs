use crate::{
    foundation::{
        core::{CanvasConfig, GenomicWindow, TrackSpec},
        error::{BoardError, BoardResult},
    },
    render::pipeline::{CompositeRequest, TrackFailure},
};

/// Client request for one composite image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoardRequest {
    /// Genomic window.
    #[serde(alias = "Loc")]
    pub loc: GenomicWindow,
    /// Tracks, drawn bottom to top.
    #[serde(alias = "Tracks", default)]
    pub tracks: Vec<TrackSpec>,
    /// Canvas size and background.
    #[serde(alias = "Conf")]
    pub conf: CanvasConfig,
}

impl BoardRequest {
    /// Parse a request body.
    pub fn from_json_str(s: &str) -> BoardResult<Self> {
        serde_json::from_str(s).map_err(|e| BoardError::serde(e.to_string()))
    }

    /// Compositor input for this request.
    pub fn to_composite(&self) -> CompositeRequest {
        CompositeRequest {
            window: self.loc,
            canvas: self.conf,
            tracks: self.tracks.clone(),
        }
    }
}

/// A failed track as reported to clients.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FailureReport {
    /// Position of the track in the request.
    pub index: usize,
    /// Track name.
    pub track: String,
    /// Stable error code.
    pub code: String,
    /// Human-readable reason.
    pub message: String,
}

impl From<&TrackFailure> for FailureReport {
    fn from(f: &TrackFailure) -> Self {
        Self {
            index: f.index,
            track: f.track.clone(),
            code: f.error.code().to_string(),
            message: f.error.to_string(),
        }
    }
}

/// Response for one composite image.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoardResponse {
    /// `data:image/png;base64,...`
    pub image: String,
    /// Tracks left out of the image.
    #[serde(default)]
    pub failures: Vec<FailureReport>,
}

#[cfg(test)]
#[path = "../../tests/unit/request/model.rs"]
mod tests;
