//! trackboard renders genomic annotation tracks into one composite image.
//!
//! A request names a genomic window, a canvas and a list of tracks. Every track is processed
//! independently and concurrently:
//!
//! 1. **Fetch**: the track's [`AnnotationRecord`] comes from the [`RecordCache`] or the
//!    [`AnnotationStore`] behind it.
//! 2. **Filter**: [`filter_record`] keeps the gaps and exon boundaries inside the window and
//!    slices the sequence.
//! 3. **Render**: [`render_track`] draws guides, gap blocks, boundaries and (when zoomed in)
//!    bases onto the track's own [`CpuSurface`].
//!
//! The [`Compositor`] then blends finished layers onto the canvas in request order, so the
//! output does not depend on which track finished first. Tracks that fail or miss the deadline
//! are reported next to the partial image instead of failing the request.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** on every surface; PNG output is straight alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod annotation;
mod foundation;
mod render;
mod request;

/// Coordinate transforms.
pub mod transform;

pub use annotation::cache::{CacheOpts, CacheStats, RecordCache};
pub use annotation::fetch::{AnnotationFetcher, Limit, WarmReport};
pub use annotation::filter::filter_record;
pub use annotation::model::{AnnotationRecord, FilteredRecord, Gap, GapKind};
pub use annotation::store::{AnnotationStore, InMemoryStore, SyntheticOpts, synthetic_store};
pub use foundation::core::{Canvas, CanvasConfig, GenomicWindow, MAX_CANVAS_EDGE, Rgb8, TrackSpec};
pub use foundation::error::{BoardError, BoardResult, FetchFailure};
pub use render::composite::{PremulRgba8, blend_layer, over, over_in_place};
pub use render::encode::{PNG_DATA_URI_PREFIX, data_uri, decode_data_uri, png_bytes, save_png};
pub use render::pipeline::{
    BoardContext, CompositeOutput, CompositeRequest, CompositeStats, Compositor, CompositorOpts,
    TrackFailure, build_thread_pool,
};
pub use render::surface::{CpuSurface, DrawSurface, TrackLayer};
pub use render::track::{
    DEFAULT_SEQUENCE_ZOOM_THRESHOLD, EXON_BOUNDARY_COLOR, HIGH_GAP_COLOR, LOW_GAP_COLOR,
    TrackGeometry, TrackRenderOpts, base_color, render_track,
};
pub use request::board::render_board;
pub use request::config::BoardConfig;
pub use request::model::{BoardRequest, BoardResponse, FailureReport};
pub use transform::linear::LinearScale;
