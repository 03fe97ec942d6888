use crate::{
    annotation::model::{FilteredRecord, GapKind},
    foundation::{
        core::{GenomicWindow, Rgb8, TrackSpec},
        error::{BoardError, BoardResult},
        math::snap_to_pixel_center,
    },
    render::surface::DrawSurface,
    transform::linear::LinearScale,
};

/// Fill of `low` gap blocks.
pub const LOW_GAP_COLOR: Rgb8 = Rgb8::new(154, 205, 50);
/// Fill of `high` gap blocks.
pub const HIGH_GAP_COLOR: Rgb8 = Rgb8::new(0, 100, 0);
/// Exon boundary markers.
pub const EXON_BOUNDARY_COLOR: Rgb8 = Rgb8::new(205, 0, 0);

/// Default window width below which individual bases are drawn.
pub const DEFAULT_SEQUENCE_ZOOM_THRESHOLD: f64 = 300.0;

/// Per-track drawing options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackRenderOpts {
    /// Bases are drawn only when the window is narrower than this many genomic units.
    pub sequence_zoom_threshold: f64,
}

impl Default for TrackRenderOpts {
    fn default() -> Self {
        Self {
            sequence_zoom_threshold: DEFAULT_SEQUENCE_ZOOM_THRESHOLD,
        }
    }
}

/// Color of one sequence base.
pub fn base_color(base: u8) -> Rgb8 {
    match base.to_ascii_uppercase() {
        b'A' => Rgb8::new(0, 160, 0),
        b'C' => Rgb8::new(0, 0, 220),
        b'G' => Rgb8::new(255, 165, 0),
        b'T' => Rgb8::new(220, 0, 0),
        _ => Rgb8::new(128, 128, 128),
    }
}

/// Vertical layout of one track, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackGeometry {
    /// Track top.
    pub top: f64,
    /// Track bottom.
    pub bottom: f64,
    /// Upper guide line.
    pub upper_guide: f64,
    /// Lower guide line.
    pub lower_guide: f64,
}

impl TrackGeometry {
    /// Guides sit one eighth of the height below the top and two eighths above the bottom.
    pub fn of(spec: &TrackSpec) -> Self {
        let eighth = spec.height / 8.0;
        Self {
            top: spec.v_offset,
            bottom: spec.v_offset + spec.height,
            upper_guide: spec.v_offset + eighth,
            lower_guide: spec.v_offset + spec.height - 2.0 * eighth,
        }
    }
}

/// Draw one filtered track onto its own surface.
///
/// Layers, bottom to top: guides, gap blocks, exon boundaries, then sequence bases when the
/// window is narrow enough. A gap with an unknown kind fails the track before anything is drawn.
pub fn render_track(
    filtered: &FilteredRecord,
    spec: &TrackSpec,
    scale: &LinearScale,
    window: &GenomicWindow,
    surface: &mut dyn DrawSurface,
    opts: &TrackRenderOpts,
) -> BoardResult<()> {
    let mut gap_fills = Vec::with_capacity(filtered.gaps.len());
    for gap in &filtered.gaps {
        let color = match &gap.kind {
            GapKind::Low => LOW_GAP_COLOR,
            GapKind::High => HIGH_GAP_COLOR,
            GapKind::Other(kind) => {
                return Err(BoardError::unknown_gap_kind(spec.name.as_str(), kind.as_str()));
            }
        };
        gap_fills.push((gap, color));
    }

    let geo = TrackGeometry::of(spec);
    let (width, _) = surface.size();
    let width = f64::from(width);

    surface.set_stroke_color(spec.fg_color);
    for y in [geo.upper_guide, geo.lower_guide] {
        let y = snap_to_pixel_center(y);
        surface.move_to(0.0, y);
        surface.line_to(width, y);
    }
    surface.stroke();

    for (gap, color) in gap_fills {
        let (x0, x1) = pixel_span(scale.apply(gap.start), scale.apply(gap.end));
        surface.set_fill_color(color);
        surface.rect(x0, geo.upper_guide.round(), x1, geo.lower_guide.round());
        surface.fill();
    }

    if !filtered.exon_boundaries.is_empty() {
        surface.set_stroke_color(EXON_BOUNDARY_COLOR);
        for &b in &filtered.exon_boundaries {
            let x = snap_to_pixel_center(scale.apply(b));
            surface.move_to(x, geo.top.round());
            surface.line_to(x, geo.bottom.round());
        }
        surface.stroke();
    }

    if window.width() < opts.sequence_zoom_threshold && !filtered.subsequence.is_empty() {
        draw_bases(&filtered.subsequence, scale, window, &geo, surface);
    }
    Ok(())
}

// The strip between the lower guide row and the track bottom.
fn draw_bases(
    subsequence: &str,
    scale: &LinearScale,
    window: &GenomicWindow,
    geo: &TrackGeometry,
    surface: &mut dyn DrawSurface,
) {
    let y0 = geo.lower_guide.floor() + 1.0;
    let y1 = geo.bottom.round();
    if y1 <= y0 {
        return;
    }
    let first = window.from.trunc();
    for (i, base) in subsequence.bytes().enumerate() {
        let pos = first + i as f64;
        let (x0, x1) = pixel_span(scale.apply(pos), scale.apply(pos + 1.0));
        surface.set_fill_color(base_color(base));
        surface.rect(x0, y0, x1, y1);
        surface.fill();
    }
}

// Rounds to whole pixels, keeping at least one pixel so narrow features stay visible.
fn pixel_span(a: f64, b: f64) -> (f64, f64) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let x0 = lo.round();
    let x1 = hi.round().max(x0 + 1.0);
    (x0, x1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/track.rs"]
mod tests;
