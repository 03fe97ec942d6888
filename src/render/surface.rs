use vello_cpu::kurbo::{BezPath, Cap, Rect, Stroke};

use crate::foundation::{
    core::{MAX_CANVAS_EDGE, Rgb8},
    error::{BoardError, BoardResult},
};

/// Path-building drawing primitives a track is rendered with.
///
/// `move_to`, `line_to` and `rect` append to a pending path; `stroke` and `fill` paint it with
/// the current color and start a new one.
pub trait DrawSurface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);
    /// Start a new subpath at `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);
    /// Extend the current subpath to `(x, y)`.
    fn line_to(&mut self, x: f64, y: f64);
    /// Append a closed rectangle spanning `(x0, y0)` to `(x1, y1)`.
    fn rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64);
    /// Color used by the next [`DrawSurface::stroke`].
    fn set_stroke_color(&mut self, color: Rgb8);
    /// Color used by the next [`DrawSurface::fill`].
    fn set_fill_color(&mut self, color: Rgb8);
    /// Stroke the pending path with a 1px line.
    fn stroke(&mut self);
    /// Fill the pending path.
    fn fill(&mut self);
}

/// One track's finished isolated surface: premultiplied RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackLayer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes.
    pub data: Vec<u8>,
}

/// [`DrawSurface`] rasterized on the CPU with `vello_cpu`.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    path: BezPath,
    stroke_color: Rgb8,
    fill_color: Rgb8,
}

impl CpuSurface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> BoardResult<Self> {
        if width == 0 || height == 0 {
            return Err(BoardError::invalid_canvas(format!(
                "surface must be non-empty (got {width}x{height})"
            )));
        }
        let width_u16: u16 = width.try_into().map_err(|_| {
            BoardError::invalid_canvas(format!("surface width exceeds {MAX_CANVAS_EDGE}"))
        })?;
        let height_u16: u16 = height.try_into().map_err(|_| {
            BoardError::invalid_canvas(format!("surface height exceeds {MAX_CANVAS_EDGE}"))
        })?;
        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        ctx.set_stroke(Stroke::new(1.0).with_caps(Cap::Butt));
        Ok(Self {
            width: width_u16,
            height: height_u16,
            ctx,
            path: BezPath::new(),
            stroke_color: Rgb8::default(),
            fill_color: Rgb8::default(),
        })
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> TrackLayer {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        TrackLayer {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }

    fn paint(&mut self, color: Rgb8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255));
    }
}

impl DrawSurface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to((x, y));
    }

    fn rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let r = Rect::new(x0, y0, x1, y1).abs();
        self.path.move_to((r.x0, r.y0));
        self.path.line_to((r.x1, r.y0));
        self.path.line_to((r.x1, r.y1));
        self.path.line_to((r.x0, r.y1));
        self.path.close_path();
    }

    fn set_stroke_color(&mut self, color: Rgb8) {
        self.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Rgb8) {
        self.fill_color = color;
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        if path.elements().is_empty() {
            return;
        }
        self.paint(self.stroke_color);
        self.ctx.stroke_path(&path);
    }

    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        if path.elements().is_empty() {
            return;
        }
        self.paint(self.fill_color);
        self.ctx.fill_path(&path);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
