use crate::foundation::error::{BoardError, BoardResult};

/// Largest canvas edge the CPU drawing backend can address.
pub const MAX_CANVAS_EDGE: u32 = u16::MAX as u32;

/// Requested slice of genomic coordinate space, `from <= to`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenomicWindow {
    /// Window start coordinate.
    pub from: f64,
    /// Window end coordinate.
    pub to: f64,
}

impl GenomicWindow {
    /// Create a validated window with finite bounds and `from <= to`.
    pub fn new(from: f64, to: f64) -> BoardResult<Self> {
        let w = Self { from, to };
        w.validate()?;
        Ok(w)
    }

    /// Check the `from <= to` invariant and that both bounds are finite.
    pub fn validate(&self) -> BoardResult<()> {
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(BoardError::invalid_window(format!(
                "window bounds must be finite (from={}, to={})",
                self.from, self.to
            )));
        }
        if self.from > self.to {
            return Err(BoardError::invalid_window(format!(
                "window from must be <= to (from={}, to={})",
                self.from, self.to
            )));
        }
        Ok(())
    }

    /// Like [`GenomicWindow::validate`], additionally rejecting zero-width windows.
    pub fn validate_renderable(&self) -> BoardResult<()> {
        self.validate()?;
        if self.from == self.to {
            return Err(BoardError::invalid_window(format!(
                "window must have non-zero width (from=to={})",
                self.from
            )));
        }
        Ok(())
    }

    /// Width of the window in genomic units.
    pub fn width(self) -> f64 {
        self.to - self.from
    }

    /// Return `true` when `x` lies strictly inside the window.
    pub fn contains_strict(self, x: f64) -> bool {
        self.from < x && x < self.to
    }

    /// Return `true` when `[start, end]` genuinely overlaps the window.
    ///
    /// Intervals that only touch a window edge do not overlap.
    pub fn overlaps(self, start: f64, end: f64) -> bool {
        start < self.to && end > self.from
    }
}

/// Opaque RGB color as sent by clients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Premultiplied RGBA8 bytes; opaque, so identical to straight alpha.
    pub fn to_premul_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Shared raster surface definition for one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Fill color of the canvas before any track is drawn.
    #[serde(rename = "bgColor", alias = "bg_color", default)]
    pub bg_color: Rgb8,
}

impl CanvasConfig {
    /// Reject zero-sized or oversized canvases.
    pub fn validate(&self) -> BoardResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BoardError::invalid_canvas(format!(
                "canvas width/height must be > 0 (got {}x{})",
                self.width, self.height
            )));
        }
        if self.width > MAX_CANVAS_EDGE || self.height > MAX_CANVAS_EDGE {
            return Err(BoardError::invalid_canvas(format!(
                "canvas width/height must be <= {MAX_CANVAS_EDGE} (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// One requested track: which record to draw and where.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackSpec {
    /// Track name, looked up in the annotation store.
    pub name: String,
    /// Track height in pixels.
    pub height: f64,
    /// Distance from the canvas top to the track top, in pixels.
    pub v_offset: f64,
    /// Guide line color.
    #[serde(rename = "fgColor", alias = "fg_color", default)]
    pub fg_color: Rgb8,
    /// Carried for clients; not painted.
    #[serde(rename = "bgColor", alias = "bg_color", default)]
    pub bg_color: Rgb8,
}

impl TrackSpec {
    /// Reject empty names and negative or non-finite placement.
    pub fn validate(&self) -> BoardResult<()> {
        if self.name.is_empty() {
            return Err(BoardError::validation("track name must be non-empty"));
        }
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(BoardError::validation(format!(
                "track '{}' height must be finite and >= 0 (got {})",
                self.name, self.height
            )));
        }
        if !self.v_offset.is_finite() {
            return Err(BoardError::validation(format!(
                "track '{}' v_offset must be finite (got {})",
                self.name, self.v_offset
            )));
        }
        Ok(())
    }
}

/// Composed output image: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes.
    pub data: Vec<u8>,
}

impl Canvas {
    /// Allocate a canvas filled with `bg`.
    pub fn filled(width: u32, height: u32, bg: Rgb8) -> Self {
        let px = bg.to_premul_rgba8();
        let len = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(len * 4);
        for _ in 0..len {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Read one pixel, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Convert to straight-alpha RGBA8 bytes for encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// `Option<Duration>` as fractional seconds in config files.
pub(crate) mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(v: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Duration>, D::Error> {
        match Option::<f64>::deserialize(d)? {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(Duration::from_secs_f64(v))),
            Some(v) => Err(serde::de::Error::custom(format!(
                "seconds must be finite and >= 0 (got {v})"
            ))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
