//! Linear genomic-to-pixel scaling.

use crate::foundation::{
    core::GenomicWindow,
    error::{BoardError, BoardResult},
};

/// Linear map from a domain interval `[d0, d1]` onto a range interval `[r0, r1]`.
///
/// Built once per request and shared by every track, so all tracks of one response share the
/// same pixel alignment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    range: (f64, f64),
    domain: (f64, f64),
    factor: f64,
}

impl LinearScale {
    /// Build the map. A zero-width or non-finite domain is an [`BoardError::InvalidWindow`].
    pub fn new(range: [f64; 2], domain: [f64; 2]) -> BoardResult<Self> {
        let [r0, r1] = range;
        let [d0, d1] = domain;
        if !(r0.is_finite() && r1.is_finite()) {
            return Err(BoardError::validation(format!(
                "scale range must be finite (got [{r0}, {r1}])"
            )));
        }
        if !(d0.is_finite() && d1.is_finite()) {
            return Err(BoardError::invalid_window(format!(
                "scale domain must be finite (got [{d0}, {d1}])"
            )));
        }
        if d0 == d1 {
            return Err(BoardError::invalid_window(format!(
                "cannot scale a zero-width domain [{d0}, {d1}]"
            )));
        }
        Ok(Self {
            range: (r0, r1),
            domain: (d0, d1),
            factor: (r1 - r0) / (d1 - d0),
        })
    }

    /// Map `[0, width_px]` onto the genomic window.
    pub fn for_window(width_px: u32, window: GenomicWindow) -> BoardResult<Self> {
        Self::new([0.0, f64::from(width_px)], [window.from, window.to])
    }

    /// Pixels per genomic unit.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Map a genomic coordinate to pixel space.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        self.range.0 + self.factor * (x - self.domain.0)
    }

    /// Map a pixel coordinate back to genomic space.
    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        self.domain.0 + (px - self.range.0) / self.factor
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/linear.rs"]
mod tests;
