use crate::{
    foundation::{
        core::Canvas,
        error::{BoardError, BoardResult},
        math::mul_div255_u16,
    },
    render::surface::TrackLayer,
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                let dc = mul_div255_u16(u16::from(dst[i]), inv);
                out[i] = (u16::from(src[i]) + dc).min(255) as u8;
            }
            out
        }
    }
}

/// Blend `src` over `dst`, both tightly packed premultiplied RGBA8 of equal length.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> BoardResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BoardError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Blend a finished track layer onto the canvas.
pub fn blend_layer(canvas: &mut Canvas, layer: &TrackLayer) -> BoardResult<()> {
    if canvas.width != layer.width || canvas.height != layer.height {
        return Err(BoardError::render(format!(
            "layer size {}x{} does not match canvas {}x{}",
            layer.width, layer.height, canvas.width, canvas.height
        )));
    }
    over_in_place(&mut canvas.data, &layer.data)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
