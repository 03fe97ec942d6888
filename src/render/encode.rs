use std::{io::Cursor, path::Path};

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::{
    core::Canvas,
    error::{BoardError, BoardResult},
};

/// Prefix of the image field returned to clients.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode the canvas as PNG (straight alpha).
pub fn png_bytes(canvas: &Canvas) -> BoardResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(canvas.width, canvas.height, canvas.to_straight_rgba8())
        .ok_or_else(|| BoardError::render("canvas buffer does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| BoardError::render(format!("png encode failed: {e}")))?;
    Ok(buf)
}

/// Encode the canvas as a `data:image/png;base64,` URI.
pub fn data_uri(canvas: &Canvas) -> BoardResult<String> {
    let png = png_bytes(canvas)?;
    let mut out = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png.len().div_ceil(3) * 4);
    out.push_str(PNG_DATA_URI_PREFIX);
    base64::engine::general_purpose::STANDARD.encode_string(&png, &mut out);
    Ok(out)
}

/// Write the canvas to `path` as PNG, creating parent directories.
pub fn save_png(canvas: &Canvas, path: impl AsRef<Path>) -> BoardResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = png_bytes(canvas)?;
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Decode the PNG payload of a data URI produced by [`data_uri`].
pub fn decode_data_uri(uri: &str) -> BoardResult<Vec<u8>> {
    let payload = uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .ok_or_else(|| BoardError::validation("not a png data uri"))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| BoardError::validation(format!("invalid base64 payload: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
