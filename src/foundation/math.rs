pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Center of the pixel containing `v`, so a 1px stroke covers exactly one pixel row/column.
pub(crate) fn snap_to_pixel_center(v: f64) -> f64 {
    v.floor() + 0.5
}
