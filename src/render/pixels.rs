//! Conversions between the sink pixel formats and straight-alpha RGBA8.

use crate::foundation::error::{BootError, BootResult};
use crate::render::sink::PixelFormat;

/// Pack straight RGBA8 into `format`.
pub fn pack_rgba8(format: PixelFormat, rgba: &[u8]) -> Vec<u8> {
    match format {
        PixelFormat::Rgba8888 => rgba.to_vec(),
        PixelFormat::Alpha8 => rgba.chunks_exact(4).map(|px| px[3]).collect(),
        PixelFormat::Rgb565 => rgba
            .chunks_exact(4)
            .flat_map(|px| {
                let r = u16::from(px[0] >> 3);
                let g = u16::from(px[1] >> 2);
                let b = u16::from(px[2] >> 3);
                ((r << 11) | (g << 5) | b).to_ne_bytes()
            })
            .collect(),
        PixelFormat::Rgba4444 => rgba
            .chunks_exact(4)
            .flat_map(|px| {
                let [r, g, b, a] = [px[0], px[1], px[2], px[3]].map(|c| u16::from(c >> 4));
                ((r << 12) | (g << 8) | (b << 4) | a).to_ne_bytes()
            })
            .collect(),
    }
}

/// Expand `pixels` in `format` into straight RGBA8.
///
/// Alpha-only texels expand to white with the stored coverage, which is how glyph and mask
/// textures blend.
pub fn unpack_to_rgba8(
    format: PixelFormat,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> BootResult<Vec<u8>> {
    let expected = format.buffer_len(width, height);
    if pixels.len() < expected {
        return Err(BootError::validation(format!(
            "pixel buffer too short: {} < {expected} for {width}x{height} {format:?}",
            pixels.len()
        )));
    }
    let pixels = &pixels[..expected];

    let out = match format {
        PixelFormat::Rgba8888 => pixels.to_vec(),
        PixelFormat::Alpha8 => pixels.iter().flat_map(|&a| [255, 255, 255, a]).collect(),
        PixelFormat::Rgb565 => pixels
            .chunks_exact(2)
            .flat_map(|b| {
                let v = u16::from_ne_bytes([b[0], b[1]]);
                let r = ((v >> 11) & 0x1f) as u8;
                let g = ((v >> 5) & 0x3f) as u8;
                let bl = (v & 0x1f) as u8;
                [
                    (r << 3) | (r >> 2),
                    (g << 2) | (g >> 4),
                    (bl << 3) | (bl >> 2),
                    255,
                ]
            })
            .collect(),
        PixelFormat::Rgba4444 => pixels
            .chunks_exact(2)
            .flat_map(|b| {
                let v = u16::from_ne_bytes([b[0], b[1]]);
                [12u16, 8, 4, 0].map(|shift| {
                    let n = ((v >> shift) & 0xf) as u8;
                    (n << 4) | n
                })
            })
            .collect(),
    };
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pixels.rs"]
mod tests;
