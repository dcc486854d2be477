use anyhow::Context;

use crate::foundation::error::{BootError, BootResult};
use crate::render::pixels::pack_rgba8;
use crate::render::sink::PixelFormat;

/// A decoded image in one of the sink pixel formats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout of `pixels`.
    pub format: PixelFormat,
    /// Tightly packed row-major texels.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wrap packed pixels, checking the buffer length.
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> BootResult<Self> {
        if pixels.len() != format.buffer_len(width, height) {
            return Err(BootError::validation(format!(
                "{width}x{height} {format:?} image needs {} bytes, got {}",
                format.buffer_len(width, height),
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Pack straight RGBA8 pixels into `format`.
    pub fn from_rgba8(width: u32, height: u32, format: PixelFormat, rgba: &[u8]) -> BootResult<Self> {
        Self::new(width, height, format, pack_rgba8(format, rgba))
    }
}

/// Which pixel format a decode should produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatHint {
    /// Keep alpha when the source has it (RGBA8888), otherwise RGB565.
    Natural,
    /// Prefer RGB565; images carrying alpha still decode to RGBA8888.
    Opaque565,
    /// Force 4-4-4-4.
    Rgba4444,
    /// Alpha coverage only (alpha channel, or luma for opaque sources).
    Alpha8,
}

/// Image decoding service: `decode(bytes) -> pixel buffer + format`.
pub trait ImageDecoder: Send {
    /// Decode encoded bytes (PNG, JPEG, ...) into a packed image.
    fn decode(&self, bytes: &[u8], hint: FormatHint) -> BootResult<DecodedImage>;
}

/// Decoder backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultDecoder;

impl ImageDecoder for DefaultDecoder {
    fn decode(&self, bytes: &[u8], hint: FormatHint) -> BootResult<DecodedImage> {
        let dyn_img = image::load_from_memory(bytes)
            .context("decode image from memory")
            .map_err(|e| BootError::decode(format!("{e:#}")))?;
        let has_alpha = dyn_img.color().has_alpha();
        let (width, height) = (dyn_img.width(), dyn_img.height());

        let format = match hint {
            FormatHint::Natural | FormatHint::Opaque565 if has_alpha => PixelFormat::Rgba8888,
            FormatHint::Natural | FormatHint::Opaque565 => PixelFormat::Rgb565,
            FormatHint::Rgba4444 => PixelFormat::Rgba4444,
            FormatHint::Alpha8 => PixelFormat::Alpha8,
        };

        let mut rgba = dyn_img.to_rgba8().into_raw();
        if format == PixelFormat::Alpha8 && !has_alpha {
            // Opaque masks carry their coverage in luma.
            for px in rgba.chunks_exact_mut(4) {
                let luma = (u16::from(px[0]) * 77 + u16::from(px[1]) * 150 + u16::from(px[2]) * 29)
                    >> 8;
                px[3] = luma as u8;
            }
        }

        DecodedImage::from_rgba8(width, height, format, &rgba)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/decode.rs"]
mod tests;
