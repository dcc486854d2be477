use font8x8::{BASIC_FONTS, UnicodeFonts};

use crate::foundation::core::IRect;
use crate::foundation::error::{BootError, BootResult};
use crate::render::decode::DecodedImage;
use crate::render::sink::{FrameSink, PixelFormat, TextureFilter};
use crate::render::texture::{Texture, upload_new};

/// Printable ASCII glyphs in an atlas: codes 32..128.
pub const GLYPH_COUNT: u32 = 96;
/// Atlas layout: glyphs per atlas row (four rows total).
pub const GLYPHS_PER_ROW: u32 = 24;

const BUILTIN_CELL_W: u32 = 10;
const BUILTIN_CELL_H: u32 = 18;

/// Monospace glyph atlas uploaded as one texture.
#[derive(Clone, Copy, Debug)]
pub struct FontAtlas {
    texture: Texture,
    glyph_width: u32,
    glyph_height: u32,
}

impl FontAtlas {
    /// Built-in 10x18 atlas rasterised from `font8x8` bitmaps, doubled vertically.
    pub fn builtin_image() -> DecodedImage {
        let width = BUILTIN_CELL_W * GLYPHS_PER_ROW;
        let height = BUILTIN_CELL_H * (GLYPH_COUNT / GLYPHS_PER_ROW);
        let mut alpha = vec![0u8; (width * height) as usize];

        for code in 0..GLYPH_COUNT {
            let Some(ch) = char::from_u32(code + 32) else {
                continue;
            };
            let Some(bitmap) = BASIC_FONTS.get(ch) else {
                continue;
            };
            let cell_x = (code % GLYPHS_PER_ROW) * BUILTIN_CELL_W + 1;
            let cell_y = (code / GLYPHS_PER_ROW) * BUILTIN_CELL_H + 1;
            for (gy, bits) in bitmap.iter().enumerate() {
                for gx in 0..8u32 {
                    if bits & (1 << gx) == 0 {
                        continue;
                    }
                    for dy in 0..2u32 {
                        let y = cell_y + gy as u32 * 2 + dy;
                        alpha[(y * width + cell_x + gx) as usize] = 255;
                    }
                }
            }
        }

        DecodedImage {
            width,
            height,
            format: PixelFormat::Alpha8,
            pixels: alpha,
        }
    }

    /// Upload an atlas image laid out as a 24x4 glyph grid.
    pub fn upload(sink: &mut dyn FrameSink, image: &DecodedImage) -> BootResult<Self> {
        let glyph_width = image.width / GLYPHS_PER_ROW;
        let glyph_height = image.height / (GLYPH_COUNT / GLYPHS_PER_ROW);
        if glyph_width == 0 || glyph_height == 0 {
            return Err(BootError::validation(format!(
                "font atlas {}x{} too small for a {GLYPHS_PER_ROW}x4 glyph grid",
                image.width, image.height
            )));
        }
        let texture = upload_new(sink, image, TextureFilter::Nearest)?;
        Ok(Self {
            texture,
            glyph_width,
            glyph_height,
        })
    }

    /// Texture holding the atlas.
    pub fn texture(&self) -> Texture {
        self.texture
    }

    /// Advance width of one glyph.
    pub fn glyph_width(&self) -> u32 {
        self.glyph_width
    }

    /// Line height.
    pub fn glyph_height(&self) -> u32 {
        self.glyph_height
    }

    /// Atlas region of `byte`, or `None` when the byte has no glyph.
    pub fn glyph_crop(&self, byte: u8) -> Option<IRect> {
        let code = u32::from(byte).checked_sub(32)?;
        if code >= GLYPH_COUNT {
            return None;
        }
        Some(IRect::new(
            ((code % GLYPHS_PER_ROW) * self.glyph_width) as i32,
            ((code / GLYPHS_PER_ROW) * self.glyph_height) as i32,
            self.glyph_width as i32,
            self.glyph_height as i32,
        ))
    }

    /// Release the atlas texture.
    pub fn release(&self, sink: &mut dyn FrameSink) {
        sink.delete_texture(self.texture.id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
