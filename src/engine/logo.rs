//! Built-in logo: a shine strip sweeping behind a mask with see-through lettering.

use std::time::Duration;

use font8x8::{BASIC_FONTS, UnicodeFonts};

use crate::engine::context::EngineContext;
use crate::engine::mode::ModeOutcome;
use crate::foundation::core::{IRect, Size};
use crate::foundation::error::BootResult;
use crate::render::decode::{DecodedImage, FormatHint};
use crate::render::pacing::FramePacer;
use crate::render::pixels::pack_rgba8;
use crate::render::sink::{PixelFormat, TextureFilter};
use crate::render::texture::{Texture, upload_new};

const SHINE_STEP: Duration = Duration::from_micros(16_667);
const LOGO_TEXT: &str = "BOOTING";
const LOGO_SCALE: u32 = 4;
const LOGO_PAD: u32 = 8;
const SHINE_WIDTH: u32 = 256;

/// Horizontal distance the shine strip sits left of the logo after `elapsed`.
///
/// A sawtooth over `[0, shine_width]`: the strip advances four pixels per 16.667 ms and wraps
/// every `shine_width` pixels.
pub fn shine_offset(elapsed: Duration, shine_width: u32) -> i32 {
    if shine_width == 0 {
        return 0;
    }
    let w = f64::from(shine_width);
    let t = 4.0 * (elapsed.as_secs_f64() / SHINE_STEP.as_secs_f64()) / w;
    ((1.0 - t.fract()) * w) as i32
}

/// Opaque dark plate with the logo text cut out.
pub fn builtin_mask() -> DecodedImage {
    let glyph = 8 * LOGO_SCALE;
    let width = glyph * LOGO_TEXT.len() as u32 + 2 * LOGO_PAD;
    let height = glyph + 2 * LOGO_PAD;
    let mut rgba = [0x20, 0x20, 0x20, 0xff].repeat((width * height) as usize);

    for (i, ch) in LOGO_TEXT.chars().enumerate() {
        let Some(bitmap) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let x0 = LOGO_PAD + i as u32 * glyph;
        for y in 0..glyph {
            let bits = bitmap[(y / LOGO_SCALE) as usize];
            for x in 0..glyph {
                if bits & (1 << (x / LOGO_SCALE)) != 0 {
                    let at = (((LOGO_PAD + y) * width + x0 + x) * 4 + 3) as usize;
                    rgba[at] = 0;
                }
            }
        }
    }

    DecodedImage {
        width,
        height,
        format: PixelFormat::Rgba8888,
        pixels: rgba,
    }
}

/// Opaque horizontal highlight, brightest in the middle.
pub fn builtin_shine(height: u32) -> DecodedImage {
    let half = SHINE_WIDTH / 2;
    let row: Vec<u8> = (0..SHINE_WIDTH)
        .flat_map(|x| {
            let d = x.abs_diff(half);
            let v = (0xff - (d * (0xff - 0x40) / half)) as u8;
            [v, v, v, 0xff]
        })
        .collect();
    let rgba = row.repeat(height as usize);
    DecodedImage {
        width: SHINE_WIDTH,
        height,
        format: PixelFormat::Rgb565,
        pixels: pack_rgba8(PixelFormat::Rgb565, &rgba),
    }
}

struct LogoTextures {
    mask: Texture,
    shine: Texture,
}

impl LogoTextures {
    fn load(ctx: &mut EngineContext) -> BootResult<Self> {
        let mask_img = decode_or(ctx, ctx.opts.logo_mask_image.as_deref(), FormatHint::Natural)
            .unwrap_or_else(builtin_mask);
        let shine_img = decode_or(ctx, ctx.opts.logo_shine_image.as_deref(), FormatHint::Opaque565)
            .unwrap_or_else(|| builtin_shine(mask_img.height));

        let mask = upload_new(ctx.sink.as_mut(), &mask_img, TextureFilter::Nearest)?;
        let shine = match upload_new(ctx.sink.as_mut(), &shine_img, TextureFilter::Nearest) {
            Ok(t) => t,
            Err(e) => {
                ctx.sink.delete_texture(mask.id);
                return Err(e);
            }
        };
        Ok(Self { mask, shine })
    }

    fn release(&self, ctx: &mut EngineContext) {
        ctx.sink.delete_texture(self.mask.id);
        ctx.sink.delete_texture(self.shine.id);
    }
}

fn decode_or(ctx: &EngineContext, bytes: Option<&[u8]>, hint: FormatHint) -> Option<DecodedImage> {
    match ctx.decoder.decode(bytes?, hint) {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::warn!(error = %e, "logo image unusable; using built-in logo");
            None
        }
    }
}

/// Run the logo until cancelled or switched. Textures live exactly as long as this call.
#[tracing::instrument(skip_all)]
pub(crate) fn run(ctx: &mut EngineContext) -> BootResult<ModeOutcome> {
    let textures = LogoTextures::load(ctx)?;
    let outcome = animate(ctx, &textures);
    textures.release(ctx);
    outcome
}

fn animate(ctx: &mut EngineContext, tex: &LogoTextures) -> BootResult<ModeOutcome> {
    ctx.sink.set_scissor(None);
    ctx.sink.set_blend(false);
    ctx.sink.clear();
    ctx.present()?;

    let logo = IRect::centered(ctx.sink.size(), Size::new(tex.mask.width, tex.mask.height));
    let shine_w = tex.shine.width as i32;
    let shine_h = tex.shine.height as i32;
    let start = ctx.clock.now();
    let mut pacer = FramePacer::new(ctx.opts.logo_fps, ctx.clock.as_ref());

    loop {
        if let Some(outcome) = ctx.interrupt() {
            return Ok(outcome);
        }

        let x = logo.x - shine_offset(ctx.clock.now().saturating_sub(start), tex.shine.width);
        ctx.sink.set_scissor(None);
        ctx.sink.clear();

        ctx.sink.set_scissor(Some(logo));
        ctx.sink.set_blend(false);
        ctx.sink.draw_texture(tex.shine.id, IRect::new(x, logo.y, shine_w, shine_h));
        ctx.sink
            .draw_texture(tex.shine.id, IRect::new(x + shine_w, logo.y, shine_w, shine_h));
        ctx.sink.set_blend(true);
        ctx.sink.draw_texture(tex.mask.id, logo);
        ctx.sink.set_blend(false);
        ctx.sink.set_scissor(None);

        ctx.draw_overlay();
        ctx.present()?;
        ctx.end_tick();
        ctx.pace(&mut pacer);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/logo.rs"]
mod tests;
