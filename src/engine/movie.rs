//! Frame-sequence playback from the boot animation archive.

use smallvec::SmallVec;

use crate::animation::descriptor::{AnimationDescriptor, Part};
use crate::archive::Archive;
use crate::engine::context::EngineContext;
use crate::engine::mode::ModeOutcome;
use crate::foundation::core::IRect;
use crate::foundation::error::BootResult;
use crate::render::decode::FormatHint;
use crate::render::pacing::FramePacer;
use crate::render::sink::{TextureFilter, TextureId};
use crate::render::texture::{upload_into, upload_new};

struct Layout {
    canvas: IRect,
    borders: SmallVec<[IRect; 4]>,
}

/// Play every part in order. Returns `Finished` once all finite parts are done.
#[tracing::instrument(skip_all, fields(parts = desc.parts.len()))]
pub(crate) fn run(
    ctx: &mut EngineContext,
    desc: &mut AnimationDescriptor,
    archive: &dyn Archive,
) -> BootResult<ModeOutcome> {
    let fps = desc.frame_rate()?;
    let screen = ctx.sink.size();
    let canvas = IRect::centered(screen, desc.size());
    let layout = Layout {
        canvas,
        borders: screen.to_rect().subtract(canvas),
    };

    ctx.sink.set_scissor(None);
    ctx.sink.set_blend(false);
    ctx.sink.clear();
    ctx.present()?;

    let mut pacer = FramePacer::new(fps, ctx.clock.as_ref());
    for part in &mut desc.parts {
        if part.frames.is_empty() {
            continue;
        }
        let mut scratch = None;
        let played = play_part(ctx, part, archive, &layout, &mut pacer, &mut scratch);
        release_part(ctx, part, scratch);
        if let Some(outcome) = played? {
            return Ok(outcome);
        }
    }
    Ok(ModeOutcome::Finished)
}

fn play_part(
    ctx: &mut EngineContext,
    part: &mut Part,
    archive: &dyn Archive,
    layout: &Layout,
    pacer: &mut FramePacer,
    scratch: &mut Option<TextureId>,
) -> BootResult<Option<ModeOutcome>> {
    tracing::debug!(path = %part.path, repeat = part.repeat_count, frames = part.frames.len(), "part start");
    let mut pass = 0u32;
    while part.is_infinite() || pass < part.repeat_count {
        for index in 0..part.frames.len() {
            if let Some(outcome) = ctx.interrupt() {
                return Ok(Some(outcome));
            }
            let texture = frame_texture(ctx, part, index, archive, scratch)?;

            for rect in &layout.borders {
                ctx.sink.set_scissor(Some(*rect));
                ctx.sink.clear();
            }
            ctx.sink.set_scissor(None);
            if let Some(id) = texture {
                ctx.sink.draw_texture(id, layout.canvas);
            }
            ctx.draw_overlay();
            ctx.present()?;
            ctx.end_tick();
            ctx.pace(pacer);

            if ctx.should_stop() {
                return Ok(Some(ModeOutcome::Cancelled));
            }
        }
        pacer.hold(part.pause_frames, ctx.clock.as_ref());
        pass = pass.saturating_add(1);
    }
    Ok(None)
}

/// Texture for frame `index`: cached across passes for repeating parts, re-decoded into a
/// single scratch texture for single-pass parts. `None` when the frame does not decode.
fn frame_texture(
    ctx: &mut EngineContext,
    part: &mut Part,
    index: usize,
    archive: &dyn Archive,
    scratch: &mut Option<TextureId>,
) -> BootResult<Option<TextureId>> {
    let caches = part.caches_textures();
    let frame = &mut part.frames[index];
    if let Some(id) = frame.texture {
        return Ok(Some(id));
    }

    let bytes = archive.bytes(frame.span.clone())?;
    let image = match ctx.decoder.decode(bytes, FormatHint::Opaque565) {
        Ok(img) => img,
        Err(e) => {
            tracing::warn!(frame = %frame.name, error = %e, "skipping undecodable frame");
            return Ok(None);
        }
    };

    if caches {
        let tex = upload_new(ctx.sink.as_mut(), &image, TextureFilter::Linear)?;
        frame.texture = Some(tex.id);
        return Ok(Some(tex.id));
    }

    let id = match *scratch {
        Some(id) => id,
        None => {
            let id = ctx.sink.create_texture()?;
            ctx.sink.set_filter(id, TextureFilter::Linear);
            *scratch = Some(id);
            id
        }
    };
    upload_into(ctx.sink.as_mut(), id, &image)?;
    Ok(Some(id))
}

fn release_part(ctx: &mut EngineContext, part: &mut Part, scratch: Option<TextureId>) {
    for frame in &mut part.frames {
        if let Some(id) = frame.texture.take() {
            ctx.sink.delete_texture(id);
        }
    }
    if let Some(id) = scratch {
        ctx.sink.delete_texture(id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/movie.rs"]
mod tests;
