use crate::engine::context::EngineContext;
use crate::engine::mode::ModeOutcome;
use crate::foundation::error::BootResult;
use crate::logs::filter::DisplayThreshold;
use crate::logs::multiplexer::LogMultiplexer;
use crate::logs::source::LogSourceFactory;
use crate::render::pacing::FramePacer;

/// Log overlay on a black screen.
///
/// Sources are opened on entry and dropped (closed) on every exit path. Redraws happen only on
/// the first tick or when the buffer changed. If no log source is left the threshold is forced
/// back to silent and a switch is requested.
#[tracing::instrument(skip_all, fields(threshold = ctx.state.threshold.get()))]
pub(crate) fn run(
    ctx: &mut EngineContext,
    factory: &mut dyn LogSourceFactory,
) -> BootResult<ModeOutcome> {
    let mut mux = LogMultiplexer::open(factory);
    ctx.buffer.clear();
    let mut pacer = FramePacer::new(ctx.opts.text_fps, ctx.clock.as_ref());
    let mut dirty = true;

    loop {
        if let Some(outcome) = ctx.interrupt() {
            return Ok(outcome);
        }

        match mux.poll(&mut ctx.classifier, &mut ctx.buffer, ctx.state.threshold) {
            Ok(changed) => dirty |= changed,
            Err(e) => {
                tracing::warn!(error = %e, "log overlay unavailable; leaving text mode");
                ctx.state.threshold = DisplayThreshold::SILENT;
                ctx.state.switch_requested = true;
                return Ok(ModeOutcome::Switch);
            }
        }

        if dirty {
            ctx.sink.set_scissor(None);
            ctx.sink.set_blend(false);
            ctx.sink.clear();
            ctx.draw_overlay();
            ctx.present()?;
            dirty = false;
        }
        ctx.end_tick();
        ctx.pace(&mut pacer);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/text.rs"]
mod tests;
