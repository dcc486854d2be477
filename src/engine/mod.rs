//! The playback engine: mode dispatch, the three mode loops and the per-run context.

pub(crate) mod context;
pub(crate) mod logo;
/// Mode selection.
pub mod mode;
pub(crate) mod movie;
pub(crate) mod text;

use std::path::PathBuf;

use crate::animation::descriptor::AnimationDescriptor;
use crate::animation::frames::load_descriptor;
use crate::archive::Archive;
use crate::engine::context::EngineContext;
use crate::engine::mode::{Mode, ModeOutcome, select_mode};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::Fps;
use crate::foundation::error::BootResult;
use crate::input::watcher::InputWatcher;
use crate::logs::filter::DisplayThreshold;
use crate::logs::source::{DeviceLogFactory, LogSourceFactory};
use crate::render::decode::{DefaultDecoder, ImageDecoder};
use crate::render::pacing::{Clock, SystemClock};
use crate::render::sink::FrameSink;

pub use logo::shine_offset;

/// Knobs for one playback run.
#[derive(Clone, Debug)]
pub struct EngineOpts {
    /// Threshold at start-up; silent means pure animation.
    pub initial_threshold: DisplayThreshold,
    /// Logo frame rate.
    pub logo_fps: Fps,
    /// Text overlay frame rate.
    pub text_fps: Fps,
    /// Stop after this many ticks (frames or text polls).
    pub tick_limit: Option<u64>,
    /// Encoded 24x4 glyph atlas; the built-in font is used when absent or unusable.
    pub font_image: Option<Vec<u8>>,
    /// Encoded logo mask.
    pub logo_mask_image: Option<Vec<u8>>,
    /// Encoded logo shine strip.
    pub logo_shine_image: Option<Vec<u8>>,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            initial_threshold: DisplayThreshold::SILENT,
            logo_fps: Fps::whole(12),
            text_fps: Fps::whole(5),
            tick_limit: None,
            font_image: None,
            logo_mask_image: None,
            logo_shine_image: None,
        }
    }
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ExitReason {
    /// The cancel token fired.
    Cancelled,
    /// `tick_limit` was reached.
    TickLimit,
    /// The movie played all its finite parts.
    Finished,
}

/// What a run did.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RunSummary {
    /// Modes entered, in order.
    pub modes: Vec<Mode>,
    /// Ticks executed.
    pub ticks: u64,
    /// Buffer swaps.
    pub frames_presented: u64,
    /// Why the run ended.
    pub exit: ExitReason,
    /// Threshold when the run ended.
    pub final_threshold: u8,
}

/// Owns the sink and every collaborator, and runs the mode state machine on the calling thread.
pub struct PlaybackEngine {
    sink: Box<dyn FrameSink>,
    opts: EngineOpts,
    archive: Option<Box<dyn Archive>>,
    input: InputWatcher,
    log_factory: Box<dyn LogSourceFactory>,
    clock: Box<dyn Clock>,
    decoder: Box<dyn ImageDecoder>,
    cancel: CancelToken,
}

impl PlaybackEngine {
    /// Engine drawing into `sink`, with no archive, no input and the default log devices.
    pub fn new(sink: Box<dyn FrameSink>, opts: EngineOpts) -> Self {
        Self {
            sink,
            opts,
            archive: None,
            input: InputWatcher::disabled(),
            log_factory: Box::new(DeviceLogFactory::new(vec![
                PathBuf::from("/dev/log/main"),
                PathBuf::from("/dev/log/system"),
            ])),
            clock: Box::new(SystemClock::new()),
            decoder: Box::new(DefaultDecoder),
            cancel: CancelToken::new(),
        }
    }

    /// Play frames from `archive` when the overlay is silent.
    pub fn with_archive(mut self, archive: impl Archive + 'static) -> Self {
        self.archive = Some(Box::new(archive));
        self
    }

    /// Watch for volume keys.
    pub fn with_input(mut self, input: InputWatcher) -> Self {
        self.input = input;
        self
    }

    /// Open log sources through `factory` each time text mode is entered.
    pub fn with_log_factory(mut self, factory: impl LogSourceFactory + 'static) -> Self {
        self.log_factory = Box::new(factory);
        self
    }

    /// Replace the wall clock (tests use a manual clock).
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the image decoder.
    pub fn with_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Share an existing cancel token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the run cooperatively.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run until cancelled, the tick limit is hit or the movie finishes.
    ///
    /// GPU resources are torn down on every exit path, including fatal surface errors, which
    /// are returned after teardown.
    #[tracing::instrument(skip_all)]
    pub fn run(self) -> BootResult<RunSummary> {
        let Self {
            sink,
            opts,
            mut archive,
            input,
            mut log_factory,
            clock,
            decoder,
            cancel,
        } = self;

        let mut ctx = EngineContext::new(sink, clock, decoder, input, cancel, opts)
            .inspect_err(|e| tracing::error!(error = %e, "engine start-up failed"))?;

        let mut descriptor: Option<AnimationDescriptor> = None;
        let mut modes = Vec::new();
        let result = loop {
            if ctx.should_stop() {
                break Ok(stop_reason(&ctx));
            }
            let mut mode = select_mode(ctx.state.threshold, archive.is_some());
            if mode == Mode::Movie && descriptor.is_none() {
                match archive.as_deref().map(|a| load_descriptor(a)) {
                    Some(Ok(desc)) => descriptor = Some(desc),
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "boot animation unusable; falling back to the logo");
                        archive = None;
                        mode = Mode::Logo;
                    }
                    None => mode = Mode::Logo,
                }
            }
            tracing::info!(?mode, threshold = ctx.state.threshold.get(), "entering mode");
            modes.push(mode);

            let outcome = match (mode, descriptor.as_mut(), archive.as_deref()) {
                (Mode::Movie, Some(desc), Some(archive)) => movie::run(&mut ctx, desc, archive),
                (Mode::Text, ..) => text::run(&mut ctx, log_factory.as_mut()),
                _ => logo::run(&mut ctx),
            };
            ctx.state.switch_requested = false;

            match outcome {
                Ok(ModeOutcome::Switch) => {}
                Ok(ModeOutcome::Cancelled) => break Ok(stop_reason(&ctx)),
                Ok(ModeOutcome::Finished) => break Ok(ExitReason::Finished),
                Err(e) if mode == Mode::Movie && !e.is_fatal_to_run() => {
                    tracing::warn!(error = %e, "movie unplayable; falling back to the logo");
                    archive = None;
                    descriptor = None;
                }
                Err(e) => break Err(e),
            }
        };

        ctx.teardown();
        let exit = result.inspect_err(|e| tracing::error!(error = %e, "playback failed"))?;
        let summary = RunSummary {
            modes,
            ticks: ctx.ticks,
            frames_presented: ctx.frames_presented,
            exit,
            final_threshold: ctx.state.threshold.get(),
        };
        tracing::info!(
            exit = ?summary.exit,
            ticks = summary.ticks,
            frames = summary.frames_presented,
            "playback finished"
        );
        Ok(summary)
    }
}

fn stop_reason(ctx: &EngineContext) -> ExitReason {
    if ctx.cancel.is_cancelled() {
        ExitReason::Cancelled
    } else {
        ExitReason::TickLimit
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/mod.rs"]
mod tests;
