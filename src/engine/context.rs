use crate::engine::EngineOpts;
use crate::engine::mode::{ModeOutcome, ModeState};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::Size;
use crate::foundation::error::{BootError, BootResult};
use crate::input::watcher::InputWatcher;
use crate::logs::filter::LogClassifier;
use crate::render::decode::{FormatHint, ImageDecoder};
use crate::render::pacing::{Clock, FramePacer};
use crate::render::sink::FrameSink;
use crate::text::font::FontAtlas;
use crate::text::line_buffer::LogLineBuffer;
use crate::text::overlay;

/// Everything a mode needs while it runs, owned by the engine for one run.
pub(crate) struct EngineContext {
    pub sink: Box<dyn FrameSink>,
    pub clock: Box<dyn Clock>,
    pub decoder: Box<dyn ImageDecoder>,
    pub input: InputWatcher,
    pub cancel: CancelToken,
    pub opts: EngineOpts,
    pub state: ModeState,
    pub font: FontAtlas,
    pub buffer: LogLineBuffer,
    pub classifier: LogClassifier,
    pub ticks: u64,
    pub frames_presented: u64,
}

impl EngineContext {
    /// Load the font and size the line buffer to the surface. On failure the sink is released
    /// before the error is returned.
    pub fn new(
        mut sink: Box<dyn FrameSink>,
        clock: Box<dyn Clock>,
        decoder: Box<dyn ImageDecoder>,
        input: InputWatcher,
        cancel: CancelToken,
        opts: EngineOpts,
    ) -> BootResult<Self> {
        let size = sink.size();
        let font = match check_surface(size)
            .and_then(|()| upload_font(sink.as_mut(), decoder.as_ref(), opts.font_image.as_deref()))
        {
            Ok(font) => font,
            Err(e) => {
                sink.release();
                return Err(e);
            }
        };

        let cols = (size.width / font.glyph_width()) as usize;
        let rows = (size.height / font.glyph_height()) as usize;
        tracing::debug!(cols, rows, "log overlay geometry");

        Ok(Self {
            sink,
            clock,
            decoder,
            input,
            cancel,
            state: ModeState::new(opts.initial_threshold),
            opts,
            font,
            buffer: LogLineBuffer::new(cols, rows),
            classifier: LogClassifier::default(),
            ticks: 0,
            frames_presented: 0,
        })
    }

    /// Cancellation requested or the tick limit reached.
    pub fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.tick_limit_reached()
    }

    pub fn tick_limit_reached(&self) -> bool {
        self.opts.tick_limit.is_some_and(|limit| self.ticks >= limit)
    }

    /// Per-frame check: stop first, then one input poll.
    pub fn interrupt(&mut self) -> Option<ModeOutcome> {
        if self.should_stop() {
            return Some(ModeOutcome::Cancelled);
        }
        self.input.poll(&mut self.state);
        self.state.switch_requested.then_some(ModeOutcome::Switch)
    }

    /// Draw the log rows (unless silent) and the boot-loop banner (always, when raised).
    pub fn draw_overlay(&mut self) {
        let banner = self.classifier.banner();
        if self.state.threshold.is_silent() {
            if banner.is_some() {
                let empty = LogLineBuffer::new(0, 0);
                overlay::draw_overlay(self.sink.as_mut(), &self.font, &empty, banner.as_deref());
            }
            return;
        }
        overlay::draw_overlay(
            self.sink.as_mut(),
            &self.font,
            &self.buffer,
            banner.as_deref(),
        );
    }

    /// Swap buffers. Failure is fatal to the run.
    pub fn present(&mut self) -> BootResult<()> {
        self.sink.swap_buffers()?;
        self.frames_presented += 1;
        Ok(())
    }

    pub fn end_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn pace(&self, pacer: &mut FramePacer) {
        pacer.pace(self.clock.as_ref());
    }

    /// Clear, release the font and hand the surface back.
    pub fn teardown(&mut self) {
        self.sink.set_scissor(None);
        self.sink.set_blend(false);
        self.sink.clear();
        self.font.release(self.sink.as_mut());
        self.sink.release();
    }
}

/// Upload the configured font, or the built-in one when it is absent or unusable.
fn upload_font(
    sink: &mut dyn FrameSink,
    decoder: &dyn ImageDecoder,
    configured: Option<&[u8]>,
) -> BootResult<FontAtlas> {
    if let Some(bytes) = configured {
        match decoder
            .decode(bytes, FormatHint::Alpha8)
            .and_then(|image| FontAtlas::upload(sink, &image))
        {
            Ok(font) => return Ok(font),
            Err(e) if e.is_fatal_to_run() => return Err(e),
            Err(e) => tracing::warn!(error = %e, "font image unusable; using built-in font"),
        }
    }
    FontAtlas::upload(sink, &FontAtlas::builtin_image())
}

fn check_surface(size: Size) -> BootResult<()> {
    if size.is_empty() {
        return Err(BootError::surface(format!(
            "output surface {}x{} has no pixels",
            size.width, size.height
        )));
    }
    Ok(())
}
