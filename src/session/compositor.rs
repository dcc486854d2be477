use std::sync::{Arc, Mutex};

use crate::foundation::cancel::CancelToken;
use crate::foundation::core::Size;
use crate::foundation::error::{BootError, BootResult};
use crate::render::headless::{HeadlessProbe, HeadlessSink, SnapshotOpts};
use crate::render::sink::FrameSink;

/// Geometry of the primary display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DisplayInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl DisplayInfo {
    /// Display size as a [`Size`].
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Notified when the compositor process goes away.
pub trait DeathRecipient: Send + Sync {
    /// Called at most once, from whatever thread observed the death.
    fn compositor_died(&self);
}

/// The display-composition session the engine draws through.
pub trait Compositor {
    /// Query the primary display.
    fn display_info(&self) -> BootResult<DisplayInfo>;

    /// Create a full-screen output surface on top of every other layer.
    fn create_surface(&mut self, info: DisplayInfo) -> BootResult<Box<dyn FrameSink>>;

    /// Register for compositor death notification.
    fn link_to_death(&mut self, recipient: Arc<dyn DeathRecipient>) -> BootResult<()>;
}

/// In-process compositor backed by [`HeadlessSink`].
pub struct HeadlessCompositor {
    size: Size,
    snapshots: Option<SnapshotOpts>,
    probe: Option<HeadlessProbe>,
    recipients: Arc<Mutex<Vec<Arc<dyn DeathRecipient>>>>,
}

impl HeadlessCompositor {
    /// Compositor for a display of `size`.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            snapshots: None,
            probe: None,
            recipients: Arc::default(),
        }
    }

    /// Make created surfaces dump presented frames.
    pub fn with_snapshots(mut self, opts: SnapshotOpts) -> Self {
        self.snapshots = Some(opts);
        self
    }

    /// Probe of the most recently created surface.
    pub fn probe(&self) -> Option<HeadlessProbe> {
        self.probe.clone()
    }

    /// Notify every linked recipient, as if the compositor had died.
    pub fn simulate_death(&self) {
        let recipients = match self.recipients.lock() {
            Ok(mut r) => std::mem::take(&mut *r),
            Err(_) => return,
        };
        for r in recipients {
            r.compositor_died();
        }
    }
}

impl Compositor for HeadlessCompositor {
    fn display_info(&self) -> BootResult<DisplayInfo> {
        if self.size.is_empty() {
            return Err(BootError::surface("display reports an empty size"));
        }
        Ok(DisplayInfo {
            width: self.size.width,
            height: self.size.height,
        })
    }

    fn create_surface(&mut self, info: DisplayInfo) -> BootResult<Box<dyn FrameSink>> {
        let mut sink = HeadlessSink::new(info.size());
        if let Some(opts) = &self.snapshots {
            sink = sink.with_snapshots(opts.clone());
        }
        self.probe = Some(sink.probe());
        tracing::debug!(width = info.width, height = info.height, "created headless surface");
        Ok(Box::new(sink))
    }

    fn link_to_death(&mut self, recipient: Arc<dyn DeathRecipient>) -> BootResult<()> {
        self.recipients
            .lock()
            .map_err(|_| BootError::surface("compositor death list poisoned"))?
            .push(recipient);
        Ok(())
    }
}

/// Compositor death handler: nothing can be drawn any more, so stop the engine and end the
/// process without unwinding.
pub struct AbortOnDeath {
    cancel: CancelToken,
    kill: fn(),
}

impl AbortOnDeath {
    /// Cancel `cancel` and abort the process on death.
    pub fn new(cancel: CancelToken) -> Self {
        Self::with_kill(cancel, abort_process)
    }

    /// Same as [`AbortOnDeath::new`] with a custom process killer.
    pub fn with_kill(cancel: CancelToken, kill: fn()) -> Self {
        Self { cancel, kill }
    }
}

impl DeathRecipient for AbortOnDeath {
    fn compositor_died(&self) {
        tracing::error!("compositor died; aborting");
        self.cancel.cancel();
        (self.kill)();
    }
}

fn abort_process() {
    std::process::abort();
}

#[cfg(test)]
#[path = "../../tests/unit/session/compositor.rs"]
mod tests;
