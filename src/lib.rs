//! bootanim is a platform boot animation engine.
//!
//! It plays a frame-sequence animation from a zip archive, or a built-in logo animation when no
//! usable archive exists, while tailing kernel log devices and overlaying selected lines as
//! text. Volume buttons move between the silent animation and the log overlay. The API is
//! engine-oriented:
//!
//! - Load a [`BootConfig`]
//! - Assemble a [`PlaybackEngine`] through a [`Compositor`] with [`prepare_engine`], or by hand
//!   from a [`FrameSink`] and its collaborators
//! - [`PlaybackEngine::run`] until cancelled, finished or out of ticks
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Boot animation manifests and frame resolution.
pub mod animation;
/// Read-only archives and the zip codec.
pub mod archive;
/// Run configuration.
pub mod config;
/// The mode state machine and its modes.
pub mod engine;
/// Volume-key input.
pub mod input;
/// Kernel log sources, classification and merging.
pub mod logs;
/// Frame sinks, textures, decoding and pacing.
pub mod render;
/// Compositor session and start-up.
pub mod session;
/// Text rendering: line buffer, font atlas and overlay.
pub mod text;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::core::{Fps, IRect, Size};
pub use crate::foundation::error::{BootError, BootResult};

pub use crate::animation::descriptor::{AnimationDescriptor, Frame, Part};
pub use crate::archive::{Archive, ArchiveEntry, CompressionMethod, MemoryArchive, ZipArchive};
pub use crate::config::BootConfig;
pub use crate::engine::mode::Mode;
pub use crate::engine::{EngineOpts, ExitReason, PlaybackEngine, RunSummary};
pub use crate::logs::filter::DisplayThreshold;
pub use crate::render::headless::{HeadlessProbe, HeadlessSink, SinkStats, SnapshotOpts};
pub use crate::render::pacing::{Clock, ManualClock, SystemClock};
pub use crate::render::sink::FrameSink;
pub use crate::session::compositor::{Compositor, DisplayInfo, HeadlessCompositor};
pub use crate::session::startup::prepare_engine;
