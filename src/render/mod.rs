//! Output side of the engine: the frame sink seam, texture policy, decoding and pacing.

/// Image decoding service.
pub mod decode;
/// Software frame sink used for headless runs and tests.
pub mod headless;
/// Frame pacing and clocks.
pub mod pacing;
/// Pixel format conversions.
pub mod pixels;
/// The frame sink trait.
pub mod sink;
/// Texture upload policy.
pub mod texture;
