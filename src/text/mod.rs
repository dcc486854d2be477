//! Text overlay: the ring of log rows, the glyph atlas and the code that draws them.

/// Glyph atlas.
pub mod font;
/// Ring buffer of fixed-width log rows.
pub mod line_buffer;
/// Drawing rows through a frame sink.
pub mod overlay;
