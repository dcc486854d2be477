//! Display session plumbing: the compositor seam and engine start-up.

/// Compositor seam, headless compositor and death handling.
pub mod compositor;
/// Assembling an engine from configuration.
pub mod startup;
