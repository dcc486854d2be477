use crate::logs::filter::DisplayThreshold;

/// The three mutually exclusive drawing modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Mode {
    /// Built-in logo with a sweeping shine.
    Logo,
    /// Frame sequence from the boot animation archive.
    Movie,
    /// Log overlay only.
    Text,
}

/// State shared between the dispatcher, the modes and the input watcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeState {
    /// Current overlay threshold.
    pub threshold: DisplayThreshold,
    /// Set by input, consumed once per dispatch.
    pub switch_requested: bool,
}

impl ModeState {
    /// Start at `threshold` with no pending switch.
    pub fn new(threshold: DisplayThreshold) -> Self {
        Self {
            threshold,
            switch_requested: false,
        }
    }
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new(DisplayThreshold::SILENT)
    }
}

/// Entry selection: any visible overlay means text mode, otherwise the movie when an archive
/// is available, otherwise the logo.
pub fn select_mode(threshold: DisplayThreshold, movie_available: bool) -> Mode {
    if !threshold.is_silent() {
        Mode::Text
    } else if movie_available {
        Mode::Movie
    } else {
        Mode::Logo
    }
}

/// How a mode's loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeOutcome {
    /// Input asked for a re-dispatch.
    Switch,
    /// Cancellation (or the tick limit) was observed.
    Cancelled,
    /// The mode ran out of content (a movie with only finite parts).
    Finished,
}

#[cfg(test)]
#[path = "../../tests/unit/engine/mode.rs"]
mod tests;
