//! Volume key input: event codec, device access and the watcher that turns presses into
//! mode switches.

/// Device access and capability probing.
pub mod device;
/// `input_event` codec and key codes.
pub mod event;
/// Device discovery and polling.
pub mod watcher;
