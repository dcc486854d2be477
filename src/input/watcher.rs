use std::path::Path;

use crate::engine::mode::ModeState;
use crate::input::device::{CapabilityProbe, EvdevDevice, InputDevice};
use crate::input::event::{KEY_VOLUMEDOWN, KEY_VOLUMEUP};

/// Turns volume key presses into threshold changes and switch requests.
///
/// Without a device every poll is a no-op; input is never fatal.
pub struct InputWatcher {
    device: Option<Box<dyn InputDevice>>,
}

impl InputWatcher {
    /// Watcher with input switched off.
    pub fn disabled() -> Self {
        Self { device: None }
    }

    /// Watch an already opened device.
    pub fn with_device(device: Box<dyn InputDevice>) -> Self {
        Self {
            device: Some(device),
        }
    }

    /// Scan `dir` for `event*` nodes and keep the first one exposing both volume keys.
    ///
    /// Nodes are tried in numeric order; rejected nodes are closed straight away.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn discover(dir: &Path, probe: &dyn CapabilityProbe) -> Self {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::info!(error = %e, "input directory unreadable; input disabled");
                return Self::disabled();
            }
        };

        let mut nodes: Vec<(u32, std::path::PathBuf)> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name();
                let index = name.to_str()?.strip_prefix("event")?.parse().ok()?;
                Some((index, entry.path()))
            })
            .collect();
        nodes.sort();

        for (_, path) in nodes {
            let device = match EvdevDevice::open(&path) {
                Ok(d) => d,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping input node");
                    continue;
                }
            };
            match probe.key_bits(&path) {
                Ok(bits) if bits.has(KEY_VOLUMEUP) && bits.has(KEY_VOLUMEDOWN) => {
                    tracing::info!(device = %path.display(), "volume keys found");
                    return Self::with_device(Box::new(device));
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(device = %path.display(), error = %e, "no key capabilities"),
            }
        }

        tracing::info!("no device with volume keys; input disabled");
        Self::disabled()
    }

    /// Whether a device is being watched.
    pub fn is_enabled(&self) -> bool {
        self.device.is_some()
    }

    /// Read at most one event and apply it to `state`.
    ///
    /// Volume-up lowers the threshold, volume-down raises it; either sets `switch_requested`.
    /// A read failure drops the device for the rest of the run.
    pub fn poll(&mut self, state: &mut ModeState) {
        let Some(device) = self.device.as_mut() else {
            return;
        };
        let event = match device.read_event() {
            Ok(Some(ev)) => ev,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(device = device.name(), error = %e, "input device failed; input disabled");
                self.device = None;
                return;
            }
        };

        let next = if event.is_key_down(KEY_VOLUMEUP) {
            state.threshold.lowered()
        } else if event.is_key_down(KEY_VOLUMEDOWN) {
            state.threshold.raised()
        } else {
            return;
        };
        tracing::debug!(from = state.threshold.get(), to = next.get(), "display threshold changed");
        state.threshold = next;
        state.switch_requested = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/watcher.rs"]
mod tests;
