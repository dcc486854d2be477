use std::collections::VecDeque;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{BootError, BootResult};
use crate::input::event::{EVENT_SIZE, InputEvent};

/// A non-blocking source of input events.
pub trait InputDevice: Send {
    /// Human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Read one event; `Ok(None)` when nothing is queued.
    fn read_event(&mut self) -> BootResult<Option<InputEvent>>;
}

/// An evdev node opened `O_NONBLOCK`.
pub struct EvdevDevice {
    name: String,
    file: File,
    buf: [u8; EVENT_SIZE],
}

impl EvdevDevice {
    /// Open `path` read-only and non-blocking.
    pub fn open(path: &Path) -> BootResult<Self> {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|e| BootError::device(format!("open input device '{}': {e}", path.display())))?;
        Ok(Self {
            name: path.display().to_string(),
            file,
            buf: [0; EVENT_SIZE],
        })
    }
}

impl InputDevice for EvdevDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_event(&mut self) -> BootResult<Option<InputEvent>> {
        match self.file.read(&mut self.buf) {
            Ok(0) => Err(BootError::device(format!("input device '{}' closed", self.name))),
            Ok(n) => InputEvent::decode(&self.buf[..n]).map(Some),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(BootError::device(format!(
                "read input device '{}': {e}",
                self.name
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Event(InputEvent),
    Idle,
    Fail,
}

/// Input device replaying a fixed script; idle once the script is exhausted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInputDevice {
    script: VecDeque<Step>,
}

impl ScriptedInputDevice {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event.
    pub fn event(mut self, ev: InputEvent) -> Self {
        self.script.push_back(Step::Event(ev));
        self
    }

    /// Queue a press of `code`.
    pub fn key_down(self, code: u16) -> Self {
        self.event(InputEvent::key_down(code))
    }

    /// Queue `n` polls with nothing to read.
    pub fn idle(mut self, n: usize) -> Self {
        self.script.extend(std::iter::repeat_n(Step::Idle, n));
        self
    }

    /// Queue a read failure.
    pub fn fail(mut self) -> Self {
        self.script.push_back(Step::Fail);
        self
    }
}

impl InputDevice for ScriptedInputDevice {
    fn name(&self) -> &str {
        "scripted"
    }

    fn read_event(&mut self) -> BootResult<Option<InputEvent>> {
        match self.script.pop_front() {
            Some(Step::Event(ev)) => Ok(Some(ev)),
            Some(Step::Idle) | None => Ok(None),
            Some(Step::Fail) => Err(BootError::device("scripted input failure")),
        }
    }
}

/// Key capability bitmask of one device.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyBitmask {
    words: Vec<u64>,
    word_bits: u32,
}

impl KeyBitmask {
    /// Parse the sysfs `capabilities/key` format: space-separated hex words, most significant
    /// word first, each `word_bits` wide (the kernel's `unsigned long`).
    pub fn parse(text: &str, word_bits: u32) -> BootResult<Self> {
        if !matches!(word_bits, 32 | 64) {
            return Err(BootError::validation(format!(
                "unsupported capability word size {word_bits}"
            )));
        }
        let mut words = text
            .split_whitespace()
            .map(|w| {
                u64::from_str_radix(w, 16)
                    .map_err(|e| BootError::device(format!("bad capability word '{w}': {e}")))
            })
            .collect::<BootResult<Vec<_>>>()?;
        words.reverse();
        Ok(Self { words, word_bits })
    }

    /// Whether key `code` is advertised.
    pub fn has(&self, code: u16) -> bool {
        if self.word_bits == 0 {
            return false;
        }
        let code = u32::from(code);
        let word = (code / self.word_bits) as usize;
        let bit = code % self.word_bits;
        self.words.get(word).is_some_and(|w| w & (1u64 << bit) != 0)
    }
}

/// Reports which keys a device node supports.
pub trait CapabilityProbe {
    /// Key bitmask of the device at `node`.
    fn key_bits(&self, node: &Path) -> BootResult<KeyBitmask>;
}

/// Reads capabilities from `<root>/<node name>/device/capabilities/key`.
#[derive(Clone, Debug)]
pub struct SysfsProbe {
    root: PathBuf,
}

impl SysfsProbe {
    /// Probe rooted at `root`, normally `/sys/class/input`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CapabilityProbe for SysfsProbe {
    fn key_bits(&self, node: &Path) -> BootResult<KeyBitmask> {
        let leaf = node
            .file_name()
            .ok_or_else(|| BootError::device(format!("'{}' has no file name", node.display())))?;
        let path = self
            .root
            .join(leaf)
            .join("device")
            .join("capabilities")
            .join("key");
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read key capabilities '{}'", path.display()))?;
        KeyBitmask::parse(&text, (std::mem::size_of::<libc::c_ulong>() * 8) as u32)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/device.rs"]
mod tests;
