use crate::foundation::error::{BootError, BootResult};

/// `EV_KEY` event type.
pub const EV_KEY: u16 = 0x01;
/// `KEY_VOLUMEDOWN` key code.
pub const KEY_VOLUMEDOWN: u16 = 114;
/// `KEY_VOLUMEUP` key code.
pub const KEY_VOLUMEUP: u16 = 115;

/// Size of a native `struct input_event`: a `timeval` followed by type, code and value.
pub const EVENT_SIZE: usize = std::mem::size_of::<libc::timeval>() + 8;

/// Key-down value of an `EV_KEY` event (1 = press, 0 = release, 2 = autorepeat).
const KEY_PRESS: i32 = 1;

/// One decoded input event. The timestamp is not needed and is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    /// Event type (`EV_*`).
    pub kind: u16,
    /// Event code (`KEY_*` for key events).
    pub code: u16,
    /// Event value.
    pub value: i32,
}

impl InputEvent {
    /// Key press of `code`.
    pub fn key_down(code: u16) -> Self {
        Self {
            kind: EV_KEY,
            code,
            value: KEY_PRESS,
        }
    }

    /// Key release of `code`.
    pub fn key_up(code: u16) -> Self {
        Self {
            kind: EV_KEY,
            code,
            value: 0,
        }
    }

    /// Whether this is a fresh press (not a release or autorepeat) of `code`.
    pub fn is_key_down(&self, code: u16) -> bool {
        self.kind == EV_KEY && self.code == code && self.value == KEY_PRESS
    }

    /// Decode one native-endian `input_event` record.
    pub fn decode(record: &[u8]) -> BootResult<Self> {
        if record.len() != EVENT_SIZE {
            return Err(BootError::device(format!(
                "input event of {} bytes, expected {EVENT_SIZE}",
                record.len()
            )));
        }
        let tail = &record[EVENT_SIZE - 8..];
        Ok(Self {
            kind: u16::from_ne_bytes([tail[0], tail[1]]),
            code: u16::from_ne_bytes([tail[2], tail[3]]),
            value: i32::from_ne_bytes([tail[4], tail[5], tail[6], tail[7]]),
        })
    }

    /// Encode as a native `input_event` with a zero timestamp.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; EVENT_SIZE - 8];
        out.extend_from_slice(&self.kind.to_ne_bytes());
        out.extend_from_slice(&self.code.to_ne_bytes());
        out.extend_from_slice(&self.value.to_ne_bytes());
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/event.rs"]
mod tests;
