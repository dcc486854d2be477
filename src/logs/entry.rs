use crate::foundation::error::{BootError, BootResult};

/// Header size of a version 1 `logger_entry`, the only layout without a `hdr_size` field.
pub const V1_HEADER_LEN: usize = 20;
/// Largest record the kernel logger hands out in one read.
pub const MAX_RECORD_LEN: usize = 5 * 1024;

/// Android log priorities, ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogPriority {
    /// Not a known priority.
    Unknown = 0,
    /// Writer's default priority.
    Default = 1,
    /// Verbose.
    Verbose = 2,
    /// Debug.
    Debug = 3,
    /// Informational.
    Info = 4,
    /// Warning.
    Warn = 5,
    /// Error.
    Error = 6,
    /// Fatal.
    Fatal = 7,
    /// Suppress everything.
    Silent = 8,
}

impl LogPriority {
    /// Map a raw priority byte; out-of-range values become [`LogPriority::Unknown`].
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Default,
            2 => Self::Verbose,
            3 => Self::Debug,
            4 => Self::Info,
            5 => Self::Warn,
            6 => Self::Error,
            7 => Self::Fatal,
            8 => Self::Silent,
            _ => Self::Unknown,
        }
    }

    /// Numeric level, comparable with a display threshold.
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// One decoded log record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Index of the source that produced the record.
    pub source_id: usize,
    /// Seconds part of the record timestamp.
    pub sec: u32,
    /// Nanoseconds part of the record timestamp.
    pub nsec: u32,
    /// Record priority.
    pub priority: LogPriority,
    /// Log tag.
    pub tag: String,
    /// Message text without trailing newlines.
    pub message: String,
}

impl LogEntry {
    /// Build an entry, mostly useful for in-memory sources.
    pub fn new(
        source_id: usize,
        sec: u32,
        nsec: u32,
        priority: LogPriority,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_id,
            sec,
            nsec,
            priority,
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Sort key used by the multiplexer.
    pub fn timestamp(&self) -> (u32, u32) {
        (self.sec, self.nsec)
    }

    /// Overlay text: `"{tag}: {message}"`.
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.tag, self.message)
    }

    /// Decode one little-endian `logger_entry` record.
    ///
    /// Layout: `len u16, hdr_size u16, pid i32, tid i32, sec i32, nsec i32`, then for v2+
    /// headers the rest of `hdr_size`, then `len` payload bytes holding a priority byte, a
    /// NUL-terminated tag and a (normally NUL-terminated) message.
    pub fn decode(record: &[u8], source_id: usize) -> BootResult<Self> {
        if record.len() < V1_HEADER_LEN {
            return Err(BootError::device(format!(
                "log record of {} bytes is shorter than its header",
                record.len()
            )));
        }
        let u16_at = |i: usize| u16::from_le_bytes([record[i], record[i + 1]]);
        let u32_at =
            |i: usize| u32::from_le_bytes([record[i], record[i + 1], record[i + 2], record[i + 3]]);

        let payload_len = usize::from(u16_at(0));
        let header_len = match usize::from(u16_at(2)) {
            0 => V1_HEADER_LEN,
            n if n < V1_HEADER_LEN => {
                return Err(BootError::device(format!("log record header size {n} is too small")));
            }
            n => n,
        };
        let payload = record
            .get(header_len..header_len + payload_len)
            .ok_or_else(|| {
                BootError::device(format!(
                    "log record truncated: header {header_len} + payload {payload_len} > {}",
                    record.len()
                ))
            })?;

        let (&prio, rest) = payload
            .split_first()
            .ok_or_else(|| BootError::device("log record has an empty payload"))?;
        let tag_end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| BootError::device("log record tag is not terminated"))?;
        let tag = &rest[..tag_end];
        let msg = &rest[tag_end + 1..];
        let msg = match msg.iter().position(|&b| b == 0) {
            Some(end) => &msg[..end],
            None => msg,
        };

        Ok(Self {
            source_id,
            sec: u32_at(12),
            nsec: u32_at(16),
            priority: LogPriority::from_raw(prio),
            tag: String::from_utf8_lossy(tag).into_owned(),
            message: String::from_utf8_lossy(msg)
                .trim_end_matches(['\n', '\r'])
                .to_owned(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/logs/entry.rs"]
mod tests;
