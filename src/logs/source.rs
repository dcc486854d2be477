use std::collections::VecDeque;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::foundation::error::{BootError, BootResult};
use crate::logs::entry::{LogEntry, MAX_RECORD_LEN};

/// A non-blocking stream of log records.
pub trait LogSource: Send {
    /// Human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Read the next record.
    ///
    /// `Ok(None)` means no data right now (would-block). `Err` means the source is unusable.
    fn read_entry(&mut self) -> BootResult<Option<LogEntry>>;
}

/// Kernel logger device opened `O_NONBLOCK`; each `read` returns exactly one record.
pub struct DeviceLogSource {
    name: String,
    source_id: usize,
    file: File,
    buf: Vec<u8>,
}

impl DeviceLogSource {
    /// Open the device at `path` as source `source_id`.
    pub fn open(path: &Path, source_id: usize) -> BootResult<Self> {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|e| BootError::device(format!("open log device '{}': {e}", path.display())))?;
        Ok(Self {
            name: path.display().to_string(),
            source_id,
            file,
            buf: vec![0; MAX_RECORD_LEN + 1],
        })
    }
}

impl LogSource for DeviceLogSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_entry(&mut self) -> BootResult<Option<LogEntry>> {
        match self.file.read(&mut self.buf[..MAX_RECORD_LEN]) {
            Ok(0) => Err(BootError::device(format!(
                "unexpected EOF on log device '{}'",
                self.name
            ))),
            Ok(n) => match LogEntry::decode(&self.buf[..n], self.source_id) {
                Ok(entry) => Ok(Some(entry)),
                Err(e) => {
                    tracing::debug!(source = %self.name, error = %e, "skipping malformed log record");
                    Ok(None)
                }
            },
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(BootError::device(format!(
                "read log device '{}': {e}",
                self.name
            ))),
        }
    }
}

#[derive(Clone, Debug)]
enum Step {
    Entry(LogEntry),
    WouldBlock,
    Fail,
}

/// Scripted in-memory source. Once the script runs out it keeps reporting would-block.
#[derive(Clone, Debug)]
pub struct MemoryLogSource {
    name: String,
    script: VecDeque<Step>,
}

impl MemoryLogSource {
    /// Empty source named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: VecDeque::new(),
        }
    }

    /// Source that yields `entries` in order.
    pub fn with_entries(name: impl Into<String>, entries: impl IntoIterator<Item = LogEntry>) -> Self {
        entries.into_iter().fold(Self::new(name), Self::entry)
    }

    /// Queue a record.
    pub fn entry(mut self, entry: LogEntry) -> Self {
        self.script.push_back(Step::Entry(entry));
        self
    }

    /// Queue one would-block result.
    pub fn would_block(mut self) -> Self {
        self.script.push_back(Step::WouldBlock);
        self
    }

    /// Queue a device failure.
    pub fn fail(mut self) -> Self {
        self.script.push_back(Step::Fail);
        self
    }
}

impl LogSource for MemoryLogSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_entry(&mut self) -> BootResult<Option<LogEntry>> {
        match self.script.pop_front() {
            Some(Step::Entry(e)) => Ok(Some(e)),
            Some(Step::WouldBlock) | None => Ok(None),
            Some(Step::Fail) => Err(BootError::device(format!("{}: scripted failure", self.name))),
        }
    }
}

/// Opens the log sources each time text mode is entered.
pub trait LogSourceFactory: Send {
    /// Open every source that can be opened. Sources that fail to open are left out.
    fn open_sources(&mut self) -> Vec<Box<dyn LogSource>>;
}

impl<F> LogSourceFactory for F
where
    F: FnMut() -> Vec<Box<dyn LogSource>> + Send,
{
    fn open_sources(&mut self) -> Vec<Box<dyn LogSource>> {
        self()
    }
}

/// Factory over a list of kernel logger device paths.
#[derive(Clone, Debug)]
pub struct DeviceLogFactory {
    paths: Vec<PathBuf>,
}

impl DeviceLogFactory {
    /// Use `paths`; the position of a path becomes its source id.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl LogSourceFactory for DeviceLogFactory {
    fn open_sources(&mut self) -> Vec<Box<dyn LogSource>> {
        let mut out: Vec<Box<dyn LogSource>> = Vec::with_capacity(self.paths.len());
        for (id, path) in self.paths.iter().enumerate() {
            match DeviceLogSource::open(path, id) {
                Ok(src) => out.push(Box::new(src)),
                Err(e) => tracing::warn!(error = %e, "log source unavailable"),
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/logs/source.rs"]
mod tests;
