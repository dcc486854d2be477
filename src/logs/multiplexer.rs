use crate::foundation::error::{BootError, BootResult};
use crate::logs::entry::LogEntry;
use crate::logs::filter::{Disposition, DisplayThreshold, LogClassifier};
use crate::logs::source::{LogSource, LogSourceFactory};
use crate::text::line_buffer::LogLineBuffer;

struct Slot {
    source: Box<dyn LogSource>,
    pending: Option<LogEntry>,
    idle: bool,
    failed: bool,
}

/// Merges several log sources into one timestamp-ordered stream.
///
/// Each source holds at most one unread record. A poll cycle refills empty slots, emits the
/// oldest pending record (ties go to the lower source index) and repeats until every live
/// source has reported would-block.
pub struct LogMultiplexer {
    slots: Vec<Slot>,
}

impl LogMultiplexer {
    /// Merge `sources`; their order fixes tie-breaking.
    pub fn new(sources: Vec<Box<dyn LogSource>>) -> Self {
        Self {
            slots: sources
                .into_iter()
                .map(|source| Slot {
                    source,
                    pending: None,
                    idle: false,
                    failed: false,
                })
                .collect(),
        }
    }

    /// Open whatever `factory` can provide.
    pub fn open(factory: &mut dyn LogSourceFactory) -> Self {
        let mux = Self::new(factory.open_sources());
        tracing::debug!(sources = mux.live_sources(), "log multiplexer opened");
        mux
    }

    /// Sources still being read.
    pub fn live_sources(&self) -> usize {
        self.slots.iter().filter(|s| !s.failed).count()
    }

    /// True when no source is left (none opened, or all failed).
    pub fn is_exhausted(&self) -> bool {
        self.live_sources() == 0
    }

    /// Run one poll cycle: classify every record that arrives and apply it to `buffer`.
    ///
    /// Returns whether at least one row was appended or replaced. Fails once no source is left.
    pub fn poll(
        &mut self,
        classifier: &mut LogClassifier,
        buffer: &mut LogLineBuffer,
        threshold: DisplayThreshold,
    ) -> BootResult<bool> {
        let mut changed = false;
        self.cycle(|entry| match classifier.classify(&entry, threshold) {
            Disposition::Append(line) => {
                buffer.append(&line);
                changed = true;
            }
            Disposition::ReplaceLast(line) => {
                buffer.replace_last(&line);
                changed = true;
            }
            Disposition::Drop => {}
        })?;
        Ok(changed)
    }

    /// Run one poll cycle and return the merged records unclassified.
    pub fn drain_ordered(&mut self) -> BootResult<Vec<LogEntry>> {
        let mut out = Vec::new();
        self.cycle(|entry| out.push(entry))?;
        Ok(out)
    }

    fn cycle(&mut self, mut emit: impl FnMut(LogEntry)) -> BootResult<()> {
        if self.is_exhausted() {
            return Err(BootError::device("no log source available"));
        }
        for slot in &mut self.slots {
            slot.idle = false;
        }

        loop {
            self.refill();
            let next = self
                .slots
                .iter()
                .enumerate()
                .filter_map(|(i, s)| s.pending.as_ref().map(|e| (e.timestamp(), i)))
                .min();
            let Some((_, i)) = next else {
                break;
            };
            if let Some(entry) = self.slots[i].pending.take() {
                emit(entry);
            }
        }

        if self.is_exhausted() {
            return Err(BootError::device("all log sources failed"));
        }
        Ok(())
    }

    fn refill(&mut self) {
        for slot in &mut self.slots {
            if slot.failed || slot.idle || slot.pending.is_some() {
                continue;
            }
            match slot.source.read_entry() {
                Ok(Some(entry)) => slot.pending = Some(entry),
                Ok(None) => slot.idle = true,
                Err(e) => {
                    tracing::warn!(source = slot.source.name(), error = %e, "abandoning log source");
                    slot.failed = true;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/logs/multiplexer.rs"]
mod tests;
