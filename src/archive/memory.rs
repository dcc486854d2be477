use std::io::Write;

use anyhow::Context;
use flate2::Compression;
use flate2::write::DeflateEncoder;

use crate::archive::{Archive, ArchiveEntry, CompressionMethod};
use crate::foundation::error::BootResult;

/// Archive assembled in memory, mainly for tests and tooling.
#[derive(Clone, Debug, Default)]
pub struct MemoryArchive {
    arena: Vec<u8>,
    entries: Vec<ArchiveEntry>,
}

impl MemoryArchive {
    /// Empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an uncompressed entry.
    pub fn stored(self, name: impl Into<String>, data: &[u8]) -> Self {
        self.raw(name, CompressionMethod::Stored, data, data.len() as u64)
    }

    /// Add a deflated entry.
    pub fn deflated(self, name: impl Into<String>, data: &[u8]) -> BootResult<Self> {
        let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).context("deflate entry")?;
        let packed = enc.finish().context("finish deflate stream")?;
        Ok(self.raw(name, CompressionMethod::Deflated, &packed, data.len() as u64))
    }

    /// Add an entry whose bytes are already in `method` form.
    pub fn raw(
        mut self,
        name: impl Into<String>,
        method: CompressionMethod,
        data: &[u8],
        uncompressed_len: u64,
    ) -> Self {
        let start = self.arena.len();
        self.arena.extend_from_slice(data);
        self.entries.push(ArchiveEntry {
            name: name.into(),
            method,
            span: start..self.arena.len(),
            uncompressed_len,
        });
        self
    }
}

impl Archive for MemoryArchive {
    fn location(&self) -> &str {
        "<memory>"
    }

    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn arena(&self) -> &[u8] {
        &self.arena
    }
}
