//! Read-only archives: named entries over one immutable byte arena.
//!
//! Entry spans point into the arena, so stored frames are handed out as borrowed slices and are
//! only ever copied when they are decoded.

use std::borrow::Cow;
use std::io::Read;
use std::ops::Range;

use anyhow::Context;

use crate::foundation::error::{BootError, BootResult};

/// In-memory archive built entry by entry.
pub mod memory;
/// Zip reader and writer.
pub mod zip;

pub use memory::MemoryArchive;
pub use zip::ZipArchive;

/// How an entry's bytes are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    /// Raw bytes (zip method 0).
    Stored,
    /// Raw deflate stream (zip method 8).
    Deflated,
    /// Anything else; never readable.
    Other(u16),
}

impl CompressionMethod {
    /// Map a zip method id.
    pub fn from_zip(id: u16) -> Self {
        match id {
            0 => Self::Stored,
            8 => Self::Deflated,
            other => Self::Other(other),
        }
    }

    /// Zip method id.
    pub fn zip_id(self) -> u16 {
        match self {
            Self::Stored => 0,
            Self::Deflated => 8,
            Self::Other(id) => id,
        }
    }
}

/// One named entry and where its (possibly compressed) bytes live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full path inside the archive, `/`-separated.
    pub name: String,
    /// Storage method.
    pub method: CompressionMethod,
    /// Byte range of the stored data inside the archive arena.
    pub span: Range<usize>,
    /// Size after decompression.
    pub uncompressed_len: u64,
}

impl ArchiveEntry {
    /// Whether the bytes can be used without inflating.
    pub fn is_stored(&self) -> bool {
        self.method == CompressionMethod::Stored
    }

    /// Directory part of the name (empty at the root).
    pub fn directory(&self) -> &str {
        self.name.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    /// Leaf name (empty for directory entries).
    pub fn leaf(&self) -> &str {
        self.name.rsplit_once('/').map_or(self.name.as_str(), |(_, leaf)| leaf)
    }
}

/// A read-only archive exposing named entries and raw byte spans.
pub trait Archive: Send {
    /// Where the archive came from, for diagnostics.
    fn location(&self) -> &str;

    /// Entries in archive order.
    fn entries(&self) -> &[ArchiveEntry];

    /// The whole backing arena.
    fn arena(&self) -> &[u8];

    /// Borrow a span of the arena.
    fn bytes(&self, span: Range<usize>) -> BootResult<&[u8]> {
        let len = self.arena().len();
        self.arena().get(span.clone()).ok_or_else(|| {
            BootError::archive(format!(
                "span {}..{} outside {len}-byte archive '{}'",
                span.start,
                span.end,
                self.location()
            ))
        })
    }

    /// Look up an entry by exact name.
    fn find(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries().iter().find(|e| e.name == name)
    }

    /// Contents of `name`: borrowed when stored, inflated when deflated.
    fn read_entry(&self, name: &str) -> BootResult<Cow<'_, [u8]>> {
        let entry = self.find(name).ok_or_else(|| {
            BootError::archive(format!("'{}' has no entry '{name}'", self.location()))
        })?;
        let raw = self.bytes(entry.span.clone())?;
        match entry.method {
            CompressionMethod::Stored => Ok(Cow::Borrowed(raw)),
            CompressionMethod::Deflated => {
                // The header length is untrusted; bound the up-front reservation by the input.
                let hint = usize::try_from(entry.uncompressed_len).unwrap_or(usize::MAX);
                let mut out = Vec::with_capacity(hint.min(raw.len().saturating_mul(4)));
                flate2::read::DeflateDecoder::new(raw)
                    .read_to_end(&mut out)
                    .with_context(|| format!("inflate '{name}'"))?;
                Ok(Cow::Owned(out))
            }
            CompressionMethod::Other(id) => Err(BootError::archive(format!(
                "'{name}' uses unsupported compression method {id}"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/archive/mod.rs"]
mod tests;
