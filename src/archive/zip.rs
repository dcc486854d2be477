use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use flate2::Compression;
use flate2::write::DeflateEncoder;

use crate::archive::{Archive, ArchiveEntry, CompressionMethod};
use crate::foundation::error::{BootError, BootResult};

const LOCAL_SIG: u32 = 0x0403_4b50;
const CENTRAL_SIG: u32 = 0x0201_4b50;
const EOCD_SIG: u32 = 0x0605_4b50;
const LOCAL_LEN: usize = 30;
const CENTRAL_LEN: usize = 46;
const EOCD_LEN: usize = 22;
const MAX_COMMENT: usize = u16::MAX as usize;
// 1980-01-01, the zip epoch.
const DOS_DATE: u16 = 0x0021;

/// Zip archive held entirely in memory.
///
/// Only the central directory is trusted for sizes; ZIP64 archives are rejected.
#[derive(Clone, Debug)]
pub struct ZipArchive {
    location: String,
    data: Vec<u8>,
    entries: Vec<ArchiveEntry>,
}

struct Reader<'a> {
    data: &'a [u8],
    what: &'a str,
}

impl Reader<'_> {
    fn slice(&self, at: usize, len: usize) -> BootResult<&[u8]> {
        at.checked_add(len)
            .and_then(|end| self.data.get(at..end))
            .ok_or_else(|| {
                BootError::archive(format!(
                    "{}: {len} bytes at offset {at} run past the end",
                    self.what
                ))
            })
    }

    fn u16(&self, at: usize) -> BootResult<u16> {
        let b = self.slice(at, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&self, at: usize) -> BootResult<u32> {
        let b = self.slice(at, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

impl ZipArchive {
    /// Parse an archive already in memory.
    pub fn from_bytes(location: impl Into<String>, data: Vec<u8>) -> BootResult<Self> {
        let location = location.into();
        let entries = parse_entries(&data, &location)?;
        tracing::debug!(archive = %location, entries = entries.len(), "zip archive parsed");
        Ok(Self {
            location,
            data,
            entries,
        })
    }

    /// Read and parse the archive at `path`.
    pub fn open(path: &Path) -> BootResult<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("read archive '{}'", path.display()))?;
        Self::from_bytes(path.display().to_string(), data)
    }

    /// Open the first of `paths` that exists and parses.
    ///
    /// Returns `None` when no candidate is usable.
    pub fn open_first(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::open(path) {
                Ok(archive) => {
                    tracing::info!(archive = %path.display(), "using boot animation archive");
                    return Some(archive);
                }
                Err(e) => tracing::warn!(archive = %path.display(), error = %e, "unusable archive"),
            }
        }
        tracing::info!("no boot animation archive found");
        None
    }
}

impl Archive for ZipArchive {
    fn location(&self) -> &str {
        &self.location
    }

    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn arena(&self) -> &[u8] {
        &self.data
    }
}

fn find_eocd(data: &[u8]) -> Option<usize> {
    let last = data.len().checked_sub(EOCD_LEN)?;
    let first = last.saturating_sub(MAX_COMMENT);
    (first..=last)
        .rev()
        .find(|&at| data[at..at + 4] == EOCD_SIG.to_le_bytes())
}

fn parse_entries(data: &[u8], location: &str) -> BootResult<Vec<ArchiveEntry>> {
    let r = Reader {
        data,
        what: location,
    };
    let eocd = find_eocd(data).ok_or_else(|| {
        BootError::archive(format!("{location}: no end of central directory record"))
    })?;

    let count = usize::from(r.u16(eocd + 10)?);
    let cd_size = r.u32(eocd + 12)?;
    let cd_offset = r.u32(eocd + 16)?;
    if count == usize::from(u16::MAX) || cd_size == u32::MAX || cd_offset == u32::MAX {
        return Err(BootError::archive(format!("{location}: ZIP64 archives are not supported")));
    }

    let mut entries = Vec::with_capacity(count);
    let mut at = cd_offset as usize;
    for _ in 0..count {
        if r.u32(at)? != CENTRAL_SIG {
            return Err(BootError::archive(format!(
                "{location}: bad central directory signature at {at}"
            )));
        }
        let method = CompressionMethod::from_zip(r.u16(at + 10)?);
        let compressed = r.u32(at + 20)? as usize;
        let uncompressed = u64::from(r.u32(at + 24)?);
        let name_len = usize::from(r.u16(at + 28)?);
        let extra_len = usize::from(r.u16(at + 30)?);
        let comment_len = usize::from(r.u16(at + 32)?);
        let local = r.u32(at + 42)? as usize;
        let name = String::from_utf8_lossy(r.slice(at + CENTRAL_LEN, name_len)?).into_owned();

        if r.u32(local)? != LOCAL_SIG {
            return Err(BootError::archive(format!(
                "{location}: bad local header for '{name}'"
            )));
        }
        let start = local
            + LOCAL_LEN
            + usize::from(r.u16(local + 26)?)
            + usize::from(r.u16(local + 28)?);
        r.slice(start, compressed)?;

        entries.push(ArchiveEntry {
            name,
            method,
            span: start..start + compressed,
            uncompressed_len: uncompressed,
        });
        at += CENTRAL_LEN + name_len + extra_len + comment_len;
    }
    Ok(entries)
}

/// Build a zip archive. `Deflated` entries are compressed here; other methods are rejected.
pub fn write_zip<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a [u8], CompressionMethod)>,
) -> BootResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut central = Vec::new();
    let mut count: u16 = 0;

    for (name, data, method) in entries {
        let packed = match method {
            CompressionMethod::Stored => data.to_vec(),
            CompressionMethod::Deflated => {
                let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
                enc.write_all(data).context("deflate zip entry")?;
                enc.finish().context("finish deflate stream")?
            }
            CompressionMethod::Other(id) => {
                return Err(BootError::validation(format!(
                    "cannot write '{name}' with compression method {id}"
                )));
            }
        };
        let mut crc = flate2::Crc::new();
        crc.update(data);

        let name_len = u16::try_from(name.len())
            .map_err(|_| BootError::validation(format!("entry name too long: '{name}'")))?;
        let sizes = (
            u32::try_from(packed.len()),
            u32::try_from(data.len()),
            u32::try_from(out.len()),
        );
        let (Ok(csize), Ok(usize_), Ok(offset)) = sizes else {
            return Err(BootError::validation("archive exceeds 4 GiB"));
        };
        count = count
            .checked_add(1)
            .ok_or_else(|| BootError::validation("too many zip entries"))?;

        let common = |buf: &mut Vec<u8>| {
            buf.extend_from_slice(&20u16.to_le_bytes());
            buf.extend_from_slice(&0u16.to_le_bytes());
            buf.extend_from_slice(&method.zip_id().to_le_bytes());
            buf.extend_from_slice(&0u16.to_le_bytes());
            buf.extend_from_slice(&DOS_DATE.to_le_bytes());
            buf.extend_from_slice(&crc.sum().to_le_bytes());
            buf.extend_from_slice(&csize.to_le_bytes());
            buf.extend_from_slice(&usize_.to_le_bytes());
            buf.extend_from_slice(&name_len.to_le_bytes());
            buf.extend_from_slice(&0u16.to_le_bytes());
        };

        out.extend_from_slice(&LOCAL_SIG.to_le_bytes());
        common(&mut out);
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&packed);

        central.extend_from_slice(&CENTRAL_SIG.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        common(&mut central);
        // comment length, disk number, internal and external attributes
        central.extend_from_slice(&[0u8; 10]);
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name.as_bytes());
    }

    let cd_offset = u32::try_from(out.len())
        .map_err(|_| BootError::validation("archive exceeds 4 GiB"))?;
    let cd_size = central.len() as u32;
    out.extend_from_slice(&central);
    out.extend_from_slice(&EOCD_SIG.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    Ok(out)
}

/// Build a zip archive with every entry stored.
pub fn write_stored_zip<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a [u8])>,
) -> BootResult<Vec<u8>> {
    write_zip(
        entries
            .into_iter()
            .map(|(name, data)| (name, data, CompressionMethod::Stored)),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/archive/zip.rs"]
mod tests;
