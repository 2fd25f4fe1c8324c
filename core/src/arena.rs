//! Append-only builder and read-only memory-mapped view for the binary
//! artifacts this crate emits (compiled tables, prisms).
//!
//! Layout: a fixed header (magic, format version, section count) followed
//! by a table of `(offset, len)` pairs, one per named section, followed by
//! the section bytes themselves. Sections are opaque to the arena; callers
//! decode their own contents (arrays of fixed-size records, length-prefixed
//! string blobs) out of the returned slices.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{Result, RimeError};

const MAGIC: &[u8; 4] = b"RMC1";

/// Accumulates named byte sections in memory and writes them out atomically.
pub struct Builder {
    format_version: u32,
    sections: Vec<(String, Vec<u8>)>,
}

impl Builder {
    pub fn new(format_version: u32) -> Self {
        Self {
            format_version,
            sections: Vec::new(),
        }
    }

    /// Appends a named section. Sections are written in the order added;
    /// callers look them up by index on the mapped side, so the build step
    /// and the reader must agree on ordering (each builder in this crate
    /// documents its own section order).
    pub fn add_section(&mut self, name: &str, bytes: Vec<u8>) -> usize {
        self.sections.push((name.to_string(), bytes));
        self.sections.len() - 1
    }

    /// Serializes the header and all sections, then writes them to a
    /// temporary file beside `path` and renames it into place. A build
    /// failure midway never clobbers a previously-installed artifact.
    pub fn finish(self, path: &Path) -> Result<()> {
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.format_version.to_le_bytes());
        out.extend_from_slice(&(self.sections.len() as u32).to_le_bytes());

        let header_len = 4 + 4 + 4 + self.sections.len() * 16;
        let mut offset = header_len as u64;
        let mut toc = Vec::with_capacity(self.sections.len() * 16);
        for (_, bytes) in &self.sections {
            toc.extend_from_slice(&offset.to_le_bytes());
            toc.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
            offset += bytes.len() as u64;
        }
        out.extend_from_slice(&toc);
        for (_, bytes) in &self.sections {
            out.extend_from_slice(bytes);
        }

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, &out)?;
        std::fs::rename(&tmp_path, path)?;
        tracing::info!(path = %path.display(), sections = self.sections.len(), bytes = out.len(), "wrote arena");
        Ok(())
    }
}

/// A read-only, memory-mapped view of an artifact written by [`Builder`].
pub struct Mapped {
    mmap: Mmap,
    sections: Vec<(u64, u64)>,
    format_version: u32,
}

impl Mapped {
    /// Opens `path`, validates the header, and requires
    /// `format_version >= min_version`.
    pub fn open(path: &Path, min_version: u32) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "arena path does not exist");
            return Err(RimeError::NoRepository {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        // SAFETY: the mapped file is treated as immutable for the lifetime
        // of `Mapped`; callers never write to `path` while a `Mapped` for it
        // is alive (builds go through `Builder::finish`'s rename-into-place,
        // never in-place mutation).
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < 12 || &mmap[0..4] != MAGIC {
            tracing::error!(path = %path.display(), "arena has a bad magic number");
            return Err(RimeError::Broken {
                path: path.to_path_buf(),
                reason: "bad magic".into(),
            });
        }
        let format_version = u32::from_le_bytes(mmap[4..8].try_into().unwrap());
        if format_version < min_version {
            tracing::error!(path = %path.display(), format_version, min_version, "arena format too old");
            return Err(RimeError::Broken {
                path: path.to_path_buf(),
                reason: format!(
                    "format version {format_version} older than required {min_version}"
                ),
            });
        }
        let section_count = u32::from_le_bytes(mmap[8..12].try_into().unwrap()) as usize;
        let toc_start = 12;
        let toc_len = section_count * 16;
        if mmap.len() < toc_start + toc_len {
            return Err(RimeError::Broken {
                path: path.to_path_buf(),
                reason: "truncated table of contents".into(),
            });
        }
        let mut sections = Vec::with_capacity(section_count);
        for i in 0..section_count {
            let base = toc_start + i * 16;
            let off = u64::from_le_bytes(mmap[base..base + 8].try_into().unwrap());
            let len = u64::from_le_bytes(mmap[base + 8..base + 16].try_into().unwrap());
            sections.push((off, len));
        }
        tracing::info!(path = %path.display(), format_version, sections = sections.len(), "opened arena");
        Ok(Self {
            mmap,
            sections,
            format_version,
        })
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn section(&self, index: usize) -> Result<&[u8]> {
        let (off, len) = *self.sections.get(index).ok_or_else(|| {
            RimeError::Broken {
                path: std::path::PathBuf::new(),
                reason: format!("no such section {index}"),
            }
        })?;
        let off = off as usize;
        let len = len as usize;
        self.mmap.get(off..off + len).ok_or_else(|| RimeError::Broken {
            path: std::path::PathBuf::new(),
            reason: format!("section {index} out of bounds"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_sections() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("rime-arena-test-{}.bin", std::process::id()));

        let mut builder = Builder::new(1);
        builder.add_section("a", vec![1, 2, 3, 4]);
        builder.add_section("b", vec![9, 9]);
        builder.finish(&path).unwrap();

        let mapped = Mapped::open(&path, 1).unwrap();
        assert_eq!(mapped.format_version(), 1);
        assert_eq!(mapped.section(0).unwrap(), &[1, 2, 3, 4]);
        assert_eq!(mapped.section(1).unwrap(), &[9, 9]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rejects_artifact_below_min_version() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("rime-arena-test-ver-{}.bin", std::process::id()));
        Builder::new(1).finish(&path).unwrap();
        assert!(Mapped::open(&path, 2).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_no_repository() {
        let path = std::env::temp_dir().join("rime-arena-does-not-exist.bin");
        match Mapped::open(&path, 1) {
            Err(RimeError::NoRepository { .. }) => {}
            other => panic!("expected NoRepository, got {other:?}"),
        }
    }
}
