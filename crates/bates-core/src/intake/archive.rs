use std::io::{Cursor, Read};

use crate::consts::{MAX_ARCHIVE_ENTRY_BYTES, MAX_ENTRY_PREALLOC_BYTES};
use crate::error::{PreviewError, Result};

/// One member of an archive, as listed by an [`ArchiveSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub index: usize,
    /// Full path inside the archive, `/`-separated.
    pub path: String,
    pub is_directory: bool,
}

/// Archive-reading capability consumed by intake.
pub trait ArchiveSource {
    fn list_entries(&mut self) -> Result<Vec<ArchiveEntry>>;
    fn read_entry(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>>;
}

/// Zip archive held in memory.
pub struct ZipSource<'a> {
    archive: zip::ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> ZipSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self { archive })
    }
}

impl ArchiveSource for ZipSource<'_> {
    fn list_entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let file = self.archive.by_index_raw(index)?;
            entries.push(ArchiveEntry {
                index,
                path: file.name().replace('\\', "/"),
                is_directory: file.is_dir(),
            });
        }
        Ok(entries)
    }

    fn read_entry(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        let file = self.archive.by_index(entry.index)?;
        let declared = file.size();
        if declared > MAX_ARCHIVE_ENTRY_BYTES {
            return Err(PreviewError::DecodeFailure(format!(
                "archive: {} declares {declared} bytes",
                entry.path
            )));
        }

        // The declared size is untrusted; it only sizes the first allocation.
        let mut bytes = Vec::with_capacity(declared.min(MAX_ENTRY_PREALLOC_BYTES) as usize);
        file.take(MAX_ARCHIVE_ENTRY_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| PreviewError::DecodeFailure(format!("archive: {}: {e}", entry.path)))?;
        if bytes.len() as u64 != declared {
            return Err(PreviewError::DecodeFailure(format!(
                "archive: {} declares {declared} bytes but holds {}",
                entry.path,
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}
