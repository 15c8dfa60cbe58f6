use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::bates::AllocationEntry;
use crate::error::Result;
use crate::intake::{self, OrderedFileList};

/// One file of a stamped bundle with the labels it received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StampedRow {
    pub original_path: String,
    pub filename: String,
    pub first_label: String,
    pub last_label: String,
    pub range_text: String,
}

impl From<&AllocationEntry> for StampedRow {
    fn from(entry: &AllocationEntry) -> Self {
        Self {
            original_path: entry.file.original_path.clone(),
            filename: entry.file.name.clone(),
            first_label: entry.first_label.clone(),
            last_label: entry.last_label.clone(),
            range_text: entry.range_text.clone(),
        }
    }
}

/// The bundle returned by the most recent successful stamping call.
#[derive(Clone, Debug)]
pub struct LastStampedArtifact {
    pub archive_payload: Arc<[u8]>,
    pub filename: String,
    pub entries: Vec<StampedRow>,
    /// Last number the service reported using, if it did.
    pub last_number: Option<u64>,
}

impl LastStampedArtifact {
    pub fn new(
        archive_payload: Vec<u8>,
        filename: impl Into<String>,
        entries: Vec<StampedRow>,
        last_number: Option<u64>,
    ) -> Self {
        Self {
            archive_payload: Arc::from(archive_payload),
            filename: filename.into(),
            entries,
            last_number,
        }
    }

    /// Record a stamping result whose rows match a preview allocation.
    pub fn from_allocation(
        archive_payload: Vec<u8>,
        filename: impl Into<String>,
        allocation: &[AllocationEntry],
        last_number: Option<u64>,
    ) -> Self {
        let entries = allocation.iter().map(StampedRow::from).collect();
        Self::new(archive_payload, filename, entries, last_number)
    }

    /// Re-open the stamped bundle as preview input.
    pub fn to_files(&self) -> Result<OrderedFileList> {
        let mut files = intake::expand_bundle(&self.archive_payload)?;
        files.sort_by(|a, b| intake::natural_cmp(&a.name, &b.name));
        Ok(files)
    }
}

/// Session-scoped state that outlives any single preview.
#[derive(Debug, Default)]
pub struct Session {
    last_stamped: Option<LastStampedArtifact>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the previous artifact; results are never merged.
    pub fn record_stamping(&mut self, artifact: LastStampedArtifact) {
        info!(
            filename = %artifact.filename,
            files = artifact.entries.len(),
            "Recorded stamping result"
        );
        self.last_stamped = Some(artifact);
    }

    pub fn last_stamped(&self) -> Option<&LastStampedArtifact> {
        self.last_stamped.as_ref()
    }

    pub fn clear(&mut self) {
        self.last_stamped = None;
    }
}
