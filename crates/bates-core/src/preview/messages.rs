use crate::error::PreviewError;
use crate::frame::RasterFrame;
use crate::intake::InputFile;

/// Commands sent from the controller to the worker thread.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Render one page of one file, opening the file first if needed.
    RenderPage {
        generation: u64,
        token: u64,
        file_index: usize,
        file: InputFile,
        page: usize,
    },

    /// Count the pages of every listed file in the background.
    DiscoverPageCounts {
        generation: u64,
        files: Vec<(usize, InputFile)>,
    },
}

/// Results sent from the worker thread back to the controller.
///
/// Every result carries the intake `generation` it was computed for;
/// page results also carry the selection `token` that requested them.
#[derive(Debug)]
pub enum WorkerResult {
    PageRendered {
        generation: u64,
        token: u64,
        file_index: usize,
        page: usize,
        page_count: usize,
        frame: RasterFrame,
    },
    RenderFailed {
        generation: u64,
        token: u64,
        file_index: usize,
        page: usize,
        error: PreviewError,
    },
    PageCount {
        generation: u64,
        file_index: usize,
        count: usize,
    },
    DiscoveryFailed {
        generation: u64,
        file_index: usize,
        error: PreviewError,
    },
}

impl WorkerResult {
    pub fn generation(&self) -> u64 {
        match self {
            Self::PageRendered { generation, .. }
            | Self::RenderFailed { generation, .. }
            | Self::PageCount { generation, .. }
            | Self::DiscoveryFailed { generation, .. } => *generation,
        }
    }
}
