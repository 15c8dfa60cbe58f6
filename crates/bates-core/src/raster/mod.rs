mod content;
pub mod decode;
pub mod pdf;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{PreviewError, Result};
use crate::frame::{PageSize, RasterFrame};
use crate::intake::{FileKind, InputFile};
use crate::progress::{ProgressReporter, Stage};

pub use decode::decode_image;
pub use pdf::LopdfBackend;

/// Document rasterization capability.
pub trait RasterBackend: Send + Sync {
    fn open_document(&self, bytes: &[u8]) -> Result<Box<dyn DocumentHandle>>;
}

/// An opened document. Owned by whoever opened it, never shared.
pub trait DocumentHandle: Send {
    fn page_count(&self) -> usize;

    /// Render the page at zero-based `index` with the given oversampling scale.
    fn render_page(&mut self, index: usize, scale: f32) -> Result<RasterFrame>;

    fn page_size(&self, _index: usize) -> Option<PageSize> {
        None
    }
}

/// A payload that is ready to produce frames.
pub enum OpenedFile {
    Document(Box<dyn DocumentHandle>),
    Image(RasterFrame),
}

impl OpenedFile {
    pub fn page_count(&self) -> usize {
        match self {
            Self::Document(doc) => doc.page_count(),
            Self::Image(_) => 1,
        }
    }

    /// Render a one-based page.
    pub fn render(&mut self, page: usize, scale: f32) -> Result<RasterFrame> {
        let total = self.page_count();
        if page == 0 || page > total {
            return Err(PreviewError::RenderFailure {
                page,
                message: format!("page out of range 1..={total}"),
            });
        }
        match self {
            Self::Document(doc) => doc.render_page(page - 1, scale).map_err(|e| match e {
                PreviewError::RenderFailure { .. } => e,
                other => PreviewError::RenderFailure {
                    page,
                    message: other.to_string(),
                },
            }),
            Self::Image(frame) => Ok(frame.clone()),
        }
    }
}

impl std::fmt::Debug for OpenedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document(doc) => write!(f, "Document({} pages)", doc.page_count()),
            Self::Image(frame) => write!(f, "Image({}x{})", frame.width(), frame.height()),
        }
    }
}

/// Open one input file. Images are decoded eagerly.
pub fn open(file: &InputFile, backend: &dyn RasterBackend) -> Result<OpenedFile> {
    debug!(name = %file.name, kind = ?file.kind, "Opening file");
    match file.kind {
        FileKind::Document => Ok(OpenedFile::Document(backend.open_document(&file.payload)?)),
        FileKind::Image => Ok(OpenedFile::Image(decode_image(&file.payload)?)),
    }
}

/// Page count of every file, discovered in parallel.
///
/// Images report one page without being decoded.
pub fn discover_page_counts(
    files: &[InputFile],
    backend: &dyn RasterBackend,
    reporter: &dyn ProgressReporter,
) -> Vec<Result<usize>> {
    reporter.begin_stage(Stage::PageCounts, Some(files.len()));
    let counts: Vec<Result<usize>> = files
        .par_iter()
        .map(|file| {
            let count = match file.kind {
                FileKind::Image => Ok(1),
                FileKind::Document => backend
                    .open_document(&file.payload)
                    .map(|doc| doc.page_count()),
            };
            if let Err(ref e) = count {
                warn!(name = %file.name, error = %e, "Page count unavailable");
            }
            reporter.advance(1);
            count
        })
        .collect();
    reporter.finish_stage();
    counts
}
