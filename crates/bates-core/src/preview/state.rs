use crate::frame::RasterFrame;
use crate::intake::InputFile;

/// Lifecycle of the preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loading,
    Ready,
    Error(String),
}

/// What the preview currently shows.
///
/// `current_file_index < files.len()` whenever `files` is non-empty, and
/// `1 <= current_page <= total_pages` once the page count is known.
#[derive(Clone, Debug)]
pub struct PreviewState {
    pub files: Vec<InputFile>,
    pub current_file_index: usize,
    /// One-based.
    pub current_page: usize,
    pub total_pages: Option<usize>,
    /// Base frame of the current page, without the stamp.
    pub rendered_frame: Option<RasterFrame>,
}

impl PreviewState {
    pub fn new(files: Vec<InputFile>) -> Self {
        let total_pages = files.first().and_then(|f| f.page_count);
        Self {
            files,
            current_file_index: 0,
            current_page: 1,
            total_pages,
            rendered_frame: None,
        }
    }

    pub fn current_file(&self) -> Option<&InputFile> {
        self.files.get(self.current_file_index)
    }
}

impl Default for PreviewState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
