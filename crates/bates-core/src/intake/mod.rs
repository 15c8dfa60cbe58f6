pub mod archive;
pub mod natural;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::consts::{BUNDLE_EXTENSION, SUPPORTED_DOCUMENT_EXTENSIONS, SUPPORTED_IMAGE_EXTENSIONS};
use crate::error::{PreviewError, Result};

pub use archive::{ArchiveEntry, ArchiveSource, ZipSource};
pub use natural::natural_cmp;

/// What the rasterizer must do with a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Document,
    Image,
}

impl FileKind {
    /// Classify by extension, case-insensitively. `None` for anything unsupported.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = extension_of(name)?;
        if SUPPORTED_DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Document)
        } else if SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else {
            None
        }
    }
}

/// One preview unit produced by intake.
#[derive(Clone, Debug)]
pub struct InputFile {
    /// Last path segment, used for ordering and display.
    pub name: String,
    /// Path inside the archive (or the chosen file name).
    pub original_path: String,
    pub payload: Arc<[u8]>,
    pub kind: FileKind,
    /// Unknown until the rasterizer reports it. Images always have one page.
    pub page_count: Option<usize>,
}

impl InputFile {
    pub fn new(original_path: &str, bytes: Vec<u8>, kind: FileKind) -> Self {
        let original_path = original_path.replace('\\', "/");
        Self {
            name: base_name(&original_path).to_string(),
            original_path,
            payload: Arc::from(bytes),
            page_count: match kind {
                FileKind::Image => Some(1),
                FileKind::Document => None,
            },
            kind,
        }
    }

    /// Page count to use for numbering. Unknown counts as a single page.
    pub fn effective_page_count(&self) -> usize {
        self.page_count.unwrap_or(1).max(1)
    }
}

/// Intake output, sorted by [`natural_cmp`] on the file name.
pub type OrderedFileList = Vec<InputFile>;

/// A chosen file: its name (or relative path) and raw bytes.
#[derive(Clone, Debug)]
pub struct NamedPayload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedPayload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// What the user chose in one intake action.
#[derive(Clone, Debug)]
pub enum Selection {
    /// Exactly one file: a bundle, a document, or an image.
    Single(NamedPayload),
    /// Several directly chosen files.
    Multiple(Vec<NamedPayload>),
}

impl From<Vec<NamedPayload>> for Selection {
    fn from(mut payloads: Vec<NamedPayload>) -> Self {
        if payloads.len() == 1 {
            Selection::Single(payloads.remove(0))
        } else {
            Selection::Multiple(payloads)
        }
    }
}

/// Normalize a selection into the ordered list of preview units.
pub fn resolve(selection: Selection) -> Result<OrderedFileList> {
    let mut files = match selection {
        Selection::Single(payload) => resolve_single(payload)?,
        Selection::Multiple(payloads) => resolve_multiple(payloads)?,
    };
    files.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    info!(count = files.len(), "Intake resolved");
    Ok(files)
}

fn resolve_single(payload: NamedPayload) -> Result<OrderedFileList> {
    if is_junk_path(&payload.name) {
        return Err(PreviewError::UnsupportedInput(payload.name));
    }
    if is_bundle(&payload.name) {
        let files = expand_bundle(&payload.bytes)?;
        if files.is_empty() {
            return Err(PreviewError::EmptyArchive);
        }
        return Ok(files);
    }
    match FileKind::from_name(&payload.name) {
        Some(kind) => Ok(vec![InputFile::new(&payload.name, payload.bytes, kind)]),
        None => Err(PreviewError::UnsupportedInput(payload.name)),
    }
}

/// Unreadable or empty bundles are skipped. When nothing else survives, the
/// first bundle failure is the error.
fn resolve_multiple(payloads: Vec<NamedPayload>) -> Result<OrderedFileList> {
    let mut files = Vec::new();
    let mut bundle_error = None;
    for payload in payloads {
        if is_junk_path(&payload.name) {
            debug!(name = %payload.name, "Skipping junk file");
            continue;
        }
        if is_bundle(&payload.name) {
            match expand_bundle(&payload.bytes) {
                Ok(expanded) if expanded.is_empty() => {
                    warn!(name = %payload.name, "Skipping archive with no supported documents");
                    bundle_error.get_or_insert(PreviewError::EmptyArchive);
                }
                Ok(expanded) => files.extend(expanded),
                Err(e) => {
                    warn!(name = %payload.name, error = %e, "Skipping unreadable archive");
                    bundle_error.get_or_insert(e);
                }
            }
            continue;
        }
        match FileKind::from_name(&payload.name) {
            Some(kind) => files.push(InputFile::new(&payload.name, payload.bytes, kind)),
            None => warn!(name = %payload.name, "Skipping unsupported file"),
        }
    }
    if files.is_empty() {
        return Err(bundle_error.unwrap_or_else(|| {
            PreviewError::UnsupportedInput("no supported documents in selection".to_string())
        }));
    }
    Ok(files)
}

/// Extract every supported, non-junk member of a zip bundle.
pub fn expand_bundle(bytes: &[u8]) -> Result<OrderedFileList> {
    let mut source = ZipSource::new(bytes)?;
    expand_archive(&mut source)
}

/// Extract every supported, non-junk member of any archive source.
pub fn expand_archive(source: &mut dyn ArchiveSource) -> Result<OrderedFileList> {
    let mut files = Vec::new();
    for entry in source.list_entries()? {
        if entry.is_directory || is_junk_path(&entry.path) {
            continue;
        }
        let Some(kind) = FileKind::from_name(&entry.path) else {
            debug!(path = %entry.path, "Skipping unsupported archive entry");
            continue;
        };
        let bytes = source.read_entry(&entry)?;
        files.push(InputFile::new(&entry.path, bytes, kind));
    }
    Ok(files)
}

/// OS metadata that never belongs in a preview: macOS resource forks,
/// Finder and Explorer droppings, and other dotfiles.
pub fn is_junk_path(path: &str) -> bool {
    let normalized = path.replace('\\', "/");
    if normalized.starts_with("__MACOSX/") || normalized.contains("/__MACOSX/") {
        return true;
    }
    let base = base_name(&normalized);
    if base.starts_with('.') {
        return true;
    }
    let lower = base.to_ascii_lowercase();
    lower == "thumbs.db" || lower == "desktop.ini"
}

fn is_bundle(name: &str) -> bool {
    extension_of(name).as_deref() == Some(BUNDLE_EXTENSION)
}

fn base_name(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(base_name(name))
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
