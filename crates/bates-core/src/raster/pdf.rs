use lopdf::{Document as LoDocument, Object as LoObject, ObjectId};
use tracing::debug;

use crate::consts::{MAX_FRAME_DIMENSION_PX, REFERENCE_PAGE_HEIGHT_PT, REFERENCE_PAGE_WIDTH_PT};
use crate::error::{PreviewError, Result};
use crate::frame::{PageSize, RasterFrame};

use super::content::{obj_to_f32, Matrix, PagePainter};
use super::{DocumentHandle, RasterBackend};

/// PDF backend built on `lopdf`, painting with `tiny-skia`.
///
/// Page counts and MediaBox sizes are exact. Page content is drawn by
/// [`PagePainter`]: paths, block-font text and images over white.
#[derive(Clone, Copy, Debug, Default)]
pub struct LopdfBackend;

impl RasterBackend for LopdfBackend {
    fn open_document(&self, bytes: &[u8]) -> Result<Box<dyn DocumentHandle>> {
        let doc = LoDocument::load_mem(bytes)?;
        if doc.is_encrypted() {
            return Err(PreviewError::DecodeFailure(
                "pdf: document is encrypted".to_string(),
            ));
        }

        let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
        if page_ids.is_empty() {
            return Err(PreviewError::DecodeFailure("pdf: no pages".to_string()));
        }

        let pages = page_ids
            .into_iter()
            .map(|id| Ok((id, media_box_for_id(&doc, id)?)))
            .collect::<Result<Vec<_>>>()?;
        debug!(pages = pages.len(), "Opened PDF");
        Ok(Box::new(LopdfDocument { doc, pages }))
    }
}

/// Page rectangle in default user space.
#[derive(Clone, Copy, Debug)]
struct MediaBox {
    left: f32,
    bottom: f32,
    right: f32,
    top: f32,
}

impl MediaBox {
    fn letter() -> Self {
        Self {
            left: 0.0,
            bottom: 0.0,
            right: REFERENCE_PAGE_WIDTH_PT,
            top: REFERENCE_PAGE_HEIGHT_PT,
        }
    }

    fn size(&self) -> PageSize {
        PageSize {
            width_pt: (self.right - self.left).max(1.0),
            height_pt: (self.top - self.bottom).max(1.0),
        }
    }

    /// User space to pixels: scaled, y flipped, origin at the top-left corner.
    fn device_matrix(&self, scale: f32) -> Matrix {
        Matrix::from_operands(
            scale,
            0.0,
            0.0,
            -scale,
            -self.left * scale,
            self.top * scale,
        )
    }
}

struct LopdfDocument {
    doc: LoDocument,
    pages: Vec<(ObjectId, MediaBox)>,
}

impl DocumentHandle for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn render_page(&mut self, index: usize, scale: f32) -> Result<RasterFrame> {
        let (page_id, media_box) =
            self.pages
                .get(index)
                .copied()
                .ok_or_else(|| PreviewError::RenderFailure {
                    page: index + 1,
                    message: format!("document has {} pages", self.pages.len()),
                })?;
        let (width, height) = media_box.size().pixel_dimensions(scale);
        if width > MAX_FRAME_DIMENSION_PX || height > MAX_FRAME_DIMENSION_PX {
            return Err(PreviewError::RenderFailure {
                page: index + 1,
                message: format!("page raster {width}x{height} is too large"),
            });
        }

        PagePainter::new(&self.doc, width, height, media_box.device_matrix(scale))?
            .paint_page(page_id)
            .map_err(|e| PreviewError::RenderFailure {
                page: index + 1,
                message: e.to_string(),
            })
    }

    fn page_size(&self, index: usize) -> Option<PageSize> {
        self.pages.get(index).map(|(_, media_box)| media_box.size())
    }
}

/// MediaBox of a page, inherited through the page tree. Letter when absent.
fn media_box_for_id(doc: &LoDocument, mut id: ObjectId) -> Result<MediaBox> {
    // Bounded walk: a malformed Parent cycle must not spin forever.
    for _ in 0..64 {
        let dict = doc.get_object(id)?.as_dict()?;
        if let Ok(arr) = dict.get(b"MediaBox").and_then(LoObject::as_array) {
            if let Some(media_box) = parse_media_box_array(arr) {
                return Ok(media_box);
            }
        }
        id = match dict.get(b"Parent").and_then(LoObject::as_reference) {
            Ok(parent_id) => parent_id,
            Err(_) => break,
        };
    }
    Ok(MediaBox::letter())
}

fn parse_media_box_array(arr: &[LoObject]) -> Option<MediaBox> {
    if arr.len() < 4 {
        return None;
    }
    let x0 = obj_to_f32(&arr[0])?;
    let y0 = obj_to_f32(&arr[1])?;
    let x1 = obj_to_f32(&arr[2])?;
    let y1 = obj_to_f32(&arr[3])?;
    Some(MediaBox {
        left: x0.min(x1),
        bottom: y0.min(y1),
        right: x0.max(x1),
        top: y0.max(y1),
    })
}
