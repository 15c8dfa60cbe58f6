use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::error::{PreviewError, Result};

/// An owned, immutable raster of one page.
///
/// Cloning is cheap (the pixel buffer is shared), so a rendered base frame
/// can be cached and recomposited any number of times.
#[derive(Clone, Debug)]
pub struct RasterFrame {
    image: Arc<RgbaImage>,
}

impl RasterFrame {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// True when both frames share a buffer or hold identical pixels.
    pub fn same_pixels(&self, other: &RasterFrame) -> bool {
        Arc::ptr_eq(&self.image, &other.image) || self.image.as_raw() == other.image.as_raw()
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(io) => PreviewError::Io(io),
                other => PreviewError::from(other),
            })
    }

    /// Copy into a premultiplied tiny-skia canvas.
    pub(crate) fn to_pixmap(&self) -> Result<Pixmap> {
        let (width, height) = self.image.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            PreviewError::DecodeFailure(format!("invalid frame size {width}x{height}"))
        })?;
        let src = self.image.as_raw();
        let dst = pixmap.data_mut();
        for (src_px, dst_px) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
            let a = src_px[3];
            dst_px[0] = premul_u8(src_px[0], a);
            dst_px[1] = premul_u8(src_px[1], a);
            dst_px[2] = premul_u8(src_px[2], a);
            dst_px[3] = a;
        }
        Ok(pixmap)
    }

    pub(crate) fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut raw = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        // Dimensions come from the pixmap, so the buffer always matches.
        let image = RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw)
            .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()));
        Self::new(image)
    }
}

impl From<RgbaImage> for RasterFrame {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

fn premul_u8(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}

/// Page geometry reported by a document backend, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    /// Pixel dimensions after applying the oversampling scale.
    pub fn pixel_dimensions(&self, scale: f32) -> (u32, u32) {
        let w = (self.width_pt * scale).round().max(1.0) as u32;
        let h = (self.height_pt * scale).round().max(1.0) as u32;
        (w, h)
    }
}
