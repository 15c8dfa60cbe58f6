use crate::error::Result;
use crate::frame::RasterFrame;

/// Decode a JPEG or PNG payload into a single frame.
///
/// EXIF orientation is not applied; the stamping service rotates images
/// before labeling, so rotated phone photos preview sideways.
pub fn decode_image(bytes: &[u8]) -> Result<RasterFrame> {
    let decoded = match image::guess_format(bytes) {
        Ok(format) => image::load_from_memory_with_format(bytes, format)?,
        Err(_) => image::load_from_memory(bytes)?,
    };
    Ok(RasterFrame::new(decoded.to_rgba8()))
}
