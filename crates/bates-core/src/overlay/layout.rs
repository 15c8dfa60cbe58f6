use crate::config::{LabelConfig, Zone};
use crate::consts::{LEGIBILITY_MULTIPLIER, MIN_READABLE_FONT_PX, REFERENCE_PAGE_WIDTH_PT};

/// Where and how large a label is drawn on one frame, in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelLayout {
    /// Left edge of the text.
    pub x: f32,
    /// Text baseline, measured from the top of the frame.
    pub baseline_y: f32,
    pub font_px: f32,
    pub padding_px: f32,
    pub text_width: f32,
    /// Frame pixels per point.
    pub scale: f32,
}

/// Pixels per point for a frame assumed to span a Letter-width page.
pub fn frame_scale(frame_width: u32) -> f32 {
    frame_width as f32 / REFERENCE_PAGE_WIDTH_PT
}

/// Preview font size in pixels, never below the readable minimum.
pub fn font_px(font_size_pt: f32, scale: f32) -> f32 {
    (font_size_pt * scale * LEGIBILITY_MULTIPLIER).max(MIN_READABLE_FONT_PX)
}

/// Place a label on a `frame_width` x `frame_height` frame.
///
/// `measure` returns the text width in pixels for a given font size in pixels.
pub fn layout_label(
    frame_width: u32,
    frame_height: u32,
    config: &LabelConfig,
    measure: impl FnOnce(f32) -> f32,
) -> LabelLayout {
    let scale = frame_scale(frame_width);
    let font_px = font_px(config.font_size, scale);
    let padding_px = config.zone_padding * scale;
    let text_width = measure(font_px);
    let width = frame_width as f32;

    let x = match config.zone {
        Zone::BottomLeft => padding_px,
        Zone::BottomCenter => (width - text_width) / 2.0,
        Zone::BottomRight => width - text_width - padding_px,
    };

    LabelLayout {
        x,
        baseline_y: frame_height as f32 - padding_px,
        font_px,
        padding_px,
        text_width,
        scale,
    }
}
