pub mod builtin_font;
pub mod draw;
pub mod font;
pub mod layout;

use crate::config::LabelConfig;
use crate::error::Result;
use crate::frame::RasterFrame;

pub use font::LabelFont;
pub use layout::{layout_label, LabelLayout};

/// Geometry `label` would get on `frame`.
pub fn label_layout(
    frame: &RasterFrame,
    config: &LabelConfig,
    label: &str,
    font: &LabelFont,
) -> LabelLayout {
    layout_label(frame.width(), frame.height(), config, |font_px| {
        font.measure(label, font_px)
    })
}

/// Draw `label` onto a copy of `frame`. The base frame is left untouched,
/// so the same base can be recomposited for every config change.
pub fn composite(
    frame: &RasterFrame,
    config: &LabelConfig,
    label: &str,
    font: &LabelFont,
) -> Result<RasterFrame> {
    let layout = label_layout(frame, config, label, font);
    let mut pixmap = frame.to_pixmap()?;
    draw::draw_label(&mut pixmap, label, &layout, font, config.color);
    Ok(RasterFrame::from_pixmap(&pixmap))
}

/// One-line caption describing what the preview shows.
pub fn describe_placement(
    config: &LabelConfig,
    label: &str,
    page: usize,
    total_pages: usize,
    file_name: &str,
) -> String {
    format!(
        "{label} \u{2022} {} \u{2022} Padding {} pt \u{2022} Page {page} of {total_pages} \u{2022} {file_name}",
        config.zone,
        config.zone_padding.round() as i64,
    )
}
