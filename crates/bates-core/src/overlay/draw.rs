use tiny_skia::{FillRule, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};
use ttf_parser::{GlyphId, OutlineBuilder};

use crate::config::Rgb;
use crate::consts::{MIN_OUTLINE_WIDTH_PX, OUTLINE_RGB, OUTLINE_WIDTH_FRACTION};

use super::builtin_font;
use super::font::LabelFont;
use super::layout::LabelLayout;

/// Stroke the label with the light outline, then fill it with `color`.
pub(crate) fn draw_label(
    pixmap: &mut Pixmap,
    text: &str,
    layout: &LabelLayout,
    font: &LabelFont,
    color: Rgb,
) {
    let Some(path) = label_path(text, layout, font) else {
        return;
    };

    let [or, og, ob] = OUTLINE_RGB;
    let stroke = Stroke {
        width: (layout.font_px * OUTLINE_WIDTH_FRACTION).max(MIN_OUTLINE_WIDTH_PX),
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint(Rgb::new(or, og, ob)), &stroke, Transform::identity(), None);
    pixmap.fill_path(
        &path,
        &paint(color),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

fn paint(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}

fn label_path(text: &str, layout: &LabelLayout, font: &LabelFont) -> Option<Path> {
    let mut builder = PathBuilder::new();
    match font {
        LabelFont::Builtin => {
            builtin_font::push_text(&mut builder, text, layout.x, layout.baseline_y, layout.font_px);
        }
        LabelFont::Outline(outline) => match outline.face() {
            Some(face) => {
                let scale = layout.font_px / face.units_per_em().max(1) as f32;
                let mut pen_x = layout.x;
                for ch in text.chars() {
                    let gid = face.glyph_index(ch).unwrap_or(GlyphId(0));
                    let mut glyph = GlyphPathBuilder {
                        builder: &mut builder,
                        origin_x: pen_x,
                        origin_y: layout.baseline_y,
                        scale,
                    };
                    // Glyphs without outlines (spaces) only advance the pen.
                    let _ = face.outline_glyph(gid, &mut glyph);
                    pen_x += face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale;
                }
            }
            None => {
                builtin_font::push_text(&mut builder, text, layout.x, layout.baseline_y, layout.font_px);
            }
        },
    }
    builder.finish()
}

/// Writes font-unit outlines into frame space, flipping the y axis.
struct GlyphPathBuilder<'a> {
    builder: &'a mut PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder<'_> {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphPathBuilder<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
