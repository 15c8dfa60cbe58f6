//! Content-stream painter for the `lopdf` backend.
//!
//! Covers what a preview needs to be recognizable: filled and stroked
//! paths in gray, RGB and CMYK, text shown with the built-in block font
//! at the right size and position, image XObjects (JPEG and raw 8-bit
//! samples) and nested form XObjects. Clipping, shading, patterns and
//! embedded font outlines are not drawn.

use std::collections::HashSet;

use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary as LoDictionary, Document as LoDocument, Object as LoObject, ObjectId};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};
use tracing::debug;

use crate::error::{PreviewError, Result};
use crate::frame::RasterFrame;
use crate::overlay::builtin_font;

/// Form XObjects nest at most this deep.
const MAX_FORM_DEPTH: usize = 12;

/// Built-in glyph advance as a fraction of the font size.
const GLYPH_ADVANCE_EM: f32 = builtin_font::ADVANCE_CELLS / builtin_font::CELLS_PER_EM;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    pub(crate) fn identity() -> Self {
        Self::from_operands(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub(crate) fn from_operands(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::from_operands(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self` applied first, then `rhs`.
    pub(crate) fn concat(self, rhs: Self) -> Self {
        Self {
            a: self.a * rhs.a + self.b * rhs.c,
            b: self.a * rhs.b + self.b * rhs.d,
            c: self.c * rhs.a + self.d * rhs.c,
            d: self.c * rhs.b + self.d * rhs.d,
            e: self.e * rhs.a + self.f * rhs.c + rhs.e,
            f: self.e * rhs.b + self.f * rhs.d + rhs.f,
        }
    }

    pub(crate) fn transform_point(self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Geometric mean of the axis scales, used for line widths.
    fn mean_scale(self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }

    fn vertical_scale(self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    fn to_transform(self) -> Transform {
        Transform::from_row(self.a, self.b, self.c, self.d, self.e, self.f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    fn rgb(r: f32, g: f32, b: f32) -> Self {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
        }
    }

    fn gray(v: f32) -> Self {
        Self::rgb(v, v, v)
    }

    fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        Self::rgb(
            (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
        )
    }

    /// `sc`/`scn` operands, interpreted by component count.
    fn from_components(values: &[f32]) -> Option<Self> {
        match values {
            [g] => Some(Self::gray(*g)),
            [r, g, b] => Some(Self::rgb(*r, *g, *b)),
            [c, m, y, k] => Some(Self::cmyk(*c, *m, *y, *k)),
            _ => None,
        }
    }

    fn paint(self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(self.r, self.g, self.b, 255);
        paint.anti_alias = true;
        paint
    }
}

#[derive(Clone, Debug)]
struct GraphicsState {
    ctm: Matrix,
    fill: Color,
    stroke: Color,
    line_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    h_scale: f32,
    leading: f32,
    rise: f32,
    render_mode: i64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::identity(),
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
            render_mode: 0,
        }
    }
}

/// Paints one page's content streams onto a white pixmap.
pub(crate) struct PagePainter<'a> {
    doc: &'a LoDocument,
    pixmap: Pixmap,
    device: Matrix,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: PathBuilder,
    current: Option<(f32, f32)>,
    text_matrix: Matrix,
    text_line_matrix: Matrix,
    visited_forms: HashSet<ObjectId>,
}

impl<'a> PagePainter<'a> {
    /// `device` maps default user space to pixel space (y down).
    pub(crate) fn new(doc: &'a LoDocument, width: u32, height: u32, device: Matrix) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            PreviewError::DecodeFailure(format!("invalid page raster {width}x{height}"))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        Ok(Self {
            doc,
            pixmap,
            device,
            state: GraphicsState::default(),
            stack: Vec::new(),
            path: PathBuilder::new(),
            current: None,
            text_matrix: Matrix::identity(),
            text_line_matrix: Matrix::identity(),
            visited_forms: HashSet::new(),
        })
    }

    pub(crate) fn paint_page(mut self, page_id: ObjectId) -> Result<RasterFrame> {
        let bytes = self.doc.get_page_content(page_id)?;
        let content = Content::decode(&bytes)?;
        let resources = page_resources(self.doc, page_id);
        self.run(&content.operations, resources.as_ref(), 0);
        Ok(RasterFrame::from_pixmap(&self.pixmap))
    }

    fn run(&mut self, operations: &[Operation], resources: Option<&LoDictionary>, depth: usize) {
        for op in operations {
            self.apply(op, resources, depth);
        }
    }

    fn apply(&mut self, op: &Operation, resources: Option<&LoDictionary>, depth: usize) {
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(prev) = self.stack.pop() {
                    self.state = prev;
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = op_f32_6(op) {
                    self.state.ctm = Matrix::from_operands(a, b, c, d, e, f).concat(self.state.ctm);
                }
            }
            "w" => {
                if let Some(width) = op_f32(op, 0) {
                    self.state.line_width = width.max(0.0);
                }
            }
            "J" => {
                self.state.line_cap = match op_i64(op, 0) {
                    Some(1) => LineCap::Round,
                    Some(2) => LineCap::Square,
                    _ => LineCap::Butt,
                };
            }
            "j" => {
                self.state.line_join = match op_i64(op, 0) {
                    Some(1) => LineJoin::Round,
                    Some(2) => LineJoin::Bevel,
                    _ => LineJoin::Miter,
                };
            }
            "g" => {
                if let Some(v) = op_f32(op, 0) {
                    self.state.fill = Color::gray(v);
                }
            }
            "G" => {
                if let Some(v) = op_f32(op, 0) {
                    self.state.stroke = Color::gray(v);
                }
            }
            "rg" => {
                if let Some([r, g, b]) = op_f32_3(op) {
                    self.state.fill = Color::rgb(r, g, b);
                }
            }
            "RG" => {
                if let Some([r, g, b]) = op_f32_3(op) {
                    self.state.stroke = Color::rgb(r, g, b);
                }
            }
            "k" => {
                if let Some([c, m, y, k]) = op_f32_4(op) {
                    self.state.fill = Color::cmyk(c, m, y, k);
                }
            }
            "K" => {
                if let Some([c, m, y, k]) = op_f32_4(op) {
                    self.state.stroke = Color::cmyk(c, m, y, k);
                }
            }
            "sc" | "scn" => {
                if let Some(color) = Color::from_components(&numeric_operands(op)) {
                    self.state.fill = color;
                }
            }
            "SC" | "SCN" => {
                if let Some(color) = Color::from_components(&numeric_operands(op)) {
                    self.state.stroke = color;
                }
            }
            "m" => {
                if let Some([x, y]) = op_f32_2(op) {
                    let (px, py) = self.to_device(x, y);
                    self.path.move_to(px, py);
                    self.current = Some((px, py));
                }
            }
            "l" => {
                if let Some([x, y]) = op_f32_2(op) {
                    let (px, py) = self.to_device(x, y);
                    self.path.line_to(px, py);
                    self.current = Some((px, py));
                }
            }
            "c" => {
                if let Some([x1, y1, x2, y2, x, y]) = op_f32_6(op) {
                    let (ax, ay) = self.to_device(x1, y1);
                    let (bx, by) = self.to_device(x2, y2);
                    let (px, py) = self.to_device(x, y);
                    self.path.cubic_to(ax, ay, bx, by, px, py);
                    self.current = Some((px, py));
                }
            }
            "v" => {
                if let (Some([x2, y2, x, y]), Some((cx, cy))) = (op_f32_4(op), self.current) {
                    let (bx, by) = self.to_device(x2, y2);
                    let (px, py) = self.to_device(x, y);
                    self.path.cubic_to(cx, cy, bx, by, px, py);
                    self.current = Some((px, py));
                }
            }
            "y" => {
                if let Some([x1, y1, x, y]) = op_f32_4(op) {
                    let (ax, ay) = self.to_device(x1, y1);
                    let (px, py) = self.to_device(x, y);
                    self.path.cubic_to(ax, ay, px, py, px, py);
                    self.current = Some((px, py));
                }
            }
            "re" => {
                if let Some([x, y, w, h]) = op_f32_4(op) {
                    let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
                    for (i, (cx, cy)) in corners.into_iter().enumerate() {
                        let (px, py) = self.to_device(cx, cy);
                        if i == 0 {
                            self.path.move_to(px, py);
                        } else {
                            self.path.line_to(px, py);
                        }
                    }
                    self.path.close();
                    self.current = Some(self.to_device(x, y));
                }
            }
            "h" => self.path.close(),
            "f" | "F" => self.paint_path(Some(FillRule::Winding), false),
            "f*" => self.paint_path(Some(FillRule::EvenOdd), false),
            "S" => self.paint_path(None, true),
            "s" => {
                self.path.close();
                self.paint_path(None, true);
            }
            "B" => self.paint_path(Some(FillRule::Winding), true),
            "B*" => self.paint_path(Some(FillRule::EvenOdd), true),
            "b" => {
                self.path.close();
                self.paint_path(Some(FillRule::Winding), true);
            }
            "b*" => {
                self.path.close();
                self.paint_path(Some(FillRule::EvenOdd), true);
            }
            "n" => self.paint_path(None, false),
            "BT" => {
                self.text_matrix = Matrix::identity();
                self.text_line_matrix = Matrix::identity();
            }
            "Tf" => {
                if let Some(size) = op_f32(op, 1) {
                    self.state.font_size = size.abs();
                }
            }
            "Tc" => {
                if let Some(v) = op_f32(op, 0) {
                    self.state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op_f32(op, 0) {
                    self.state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op_f32(op, 0) {
                    self.state.h_scale = (v / 100.0).max(0.0);
                }
            }
            "TL" => {
                if let Some(v) = op_f32(op, 0) {
                    self.state.leading = v;
                }
            }
            "Ts" => {
                if let Some(v) = op_f32(op, 0) {
                    self.state.rise = v;
                }
            }
            "Tr" => {
                if let Some(mode) = op_i64(op, 0) {
                    self.state.render_mode = mode;
                }
            }
            "Td" | "TD" => {
                if let Some([tx, ty]) = op_f32_2(op) {
                    if op.operator == "TD" {
                        self.state.leading = -ty;
                    }
                    self.next_line(tx, ty);
                }
            }
            "T*" => self.next_line(0.0, -self.state.leading),
            "Tm" => {
                if let Some([a, b, c, d, e, f]) = op_f32_6(op) {
                    self.text_matrix = Matrix::from_operands(a, b, c, d, e, f);
                    self.text_line_matrix = self.text_matrix;
                }
            }
            "Tj" => {
                if let Some(bytes) = op.operands.first().and_then(|o| o.as_str().ok()) {
                    self.show_text(bytes);
                }
            }
            "'" => {
                self.next_line(0.0, -self.state.leading);
                if let Some(bytes) = op.operands.first().and_then(|o| o.as_str().ok()) {
                    self.show_text(bytes);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (op_f32(op, 0), op_f32(op, 1)) {
                    self.state.word_spacing = aw;
                    self.state.char_spacing = ac;
                }
                self.next_line(0.0, -self.state.leading);
                if let Some(bytes) = op.operands.get(2).and_then(|o| o.as_str().ok()) {
                    self.show_text(bytes);
                }
            }
            "TJ" => {
                if let Some(items) = op.operands.first().and_then(|o| o.as_array().ok()) {
                    for item in items {
                        if let Ok(bytes) = item.as_str() {
                            self.show_text(bytes);
                        } else if let Some(adjust) = obj_to_f32(item) {
                            // Thousandths of text space, subtracted from the advance.
                            let tx = -adjust / 1000.0 * self.state.font_size * self.state.h_scale;
                            self.advance_text(tx);
                        }
                    }
                }
            }
            "Do" => {
                if let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) {
                    self.draw_xobject(name, resources, depth);
                }
            }
            _ => {}
        }
    }

    fn to_device(&self, x: f32, y: f32) -> (f32, f32) {
        self.state.ctm.concat(self.device).transform_point(x, y)
    }

    /// Paint and then discard the current path.
    fn paint_path(&mut self, fill: Option<FillRule>, stroke: bool) {
        let builder = std::mem::replace(&mut self.path, PathBuilder::new());
        self.current = None;
        let Some(path) = builder.finish() else {
            return;
        };
        if let Some(rule) = fill {
            self.pixmap.fill_path(
                &path,
                &self.state.fill.paint(),
                rule,
                Transform::identity(),
                None,
            );
        }
        if stroke {
            let scale = self.state.ctm.concat(self.device).mean_scale();
            let stroke = Stroke {
                // Zero means the thinnest visible line.
                width: (self.state.line_width * scale).max(1.0),
                line_cap: self.state.line_cap,
                line_join: self.state.line_join,
                ..Stroke::default()
            };
            self.pixmap.stroke_path(
                &path,
                &self.state.stroke.paint(),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    fn next_line(&mut self, tx: f32, ty: f32) {
        self.text_line_matrix = Matrix::translation(tx, ty).concat(self.text_line_matrix);
        self.text_matrix = self.text_line_matrix;
    }

    fn advance_text(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).concat(self.text_matrix);
    }

    /// Single-byte codes drawn as Latin-1 with the block font.
    fn show_text(&mut self, bytes: &[u8]) {
        let text: String = bytes.iter().map(|&b| b as char).collect();
        let state = &self.state;
        // Modes 3 and 7 are invisible or clip-only.
        if !text.is_empty() && state.render_mode != 3 && state.render_mode != 7 {
            let rendering = self.text_matrix.concat(state.ctm).concat(self.device);
            let (x, baseline_y) = rendering.transform_point(0.0, state.rise);
            let font_px = state.font_size * rendering.vertical_scale();
            if font_px >= 0.5 {
                let mut builder = PathBuilder::new();
                builtin_font::push_text(&mut builder, &text, x, baseline_y, font_px);
                if let Some(path) = builder.finish() {
                    self.pixmap.fill_path(
                        &path,
                        &state.fill.paint(),
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
        }

        let glyphs = text.chars().count() as f32;
        let spaces = bytes.iter().filter(|&&b| b == b' ').count() as f32;
        let tx = (glyphs * (GLYPH_ADVANCE_EM * state.font_size + state.char_spacing)
            + spaces * state.word_spacing)
            * state.h_scale;
        self.advance_text(tx);
    }

    fn draw_xobject(&mut self, name: &[u8], resources: Option<&LoDictionary>, depth: usize) {
        let doc = self.doc;
        let Some(id) = resources.and_then(|res| xobject_id(doc, res, name)) else {
            debug!(name = %String::from_utf8_lossy(name), "XObject not found");
            return;
        };
        let Ok(stream) = doc.get_object(id).and_then(LoObject::as_stream) else {
            return;
        };
        let subtype = stream
            .dict
            .get(b"Subtype")
            .and_then(LoObject::as_name)
            .unwrap_or_default();

        match subtype {
            b"Form" => {
                if depth >= MAX_FORM_DEPTH || !self.visited_forms.insert(id) {
                    return;
                }
                match stream
                    .get_plain_content()
                    .and_then(|bytes| Content::decode(&bytes))
                {
                    Ok(content) => {
                        let form_matrix = stream
                            .dict
                            .get(b"Matrix")
                            .ok()
                            .and_then(parse_matrix_object)
                            .unwrap_or_else(Matrix::identity);
                        let form_resources = stream
                            .dict
                            .get(b"Resources")
                            .ok()
                            .and_then(|obj| resolve_dict(doc, obj))
                            .cloned();

                        let saved = self.state.clone();
                        let saved_depth = self.stack.len();
                        self.state.ctm = form_matrix.concat(self.state.ctm);
                        self.run(
                            &content.operations,
                            form_resources.as_ref().or(resources),
                            depth + 1,
                        );
                        self.stack.truncate(saved_depth);
                        self.state = saved;
                    }
                    Err(e) => debug!(error = %e, "Skipping undecodable form XObject"),
                }
                self.visited_forms.remove(&id);
            }
            b"Image" => match decode_image_stream(doc, stream) {
                Some(image) => self.draw_image(image),
                None => debug!("Skipping unsupported image XObject"),
            },
            _ => {}
        }
    }

    /// Images fill the unit square of the current CTM, first row on top.
    fn draw_image(&mut self, image: RgbaImage) {
        let (w, h) = image.dimensions();
        let Ok(source) = RasterFrame::new(image).to_pixmap() else {
            return;
        };
        let to_unit = Matrix::from_operands(1.0 / w as f32, 0.0, 0.0, -1.0 / h as f32, 0.0, 1.0);
        let transform = to_unit.concat(self.state.ctm).concat(self.device).to_transform();
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }
}

/// Resources of a page, inherited through the page tree.
fn page_resources(doc: &LoDocument, mut id: ObjectId) -> Option<LoDictionary> {
    for _ in 0..64 {
        let dict = doc.get_object(id).ok()?.as_dict().ok()?;
        if let Some(res) = dict.get(b"Resources").ok().and_then(|o| resolve_dict(doc, o)) {
            return Some(res.clone());
        }
        id = dict.get(b"Parent").and_then(LoObject::as_reference).ok()?;
    }
    None
}

fn xobject_id(doc: &LoDocument, resources: &LoDictionary, name: &[u8]) -> Option<ObjectId> {
    let xobjects = resources
        .get(b"XObject")
        .ok()
        .and_then(|o| resolve_dict(doc, o))?;
    xobjects.get(name).and_then(LoObject::as_reference).ok()
}

fn resolve_dict<'a>(doc: &'a LoDocument, obj: &'a LoObject) -> Option<&'a LoDictionary> {
    match obj {
        LoObject::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        LoObject::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// JPEG passes through `image`; raw samples must be 8-bit gray, RGB or CMYK.
fn decode_image_stream(doc: &LoDocument, stream: &lopdf::Stream) -> Option<RgbaImage> {
    let filters = stream.filters().unwrap_or_default();
    if filters.iter().any(|f| *f == b"DCTDecode") {
        return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
            .ok()
            .map(|img| img.to_rgba8());
    }

    let width = dict_u32(&stream.dict, b"Width")?;
    let height = dict_u32(&stream.dict, b"Height")?;
    let bpc = stream
        .dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(obj_to_f32)
        .unwrap_or(8.0);
    if (bpc - 8.0).abs() > 0.01 {
        return None;
    }
    let channels = match stream.dict.get(b"ColorSpace").ok() {
        None => 1,
        Some(obj) => color_space_channels(doc, obj)?,
    };

    let plain = stream.get_plain_content().ok()?;
    let pixels = (width as usize).checked_mul(height as usize)?;
    if plain.len() < pixels.checked_mul(channels)? {
        return None;
    }

    let mut rgba = Vec::with_capacity(pixels * 4);
    for px in plain.chunks_exact(channels).take(pixels) {
        let color = match px {
            [g] => Color { r: *g, g: *g, b: *g },
            [r, g, b] => Color { r: *r, g: *g, b: *b },
            [c, m, y, k] => Color::cmyk(
                *c as f32 / 255.0,
                *m as f32 / 255.0,
                *y as f32 / 255.0,
                *k as f32 / 255.0,
            ),
            _ => return None,
        };
        rgba.extend_from_slice(&[color.r, color.g, color.b, 255]);
    }
    RgbaImage::from_raw(width, height, rgba)
}

fn color_space_channels(doc: &LoDocument, obj: &LoObject) -> Option<usize> {
    let obj = match obj {
        LoObject::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    match obj {
        LoObject::Name(name) => match name.as_slice() {
            b"DeviceGray" | b"CalGray" | b"G" => Some(1),
            b"DeviceRGB" | b"CalRGB" | b"RGB" => Some(3),
            b"DeviceCMYK" | b"CMYK" => Some(4),
            _ => None,
        },
        LoObject::Array(arr) => match arr.first()?.as_name().ok()? {
            b"ICCBased" => {
                let id = arr.get(1)?.as_reference().ok()?;
                let n = doc.get_object(id).ok()?.as_stream().ok()?.dict.get(b"N").ok()?;
                usize::try_from(n.as_i64().ok()?).ok().filter(|&n| n > 0)
            }
            b"CalGray" => Some(1),
            b"CalRGB" => Some(3),
            _ => None,
        },
        _ => None,
    }
}

fn dict_u32(dict: &LoDictionary, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_i64().ok())
        .and_then(|v| u32::try_from(v).ok())
        .filter(|&v| v > 0)
}

fn parse_matrix_object(obj: &LoObject) -> Option<Matrix> {
    let arr = obj.as_array().ok()?;
    if arr.len() < 6 {
        return None;
    }
    Some(Matrix::from_operands(
        obj_to_f32(&arr[0])?,
        obj_to_f32(&arr[1])?,
        obj_to_f32(&arr[2])?,
        obj_to_f32(&arr[3])?,
        obj_to_f32(&arr[4])?,
        obj_to_f32(&arr[5])?,
    ))
}

fn numeric_operands(op: &Operation) -> Vec<f32> {
    op.operands.iter().filter_map(obj_to_f32).collect()
}

fn op_f32(op: &Operation, idx: usize) -> Option<f32> {
    obj_to_f32(op.operands.get(idx)?)
}

fn op_i64(op: &Operation, idx: usize) -> Option<i64> {
    op.operands.get(idx)?.as_i64().ok()
}

fn op_f32_2(op: &Operation) -> Option<[f32; 2]> {
    Some([op_f32(op, 0)?, op_f32(op, 1)?])
}

fn op_f32_3(op: &Operation) -> Option<[f32; 3]> {
    Some([op_f32(op, 0)?, op_f32(op, 1)?, op_f32(op, 2)?])
}

fn op_f32_4(op: &Operation) -> Option<[f32; 4]> {
    Some([
        op_f32(op, 0)?,
        op_f32(op, 1)?,
        op_f32(op, 2)?,
        op_f32(op, 3)?,
    ])
}

fn op_f32_6(op: &Operation) -> Option<[f32; 6]> {
    Some([
        op_f32(op, 0)?,
        op_f32(op, 1)?,
        op_f32(op, 2)?,
        op_f32(op, 3)?,
        op_f32(op, 4)?,
        op_f32(op, 5)?,
    ])
}

pub(crate) fn obj_to_f32(obj: &LoObject) -> Option<f32> {
    if let Ok(v) = obj.as_float() {
        return Some(v);
    }
    obj.as_i64().ok().map(|v| v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_applies_left_first() {
        let scale = Matrix::from_operands(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix::translation(10.0, 0.0);
        assert_eq!(scale.concat(shift).transform_point(1.0, 1.0), (12.0, 2.0));
        assert_eq!(shift.concat(scale).transform_point(1.0, 1.0), (22.0, 2.0));
    }

    #[test]
    fn test_cmyk_conversion() {
        assert_eq!(Color::cmyk(0.0, 0.0, 0.0, 1.0), Color::BLACK);
        assert_eq!(Color::cmyk(1.0, 0.0, 0.0, 0.0), Color { r: 0, g: 255, b: 255 });
    }

    #[test]
    fn test_component_colors() {
        assert_eq!(Color::from_components(&[1.0]), Some(Color::gray(1.0)));
        assert_eq!(Color::from_components(&[1.0, 0.0]), None);
    }
}
