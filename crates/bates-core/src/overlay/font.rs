use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};
use ttf_parser::GlyphId;

use crate::error::{PreviewError, Result};

use super::builtin_font;

/// Font used to draw and measure the stamp.
#[derive(Clone, Debug)]
pub enum LabelFont {
    /// A TrueType/OpenType face; advance widths come from its metrics.
    Outline(Arc<OutlineFont>),
    /// Built-in 5x7 block font with a fixed advance.
    Builtin,
}

#[derive(Debug)]
pub struct OutlineFont {
    data: Vec<u8>,
}

impl OutlineFont {
    pub(crate) fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, 0).ok()
    }
}

impl LabelFont {
    /// Wrap font bytes, checking that they parse.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        ttf_parser::Face::parse(&data, 0)
            .map_err(|e| PreviewError::DecodeFailure(format!("font: {e}")))?;
        Ok(Self::Outline(Arc::new(OutlineFont { data })))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Pick the stamp font: the configured file, then well-known system
    /// sans-serif faces, then the built-in block font.
    pub fn resolve(font_path: Option<&Path>) -> Self {
        if let Some(path) = font_path {
            match Self::load(path) {
                Ok(font) => return font,
                Err(e) => warn!(path = %path.display(), error = %e, "Font unusable, falling back"),
            }
        }
        for candidate in system_font_candidates() {
            let Ok(data) = std::fs::read(&candidate) else {
                continue;
            };
            if let Ok(font) = Self::from_bytes(data) {
                debug!(path = %candidate.display(), "Using system font");
                return font;
            }
        }
        debug!("Using built-in block font");
        Self::Builtin
    }

    /// Advance width of `text` in pixels at `font_px`.
    pub fn measure(&self, text: &str, font_px: f32) -> f32 {
        match self {
            Self::Builtin => builtin_font::measure(text, font_px),
            Self::Outline(font) => {
                let Some(face) = font.face() else {
                    return builtin_font::measure(text, font_px);
                };
                let upem = face.units_per_em().max(1) as f32;
                let units: f32 = text
                    .chars()
                    .map(|ch| {
                        let gid = face.glyph_index(ch).unwrap_or(GlyphId(0));
                        face.glyph_hor_advance(gid).unwrap_or(0) as f32
                    })
                    .sum();
                units * font_px / upem
            }
        }
    }
}

fn system_font_candidates() -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "linux")]
    {
        for path in [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
        ] {
            out.push(PathBuf::from(path));
        }
        if let Ok(home) = std::env::var("HOME") {
            out.push(PathBuf::from(home).join(".fonts/DejaVuSans.ttf"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        for path in [
            "/Library/Fonts/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ] {
            out.push(PathBuf::from(path));
        }
    }

    #[cfg(target_os = "windows")]
    {
        out.push(PathBuf::from(r"C:\Windows\Fonts\arial.ttf"));
        if let Ok(windir) = std::env::var("WINDIR") {
            out.push(PathBuf::from(windir).join("Fonts").join("arial.ttf"));
        }
    }

    out
}
