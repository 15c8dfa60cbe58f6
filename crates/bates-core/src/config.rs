use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_COLOR_RGB, DEFAULT_DIGIT_WIDTH, DEFAULT_FONT_SIZE_PT, DEFAULT_FRAME_CACHE_CAPACITY,
    DEFAULT_PREFIX, DEFAULT_START_NUMBER, DEFAULT_ZONE_PADDING_PT, MAX_DIGIT_WIDTH,
    MAX_FONT_SIZE_PT, MAX_ZONE_PADDING_PT, MIN_DIGIT_WIDTH, MIN_FONT_SIZE_PT, MIN_ZONE_PADDING_PT,
    RENDER_SCALE,
};
use crate::error::{PreviewError, Result};

/// Stamp placement policy. Every zone anchors to the bottom edge of the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::BottomLeft, Zone::BottomCenter, Zone::BottomRight];

    /// Value the stamping service expects in its `zone` form field.
    pub fn form_value(&self) -> &'static str {
        match self {
            Self::BottomLeft => "Bottom Left (Z1)",
            Self::BottomCenter => "Bottom Center (Z2)",
            Self::BottomRight => "Bottom Right (Z3)",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BottomLeft => write!(f, "Bottom Left"),
            Self::BottomCenter => write!(f, "Bottom Center"),
            Self::BottomRight => write!(f, "Bottom Right"),
        }
    }
}

impl FromStr for Zone {
    type Err = PreviewError;

    /// Accepts the service's form values ("Bottom Left (Z1)"), kebab-case
    /// names, and the short zone ids `z1`..`z3`.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if key.contains("left") || key.ends_with("z1") || key == "bl" {
            Ok(Self::BottomLeft)
        } else if key.contains("center") || key.contains("centre") || key.ends_with("z2") || key == "bc" {
            Ok(Self::BottomCenter)
        } else if key.contains("right") || key.ends_with("z3") || key == "br" {
            Ok(Self::BottomRight)
        } else {
            Err(PreviewError::InvalidConfig(format!("unknown zone '{s}'")))
        }
    }
}

/// 8-bit sRGB stamp color, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Parse like the stamping service does: anything malformed falls back to blue.
    pub fn from_hex_or_default(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or_default()
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        let [r, g, b] = DEFAULT_COLOR_RGB;
        Self { r, g, b }
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Rgb::from_hex(&value).ok_or_else(|| format!("invalid color '{value}', expected #RRGGBB"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Labeling parameters shared by the preview and the stamping service.
///
/// A `LabelConfig` is a snapshot: consumers clone it whole and never patch
/// individual fields of a config that is already in use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub prefix: String,
    pub start_number: u64,
    /// Minimum number of digits; longer numbers are never clipped.
    pub digit_width: usize,
    pub color: Rgb,
    /// Font size in points.
    pub font_size: f32,
    pub zone: Zone,
    /// Distance between the stamp and the page edges, in points.
    pub zone_padding: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            start_number: DEFAULT_START_NUMBER,
            digit_width: DEFAULT_DIGIT_WIDTH,
            color: Rgb::default(),
            font_size: DEFAULT_FONT_SIZE_PT,
            zone: Zone::default(),
            zone_padding: DEFAULT_ZONE_PADDING_PT,
        }
    }
}

/// Raw, untrusted form input, one optional string per field.
#[derive(Clone, Debug, Default)]
pub struct LabelForm {
    pub prefix: Option<String>,
    pub start_number: Option<String>,
    pub digit_width: Option<String>,
    pub color_hex: Option<String>,
    pub font_size: Option<String>,
    pub zone: Option<String>,
    pub zone_padding: Option<String>,
}

impl LabelConfig {
    /// Build a config from untrusted form strings, falling back to `base`
    /// for anything missing or unparsable and clamping numeric ranges.
    pub fn from_form(form: &LabelForm, base: &LabelConfig) -> Self {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let prefix = form.prefix.clone().unwrap_or_else(|| base.prefix.clone());

        let start_number = match text(&form.start_number).map(|v| v.parse::<i64>()) {
            Some(Ok(n)) => n.max(0) as u64,
            _ => base.start_number,
        };

        let digit_width = match text(&form.digit_width).map(|v| v.parse::<i64>()) {
            Some(Ok(n)) => n.clamp(MIN_DIGIT_WIDTH as i64, MAX_DIGIT_WIDTH as i64) as usize,
            _ => base.digit_width,
        };

        let color = text(&form.color_hex)
            .map(|hex| Rgb::from_hex_or_default(&hex))
            .unwrap_or(base.color);

        let font_size = text(&form.font_size)
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(base.font_size);

        let zone = text(&form.zone)
            .and_then(|v| v.parse::<Zone>().ok())
            .unwrap_or(base.zone);

        let zone_padding = text(&form.zone_padding)
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(base.zone_padding);

        LabelConfig {
            prefix,
            start_number,
            digit_width,
            color,
            font_size,
            zone,
            zone_padding,
        }
        .validated()
    }

    /// Clamp every numeric field into its accepted range.
    pub fn validated(mut self) -> Self {
        self.digit_width = self.digit_width.clamp(MIN_DIGIT_WIDTH, MAX_DIGIT_WIDTH);
        self.font_size = if self.font_size.is_finite() {
            self.font_size.clamp(MIN_FONT_SIZE_PT, MAX_FONT_SIZE_PT)
        } else {
            DEFAULT_FONT_SIZE_PT
        };
        self.zone_padding = if self.zone_padding.is_finite() {
            self.zone_padding.clamp(MIN_ZONE_PADDING_PT, MAX_ZONE_PADDING_PT)
        } else {
            DEFAULT_ZONE_PADDING_PT
        };
        self
    }

    /// Form fields submitted to the stamping service for this config.
    pub fn to_form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("prefix", self.prefix.clone()),
            ("start_num", self.start_number.to_string()),
            ("digits", self.digit_width.to_string()),
            ("font_size", format!("{}", self.font_size.round() as i64)),
            ("zone", self.zone.form_value().to_string()),
            ("zone_padding", format!("{:.1}", self.zone_padding)),
            ("color_hex", self.color.to_hex()),
        ]
    }
}

/// Everything a preview session can be configured with from a TOML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub label: LabelConfig,
    /// Oversampling factor for page rasterization.
    pub render_scale: f32,
    /// Number of rendered base frames kept per session.
    pub frame_cache_capacity: usize,
    /// TrueType font used for the stamp. Falls back to system fonts, then
    /// to the built-in block font.
    pub font_path: Option<PathBuf>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            label: LabelConfig::default(),
            render_scale: RENDER_SCALE,
            frame_cache_capacity: DEFAULT_FRAME_CACHE_CAPACITY,
            font_path: None,
        }
    }
}

impl PreviewSettings {
    /// Parse settings from TOML text and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: PreviewSettings = toml::from_str(text)?;
        settings.validated()
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PreviewError::InvalidConfig(e.to_string()))
    }

    fn validated(mut self) -> Result<Self> {
        if !self.render_scale.is_finite() || self.render_scale <= 0.0 {
            return Err(PreviewError::InvalidConfig(format!(
                "render_scale must be positive, got {}",
                self.render_scale
            )));
        }
        if self.frame_cache_capacity == 0 {
            return Err(PreviewError::InvalidConfig(
                "frame_cache_capacity must be at least 1".to_string(),
            ));
        }
        self.label = self.label.validated();
        Ok(self)
    }
}
