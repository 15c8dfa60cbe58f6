use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bates;
use crate::config::LabelConfig;
use crate::consts::{DEFAULT_INDEX_PARTY, DEFAULT_INDEX_TITLE, INDEX_DATE_FORMAT};
use crate::error::{PreviewError, Result};
use crate::intake::InputFile;
use crate::session::LastStampedArtifact;

/// Column headers, in display order.
pub const INDEX_COLUMNS: [&str; 4] = [
    "Date Produced",
    "Category",
    "Document Name/Title",
    "Bates Range",
];

/// How the category column is filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryPolicy {
    /// Left blank for the user to fill in.
    #[default]
    Empty,
    /// Name of the folder that contains the file inside the bundle.
    ParentFolder,
}

#[derive(Clone, Debug)]
pub struct IndexOptions {
    pub party: String,
    pub title: String,
    pub category_policy: CategoryPolicy,
    /// Date used when neither the path nor the filename carries one.
    pub today: NaiveDate,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            party: DEFAULT_INDEX_PARTY.to_string(),
            title: DEFAULT_INDEX_TITLE.to_string(),
            category_policy: CategoryPolicy::default(),
            today: chrono::Local::now().date_naive(),
        }
    }
}

/// Where index rows come from.
#[derive(Clone, Copy, Debug)]
pub enum IndexSource<'a> {
    /// A fresh upload, numbered with the current config.
    Upload(&'a [InputFile]),
    /// The last stamped bundle held by the session, if any.
    LastStamped(Option<&'a LastStampedArtifact>),
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexRow {
    #[serde(rename = "Date Produced")]
    pub date: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Document Name/Title")]
    pub filename: String,
    #[serde(rename = "Bates Range")]
    pub range: String,
}

impl IndexRow {
    /// Cells in [`INDEX_COLUMNS`] order.
    pub fn cells(&self) -> [&str; 4] {
        [&self.date, &self.category, &self.filename, &self.range]
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct IndexTable {
    pub title: String,
    pub party: String,
    pub rows: Vec<IndexRow>,
}

#[derive(Clone, Debug)]
pub enum IndexPreview {
    /// No upload and no stamped bundle to index.
    Unavailable,
    Table(IndexTable),
}

impl IndexPreview {
    pub fn table(&self) -> Option<&IndexTable> {
        match self {
            Self::Table(table) => Some(table),
            Self::Unavailable => None,
        }
    }
}

/// Build the row-per-file index preview.
///
/// Rows follow the file order of the source. Uploads are numbered with a
/// fresh allocation; stamped bundles reuse the labels they were stamped with.
pub fn build(
    source: IndexSource<'_>,
    config: &LabelConfig,
    options: &IndexOptions,
) -> Result<IndexPreview> {
    let rows: Vec<IndexRow> = match source {
        IndexSource::None => return Ok(IndexPreview::Unavailable),
        IndexSource::LastStamped(None) => return Err(PreviewError::MissingUpstreamArtifact),
        IndexSource::Upload([]) => return Ok(IndexPreview::Unavailable),
        IndexSource::Upload(files) => bates::allocate(files, config)
            .iter()
            .map(|entry| {
                make_row(
                    &entry.file.original_path,
                    &entry.file.name,
                    &entry.range_text,
                    options,
                )
            })
            .collect(),
        IndexSource::LastStamped(Some(artifact)) => artifact
            .entries
            .iter()
            .map(|row| make_row(&row.original_path, &row.filename, &row.range_text, options))
            .collect(),
    };

    Ok(IndexPreview::Table(IndexTable {
        title: options.title.clone(),
        party: options.party.clone(),
        rows,
    }))
}

fn make_row(original_path: &str, filename: &str, range: &str, options: &IndexOptions) -> IndexRow {
    let date = date_produced(original_path, filename).unwrap_or(options.today);
    let category = match options.category_policy {
        CategoryPolicy::Empty => String::new(),
        CategoryPolicy::ParentFolder => parent_folder(original_path).to_string(),
    };
    IndexRow {
        date: date.format(INDEX_DATE_FORMAT).to_string(),
        category,
        filename: filename.to_string(),
        range: range.to_string(),
    }
}

fn parent_folder(path: &str) -> &str {
    let mut parts = path.rsplit('/').filter(|p| !p.is_empty());
    parts.next();
    parts.next().unwrap_or("")
}

fn year_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(20\d{2}|19\d{2})[._/-](\d{1,2})[._/-](\d{1,2})\b").expect("static date pattern")
    })
}

fn compact() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(20\d{2}|19\d{2})(\d{2})(\d{2})\b").expect("static date pattern")
    })
}

fn month_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\d{1,2})[._/-](\d{1,2})[._/-](20\d{2}|19\d{2})\b").expect("static date pattern")
    })
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

/// First calendar date found in `text`: `yyyy-mm-dd` style, then
/// `yyyymmdd`, then `mm-dd-yyyy` style. Separators may be `.`, `_`, `/` or `-`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    for caps in year_first().captures_iter(text) {
        if let Some(date) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }
    if let Some(caps) = compact().captures(text) {
        if let Some(date) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }
    for caps in month_first().captures_iter(text) {
        if let Some(date) = ymd(&caps[3], &caps[1], &caps[2]) {
            return Some(date);
        }
    }
    None
}

/// Production date encoded in a bundle path.
///
/// The second-level folder is checked first (bundles are usually laid out
/// as `<party>/<date>/...`), then every folder from the top, then the
/// filename.
pub fn date_produced(original_path: &str, filename: &str) -> Option<NaiveDate> {
    let folders: Vec<&str> = match original_path.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|p| !p.is_empty()).collect(),
        None => Vec::new(),
    };

    let mut candidates: Vec<&str> = Vec::with_capacity(folders.len() + 2);
    if folders.len() >= 2 {
        candidates.push(folders[1]);
    }
    candidates.extend(folders.iter().copied());
    if !filename.is_empty() {
        candidates.push(filename);
    }
    candidates.into_iter().find_map(parse_date)
}
