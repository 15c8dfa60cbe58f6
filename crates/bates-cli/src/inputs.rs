use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bates_core::config::{LabelConfig, LabelForm, PreviewSettings};
use bates_core::intake::{self, NamedPayload, OrderedFileList, Selection};
use bates_core::raster::{self, RasterBackend};
use clap::Args;
use tracing::debug;

use crate::progress::BarReporter;

#[derive(Args)]
pub struct InputArgs {
    /// Documents, images, .zip bundles or folders
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Label overrides. Unparsable values fall back to the configured label.
#[derive(Args)]
pub struct LabelArgs {
    /// Label prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// First Bates number
    #[arg(long)]
    pub start: Option<String>,

    /// Minimum number of digits
    #[arg(long)]
    pub digits: Option<String>,

    /// Stamp color as #RRGGBB
    #[arg(long)]
    pub color: Option<String>,

    /// Font size in points
    #[arg(long)]
    pub font_size: Option<String>,

    /// Placement: left, center, right (or z1, z2, z3)
    #[arg(long)]
    pub zone: Option<String>,

    /// Distance from the page edges in points
    #[arg(long)]
    pub padding: Option<String>,
}

impl LabelArgs {
    pub fn to_form(&self) -> LabelForm {
        LabelForm {
            prefix: self.prefix.clone(),
            start_number: self.start.clone(),
            digit_width: self.digits.clone(),
            color_hex: self.color.clone(),
            font_size: self.font_size.clone(),
            zone: self.zone.clone(),
            zone_padding: self.padding.clone(),
        }
    }

    pub fn label_config(&self, settings: &PreviewSettings) -> LabelConfig {
        LabelConfig::from_form(&self.to_form(), &settings.label)
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<PreviewSettings> {
    match path {
        Some(path) => PreviewSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(PreviewSettings::default()),
    }
}

/// Read every input into an intake selection. Folders contribute their
/// files with folder-relative paths so bundle layout is preserved.
pub fn read_selection(args: &InputArgs) -> Result<Selection> {
    let mut payloads = Vec::new();
    for path in &args.inputs {
        if path.is_dir() {
            let root_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            collect_dir(path, &root_name, &mut payloads)?;
        } else {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            payloads.push(NamedPayload::new(display_name(path), bytes));
        }
    }
    debug!(count = payloads.len(), "Read input files");
    if payloads.len() == 1 && args.inputs.iter().any(|p| p.is_dir()) {
        return Ok(Selection::Multiple(payloads));
    }
    Ok(Selection::from(payloads))
}

fn collect_dir(dir: &Path, prefix: &str, out: &mut Vec<NamedPayload>) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if path.is_dir() {
            collect_dir(&path, &rel, out)?;
        } else {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            out.push(NamedPayload::new(rel, bytes));
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve inputs and count every document's pages up front.
pub fn resolve_with_counts(
    args: &InputArgs,
    backend: &dyn RasterBackend,
) -> Result<OrderedFileList> {
    let selection = read_selection(args)?;
    let mut files = intake::resolve(selection).context("Failed to read inputs")?;
    let counts = raster::discover_page_counts(&files, backend, &BarReporter::new());
    for (file, count) in files.iter_mut().zip(counts) {
        if let Ok(count) = count {
            file.page_count = Some(count);
        }
    }
    Ok(files)
}
