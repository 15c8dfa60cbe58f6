use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use bates_core::config::PreviewSettings;
use bates_core::intake;
use bates_core::preview::{Phase, PreviewController};
use bates_core::raster::LopdfBackend;
use clap::Args;

use crate::inputs::{self, InputArgs, LabelArgs};

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub label: LabelArgs,

    /// Output PNG
    #[arg(short, long)]
    pub output: PathBuf,

    /// Document to show (1-based, in numbering order)
    #[arg(long, default_value = "1")]
    pub file: usize,

    /// Page to show (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Seconds to wait for rendering
    #[arg(long, default_value = "60")]
    pub timeout: u64,
}

pub fn run(args: &PreviewArgs, settings: &PreviewSettings) -> Result<()> {
    let timeout = Duration::from_secs(args.timeout);
    let selection = inputs::read_selection(&args.input)?;
    let files = intake::resolve(selection).context("Failed to read inputs")?;
    let file_count = files.len();

    let mut controller = PreviewController::spawn(Arc::new(LopdfBackend), settings);
    controller.set_label_config(args.label.label_config(settings));
    controller.load(files);
    wait(&mut controller, timeout)?;

    if args.file == 0 || args.file > file_count {
        bail!("--file must be between 1 and {file_count}");
    }
    if args.file > 1 {
        controller.select_file(args.file - 1);
        wait(&mut controller, timeout)?;
    }

    let total = controller.state().total_pages.unwrap_or(1);
    if args.page == 0 || args.page > total {
        bail!("--page must be between 1 and {total}");
    }
    if args.page != controller.state().current_page {
        controller.go_to_page(args.page);
        wait(&mut controller, timeout)?;
    }

    let description = controller.describe();
    let width = controller
        .state()
        .rendered_frame
        .as_ref()
        .map(|f| f.width())
        .unwrap_or(0);
    let frame = controller
        .layout_ready(width)
        .context("Preview is not ready")?;
    frame
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if let Some(description) = description {
        println!("{description}");
    }
    println!("Preview saved to {}", args.output.display());
    Ok(())
}

fn wait(controller: &mut PreviewController, timeout: Duration) -> Result<()> {
    if !controller.poll_blocking(timeout) {
        bail!("Timed out waiting for the preview to render");
    }
    if let Phase::Error(message) = controller.phase() {
        bail!("Preview failed: {message}");
    }
    Ok(())
}
