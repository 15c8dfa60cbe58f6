use anyhow::Result;
use bates_core::bates;
use bates_core::config::PreviewSettings;
use bates_core::raster::LopdfBackend;
use clap::Args;

use crate::inputs::{self, InputArgs, LabelArgs};

#[derive(Args)]
pub struct RangesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub label: LabelArgs,

    /// Print the allocation as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the form fields the stamping service expects
    #[arg(long)]
    pub form_fields: bool,
}

pub fn run(args: &RangesArgs, settings: &PreviewSettings) -> Result<()> {
    let config = args.label.label_config(settings);
    let files = inputs::resolve_with_counts(&args.input, &LopdfBackend)?;
    let entries = bates::allocate(&files, &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        crate::summary::print_allocation(&entries, &config);
    }

    if args.form_fields {
        for (name, value) in config.to_form_fields() {
            println!("{name}={value}");
        }
    }

    Ok(())
}
