use anyhow::{Context, Result};
use bates_core::config::PreviewSettings;
use bates_core::index::{self, CategoryPolicy, IndexOptions, IndexPreview, IndexSource};
use bates_core::raster::LopdfBackend;
use clap::Args;

use crate::inputs::{self, InputArgs, LabelArgs};

#[derive(Args)]
pub struct IndexArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub label: LabelArgs,

    /// Producing party
    #[arg(long, default_value = "Client")]
    pub party: String,

    /// Title line of the index
    #[arg(long, default_value = "CLIENT NAME - DOCUMENTS")]
    pub title: String,

    /// Fill the category column with each file's parent folder
    #[arg(long)]
    pub folder_categories: bool,

    /// Date used when a path carries none (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<String>,

    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &IndexArgs, settings: &PreviewSettings) -> Result<()> {
    let config = args.label.label_config(settings);
    let files = inputs::resolve_with_counts(&args.input, &LopdfBackend)?;

    let mut options = IndexOptions {
        party: args.party.clone(),
        title: args.title.clone(),
        category_policy: if args.folder_categories {
            CategoryPolicy::ParentFolder
        } else {
            CategoryPolicy::Empty
        },
        ..IndexOptions::default()
    };
    if let Some(ref date) = args.date {
        options.today =
            index::parse_date(date).with_context(|| format!("Invalid date '{date}'"))?;
    }

    let preview = index::build(IndexSource::Upload(&files), &config, &options)
        .context("Failed to build index")?;
    match preview {
        IndexPreview::Unavailable => println!("Nothing to index"),
        IndexPreview::Table(table) if args.json => {
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        IndexPreview::Table(table) => crate::summary::print_index(&table),
    }
    Ok(())
}
