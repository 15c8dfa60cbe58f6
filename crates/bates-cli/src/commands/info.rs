use anyhow::Result;
use bates_core::raster::LopdfBackend;
use clap::Args;

use crate::inputs::{self, InputArgs};

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let files = inputs::resolve_with_counts(&args.input, &LopdfBackend)?;
    crate::summary::print_files(&files);
    Ok(())
}
