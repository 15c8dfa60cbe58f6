use std::path::PathBuf;

use anyhow::{Context, Result};
use bates_core::config::PreviewSettings;
use clap::Args;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save the effective preview settings as TOML. Without
/// `--config` these are the defaults.
pub fn run(args: &ConfigArgs, settings: &PreviewSettings) -> Result<()> {
    let toml_str = settings.to_toml_string()?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
