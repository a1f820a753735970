use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spdlog::{error, info, warn};

use blogsmith::logger::configure_logger;
use blogsmith::site_builder::build_site;

use crate::config::open_config;
use crate::config_data::write_sample_cfg;

mod config;
mod config_data;

const CFG_FILE_NAME: &str = "blogsmith.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Build the whole site
    Build(BuildArgs),
    /// Print or write a sample configuration file
    SampleConfig(SampleConfigArgs),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct BuildArgs {
    /// Config path. Looked up next to the executable, in the current
    /// directory and in the user config directory when missing
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Site root, overrides paths.root_dir
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Base url of the published site, overrides site.url
    #[arg(long)]
    site_url: Option<String>,

    /// Page sources, relative to the root unless absolute
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Snippets, relative to the root unless absolute
    #[arg(long)]
    snippets_dir: Option<PathBuf>,

    /// Output directory, relative to the root unless absolute
    #[arg(long)]
    publish_dir: Option<PathBuf>,

    /// Publish pages marked with `draft: true`
    #[arg(long)]
    drafts: bool,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct SampleConfigArgs {
    /// File to write. Prints to stdout when missing
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn build_cmd(args: BuildArgs) -> Result<()> {
    let config = open_config(&args)?;

    if let Err(err) = configure_logger(config.log.as_ref()) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let site = config.resolve().context("Could not resolve the site directories")?;
    info!("Building {} from {}", site.site_url, site.root_dir.display());

    match build_site(&site) {
        Ok(report) => {
            info!("Build finished: {}", report);
            Ok(())
        }
        Err(err) => {
            error!("Build failed: {}", err);
            Err(err.into())
        }
    }
}

fn main() -> Result<()> {
    match Args::parse() {
        Args::Build(args) => build_cmd(args),
        Args::SampleConfig(args) => {
            write_sample_cfg(args.out.as_deref()).context("Error writing sample configuration")
        }
    }
}
