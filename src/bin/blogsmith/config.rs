use std::env;
use std::path::PathBuf;

use anyhow::Result;

use blogsmith::config::{read_config, Config};

use crate::{BuildArgs, CFG_FILE_NAME};

fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let cur_dir = env::current_dir().ok();
    let cfg_dir = dirs::config_dir().map(|dir| dir.join("blogsmith"));

    [exe_dir, cur_dir, cfg_dir]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Configuration file (if any) with the command line on top.
pub(crate) fn open_config(args: &BuildArgs) -> Result<Config> {
    let config_path = args.config_path.clone().or_else(get_config_path);

    let mut config = match config_path {
        Some(path) => {
            println!("Reading config from {}", path.display());
            read_config(&path)?
        }
        None => {
            println!("No {} found, using defaults", CFG_FILE_NAME);
            Config::default()
        }
    };

    if let Some(ref root) = args.root {
        config.paths.root_dir = root.clone();
    }
    if let Some(ref site_url) = args.site_url {
        config.site.url = site_url.clone();
    }
    if let Some(ref source_dir) = args.source_dir {
        config.paths.source_dir = source_dir.clone();
    }
    if let Some(ref snippets_dir) = args.snippets_dir {
        config.paths.snippets_dir = snippets_dir.clone();
    }
    if let Some(ref publish_dir) = args.publish_dir {
        config.paths.publish_dir = Some(publish_dir.clone());
    }
    if args.drafts {
        config.build.include_drafts = true;
    }

    Ok(config)
}
