use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Site {
    pub url: String,
    pub title: String,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            url: "http://localhost".to_string(),
            title: String::new(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Paths {
    pub root_dir: PathBuf,
    pub source_dir: PathBuf,
    pub snippets_dir: PathBuf,
    /// Defaults to the root directory
    pub publish_dir: Option<PathBuf>,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            root_dir: PathBuf::from("."),
            source_dir: PathBuf::from("src"),
            snippets_dir: PathBuf::from("snippets"),
            publish_dir: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Build {
    pub include_drafts: bool,
    pub header_snippet: String,
    pub footer_snippet: String,
}

impl Default for Build {
    fn default() -> Self {
        Build {
            include_drafts: false,
            header_snippet: "header".to_string(),
            footer_snippet: "footer".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub build: Build,
    pub log: Option<Log>,
}

/// Fully resolved settings handed to every stage of a build.
///
/// All directories are absolute, so the build never depends on the
/// process working directory once this value exists.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site_url: String,
    pub site_title: String,
    pub root_dir: PathBuf,
    pub source_dir: PathBuf,
    pub snippets_dir: PathBuf,
    pub publish_dir: PathBuf,
    pub include_drafts: bool,
    pub header_snippet: String,
    pub footer_snippet: String,
}

impl SiteConfig {
    /// Settings for a site laid out the default way under `root_dir`.
    pub fn with_root(root_dir: &Path, site_url: &str) -> SiteConfig {
        SiteConfig {
            site_url: site_url.to_string(),
            site_title: String::new(),
            root_dir: root_dir.to_path_buf(),
            source_dir: root_dir.join("src"),
            snippets_dir: root_dir.join("snippets"),
            publish_dir: root_dir.to_path_buf(),
            include_drafts: false,
            header_snippet: "header".to_string(),
            footer_snippet: "footer".to_string(),
        }
    }
}

impl Config {
    pub fn resolve(&self) -> io::Result<SiteConfig> {
        let root_dir = parse_path(&self.paths.root_dir)?;
        let root_dir = if root_dir.is_absolute() {
            root_dir
        } else {
            env::current_dir()?.join(root_dir)
        };

        let under_root = |path: &Path| -> io::Result<PathBuf> {
            let path = parse_path(path)?;
            Ok(if path.is_absolute() { path } else { root_dir.join(path) })
        };

        let publish_dir = match self.paths.publish_dir {
            Some(ref dir) => under_root(dir.as_path())?,
            None => root_dir.clone(),
        };

        Ok(SiteConfig {
            site_url: self.site.url.clone(),
            site_title: self.site.title.clone(),
            source_dir: under_root(self.paths.source_dir.as_path())?,
            snippets_dir: under_root(self.paths.snippets_dir.as_path())?,
            publish_dir,
            root_dir,
            include_drafts: self.build.include_drafts,
            header_snippet: self.build.header_snippet.clone(),
            footer_snippet: self.build.footer_snippet.clone(),
        })
    }
}

fn parse_path(path: &Path) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path.to_path_buf());
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent().ok_or_else(|| {
        io::Error::new(ErrorKind::NotFound, "Executable has no parent directory")
    })?;
    let rest = path.strip_prefix("${exe_dir}").unwrap_or(path);
    Ok(exe_dir.join(rest))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    toml::from_str::<Config>(cfg_content).map_err(|e| {
        io::Error::new(ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))
    })
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
