use std::fs;
use std::path::{Path, PathBuf};

use spdlog::debug;
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::error::{BuildError, Result};
use crate::metadata::{parse_front_matter, split_source};
use crate::page::{Page, PageType};
use crate::text_utils::parse_pub_date;

pub struct PageLoader<'a> {
    pub config: &'a SiteConfig,
}

impl PageLoader<'_> {
    /// Every file under the source directory with a page extension, in a
    /// stable (file name) order.
    pub fn retrieve_files(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.source_dir;
        let mut files = vec![];
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir.as_path()).to_path_buf();
                BuildError::io(path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if page_type_of(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Loads all pages. The first bad file aborts the load.
    pub fn load_all(&self) -> Result<Vec<Page>> {
        let files = self.retrieve_files()?;
        let mut pages = Vec::with_capacity(files.len());
        for file in files {
            let page = self.load_page(&file)?;
            debug!("Loaded page {}", page);
            pages.push(page);
        }
        Ok(pages)
    }

    pub fn load_page(&self, path: &Path) -> Result<Page> {
        let src = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        self.page_from_string(path, &src)
    }

    pub fn page_from_string(&self, path: &Path, src: &str) -> Result<Page> {
        let page_type = page_type_of(path).ok_or_else(|| BuildError::UnsupportedType {
            path: path.to_path_buf(),
            page_type: path.extension().map(|e| e.to_string_lossy().to_string()).unwrap_or_default(),
        })?;

        let parts = split_source(path, src)?;
        let front = parse_front_matter(path, parts.metadata)?;

        if front.id.trim().is_empty() {
            return Err(BuildError::MetadataValidation {
                path: path.to_path_buf(),
                reason: "id: is required".to_string(),
            });
        }
        // the id names the published file, it must stay in the page's directory
        if front.id.contains(['/', '\\']) || front.id == ".." {
            return Err(BuildError::MetadataValidation {
                path: path.to_path_buf(),
                reason: format!("id: '{}' must not contain path separators", front.id),
            });
        }

        let date = parse_pub_date(&front.pubdate).map_err(|e| BuildError::DateParse {
            path: path.to_path_buf(),
            value: front.pubdate.clone(),
            source: e,
        })?;

        let subdir = self.subdir_of(path);
        let file_name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let pub_name = format!("{}.{}", front.id, page_type.publish_extension());

        let src_rel = rel_path(&subdir, &file_name);
        let pub_rel = rel_path(&subdir, &pub_name);
        let pub_path = self.config.publish_dir.join(&subdir).join(&pub_name);
        let dir = if subdir.is_empty() { "/".to_string() } else { subdir };

        Ok(Page {
            id: front.id,
            title: front.title,
            summary: front.summary,
            tags: front.tags,
            pub_date: front.pubdate,
            date,
            draft: front.draft,
            src_path: path.to_path_buf(),
            src_rel,
            pub_path,
            pub_rel,
            dir,
            page_type,
            body: parts.body.to_string(),
        })
    }

    /// Directory of `path` relative to the source root, `/` separated, no
    /// leading or trailing slash.
    fn subdir_of(&self, path: &Path) -> String {
        let parent = path.parent().unwrap_or(Path::new(""));
        let rel = parent.strip_prefix(&self.config.source_dir).unwrap_or(parent);
        rel.components()
            .filter_map(|c| match c {
                std::path::Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn page_type_of(path: &Path) -> Option<PageType> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(PageType::from_extension)
}

fn rel_path(subdir: &str, file_name: &str) -> String {
    if subdir.is_empty() {
        format!("/{}", file_name)
    } else {
        format!("/{}/{}", subdir, file_name)
    }
}
