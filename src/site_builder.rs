use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, FixedOffset, Local};
use spdlog::info;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::page::Page;
use crate::page_loader::PageLoader;
use crate::page_renderer::PageRenderer;
use crate::site_index::{SortedPages, TagIndex};
use crate::snippet::SnippetStore;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildReport {
    pub pages_written: usize,
    pub drafts_skipped: usize,
    pub snippet_count: usize,
    pub tag_count: usize,
}

impl Display for BuildReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} pages written, {} drafts skipped, {} snippets, {} tags",
               self.pages_written,
               self.drafts_skipped,
               self.snippet_count,
               self.tag_count,
        )
    }
}

/// One complete build: snippets, pages, chronological sort, tag index,
/// render, write. Nothing is written unless every page rendered.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    build_site_at(config, Local::now().fixed_offset())
}

pub fn build_site_at(config: &SiteConfig, now: DateTime<FixedOffset>) -> Result<BuildReport> {
    info!("Loading snippets from {}", config.snippets_dir.display());
    let snippets = SnippetStore::load(&config.snippets_dir)?;

    info!("Loading pages from {}", config.source_dir.display());
    let pages = PageLoader { config }.load_all()?;
    let (pages, drafts_skipped) = filter_drafts(pages, config.include_drafts);
    if drafts_skipped > 0 {
        info!("Skipping {} draft pages", drafts_skipped);
    }

    let sorted = SortedPages::sort(pages);
    let index = TagIndex::build(&sorted);
    info!("Indexed {} pages under {} tags", sorted.len(), index.len());

    let renderer = PageRenderer { config, snippets: &snippets };
    let rendered = renderer.render_all(&sorted, &index, now)?;

    for page in &rendered {
        page.write()?;
    }
    info!("Published {} pages to {}", rendered.len(), config.publish_dir.display());

    Ok(BuildReport {
        pages_written: rendered.len(),
        drafts_skipped,
        snippet_count: snippets.len(),
        tag_count: index.len(),
    })
}

fn filter_drafts(pages: Vec<Page>, include_drafts: bool) -> (Vec<Page>, usize) {
    if include_drafts {
        return (pages, 0);
    }
    let total = pages.len();
    let published: Vec<Page> = pages.into_iter().filter(|p| !p.draft).collect();
    let skipped = total - published.len();
    (published, skipped)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use crate::error::BuildError;
    use crate::test_data::{write_file, FOOTER_SNIPPET, HEADER_SNIPPET, POST_A, POST_B};
    use crate::text_utils::parse_pub_date;

    use super::*;

    const TAG_LIST: &str = "---
id: tags
pubdate: 1999-01-01T00:00:00Z
---
{{#tags}}{{name}}={{#pages}}{{id}} {{/pages}};{{/tags}}";

    fn site(tmp: &TempDir) -> SiteConfig {
        let config = SiteConfig::with_root(tmp.path(), "http://example.com");
        write_file(&config.snippets_dir.join("header.html"), HEADER_SNIPPET);
        write_file(&config.snippets_dir.join("footer.html"), FOOTER_SNIPPET);
        config
    }

    fn build(config: &SiteConfig) -> Result<BuildReport> {
        build_site_at(config, parse_pub_date("2024-01-01T00:00:00Z").unwrap())
    }

    fn published_files(dir: &Path) -> Vec<String> {
        let mut files: Vec<String> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(dir).unwrap().display().to_string())
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_two_posts() {
        let tmp = TempDir::new().unwrap();
        let mut config = site(&tmp);
        config.publish_dir = tmp.path().join("public");
        write_file(&config.source_dir.join("a.md"), POST_A);
        write_file(&config.source_dir.join("b.md"), POST_B);
        write_file(&config.source_dir.join("tags.txt"), TAG_LIST);

        let report = build(&config).unwrap();
        assert_eq!(report, BuildReport {
            pages_written: 3,
            drafts_skipped: 0,
            snippet_count: 2,
            tag_count: 2,
        });

        assert_eq!(published_files(&config.publish_dir), ["a.html", "b.html", "tags.txt"]);

        let tags = fs::read_to_string(config.publish_dir.join("tags.txt")).unwrap();
        assert!(tags.contains("blog=b ;go=b a ;"));

        let a = fs::read_to_string(config.publish_dir.join("a.html")).unwrap();
        assert!(a.contains("<h1>First</h1>"));
    }

    #[test]
    fn test_published_next_to_sources_by_default() {
        let tmp = TempDir::new().unwrap();
        let config = site(&tmp);
        write_file(&config.source_dir.join("post/hello.md"), "---\nid: hello-world\npubdate: 2023-01-01T00:00:00Z\n---\nHi\n");

        build(&config).unwrap();
        assert!(tmp.path().join("post/hello-world.html").is_file());
    }

    #[test]
    fn test_drafts() {
        let tmp = TempDir::new().unwrap();
        let mut config = site(&tmp);
        config.publish_dir = tmp.path().join("public");
        write_file(&config.source_dir.join("a.md"), POST_A);
        write_file(&config.source_dir.join("wip.md"), "---\nid: wip\ntags: [secret]\ndraft: true\npubdate: 2024-01-01T00:00:00Z\n---\nWIP\n");

        let report = build(&config).unwrap();
        assert_eq!(report.pages_written, 1);
        assert_eq!(report.drafts_skipped, 1);
        assert_eq!(report.tag_count, 1);
        assert!(!config.publish_dir.join("wip.html").exists());

        config.include_drafts = true;
        let report = build(&config).unwrap();
        assert_eq!(report.pages_written, 2);
        assert!(config.publish_dir.join("wip.html").is_file());
    }

    #[test]
    fn test_missing_closing_delimiter_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut config = site(&tmp);
        config.publish_dir = tmp.path().join("public");
        write_file(&config.source_dir.join("a.md"), POST_A);
        write_file(&config.source_dir.join("b.md"), "---\nid: b\npubdate: 2023-06-01T00:00:00Z\n# no end\n");

        let err = build(&config).unwrap_err();
        assert!(matches!(err, BuildError::MalformedSource { .. }));
        assert_eq!(err.path(), &config.source_dir.join("b.md"));
        assert!(!config.publish_dir.exists());
    }

    #[test]
    fn test_missing_id_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut config = site(&tmp);
        config.publish_dir = tmp.path().join("public");
        write_file(&config.source_dir.join("a.md"), POST_A);
        write_file(&config.source_dir.join("c.md"), "---\ntitle: anonymous\npubdate: 2023-06-01T00:00:00Z\n---\nbody\n");

        let err = build(&config).unwrap_err();
        assert!(matches!(err, BuildError::MetadataValidation { .. }));
        assert!(!config.publish_dir.exists());
    }

    #[test]
    fn test_broken_snippet_stops_before_rendering() {
        let tmp = TempDir::new().unwrap();
        let mut config = site(&tmp);
        config.publish_dir = tmp.path().join("public");
        write_file(&config.snippets_dir.join("sidebar.html"), "{{#links}}unterminated");
        write_file(&config.source_dir.join("a.md"), POST_A);

        let err = build(&config).unwrap_err();
        assert!(matches!(err, BuildError::TemplateCompile { .. }));
        assert!(!config.publish_dir.exists());
    }

    #[test]
    fn test_render_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut config = site(&tmp);
        config.publish_dir = tmp.path().join("public");
        write_file(&config.source_dir.join("a.md"), POST_A);
        write_file(&config.source_dir.join("b.html"), "---\nid: b\npubdate: 2020-01-01T00:00:00Z\n---\n{{>no_such_snippet}}");

        let err = build(&config).unwrap_err();
        assert!(matches!(err, BuildError::TemplateCompile { .. }));
        assert!(!config.publish_dir.join("a.html").exists());
    }
}
