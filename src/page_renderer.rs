use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, FixedOffset};
use ramhorns::{Content, Template};
use spdlog::debug;

use crate::config::SiteConfig;
use crate::error::{BuildError, Result};
use crate::page::{Page, PageType};
use crate::site_index::{SortedPages, TagIndex};
use crate::snippet::{check_sections, SnippetStore};
use crate::text_utils::{format_date_time, permalink};

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct PageView<'a> {
    id: &'a str,
    title: &'a str,
    summary: &'a str,
    tags: Vec<ViewTag<'a>>,
    pubdate: &'a str,
    date: String,
    time: String,
    date_rfc3339: String,
    draft: bool,
    src_rel: &'a str,
    pub_rel: &'a str,
    dir: &'a str,
    kind: &'static str,
    url: String,
}

impl<'a> PageView<'a> {
    fn new(page: &'a Page, site_url: &str) -> PageView<'a> {
        let (date, time) = format_date_time(&page.date);
        PageView {
            id: &page.id,
            title: &page.title,
            summary: &page.summary,
            tags: page.tags.iter().map(|t| ViewTag { tag: t }).collect(),
            pubdate: &page.pub_date,
            date,
            time,
            date_rfc3339: page.date.to_rfc3339(),
            draft: page.draft,
            src_rel: &page.src_rel,
            pub_rel: &page.pub_rel,
            dir: &page.dir,
            kind: page.page_type.as_str(),
            url: permalink(site_url, &page.pub_rel),
        }
    }
}

#[derive(ramhorns::Content)]
struct ConfigView<'a> {
    site_url: &'a str,
    site_title: &'a str,
    source_dir: String,
    snippets_dir: String,
}

#[derive(ramhorns::Content)]
struct SnippetView<'a> {
    id: &'a str,
    src_path: String,
}

#[derive(ramhorns::Content)]
struct TagEntry<'a> {
    name: &'a str,
    count: u32,
    pages: Vec<&'a PageView<'a>>,
}

/// What every template sees while a page renders.
#[derive(ramhorns::Content)]
struct RenderContext<'a> {
    page: &'a PageView<'a>,
    config: &'a ConfigView<'a>,
    snippets: &'a BTreeMap<String, SnippetView<'a>>,
    pages: &'a Vec<PageView<'a>>,
    tag_index: &'a BTreeMap<String, Vec<&'a PageView<'a>>>,
    /// `tag_index` as a list, mustache cannot walk map keys
    tags: &'a Vec<TagEntry<'a>>,
    now: &'a str,
    now_year: i64,
}

/// A page rendered in memory, not yet written.
#[derive(Debug)]
pub struct RenderedPage {
    pub id: String,
    pub src_path: PathBuf,
    pub pub_path: PathBuf,
    pub output: String,
}

impl RenderedPage {
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.pub_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::write(&self.pub_path, &self.output).map_err(|e| BuildError::io(&self.pub_path, e))
    }
}

pub struct PageRenderer<'a> {
    pub config: &'a SiteConfig,
    pub snippets: &'a SnippetStore,
}

impl PageRenderer<'_> {
    /// Renders every page against the same site data. Stops at the first
    /// page that fails; nothing is written here.
    pub fn render_all(&self, pages: &SortedPages, index: &TagIndex, now: DateTime<FixedOffset>) -> Result<Vec<RenderedPage>> {
        let views: Vec<PageView> = pages.iter()
            .map(|p| PageView::new(p, &self.config.site_url))
            .collect();

        let tag_index: BTreeMap<String, Vec<&PageView>> = index.iter()
            .map(|(tag, positions)| (tag.to_string(), positions.iter().map(|&pos| &views[pos]).collect()))
            .collect();

        let tags: Vec<TagEntry> = index.iter()
            .map(|(tag, positions)| TagEntry {
                name: tag,
                count: positions.len() as u32,
                pages: positions.iter().map(|&pos| &views[pos]).collect(),
            })
            .collect();

        let config = ConfigView {
            site_url: &self.config.site_url,
            site_title: &self.config.site_title,
            source_dir: self.config.source_dir.display().to_string(),
            snippets_dir: self.config.snippets_dir.display().to_string(),
        };

        let snippets: BTreeMap<String, SnippetView> = self.snippets.iter()
            .map(|s| (s.id.clone(), SnippetView {
                id: &s.id,
                src_path: s.src_path.display().to_string(),
            }))
            .collect();

        let now_str = now.to_rfc3339();

        let mut rendered = Vec::with_capacity(pages.len());
        for (page, view) in pages.iter().zip(&views) {
            let context = RenderContext {
                page: view,
                config: &config,
                snippets: &snippets,
                pages: &views,
                tag_index: &tag_index,
                tags: &tags,
                now: &now_str,
                now_year: now.year() as i64,
            };
            rendered.push(self.render_page(page, &context)?);
            debug!("Rendered {} -> {}", page.src_rel, page.pub_rel);
        }

        Ok(rendered)
    }

    /// header + page body + footer, all against `context`, then converted
    /// according to the page type.
    pub fn render_page<C: Content>(&self, page: &Page, context: &C) -> Result<RenderedPage> {
        check_sections(&page.src_path, &page.id, &page.body)?;
        let mut namespace = self.snippets.namespace()?;
        let name = format!("page:{}", page.src_rel);
        namespace.insert(page.body.clone(), name.clone()).map_err(|e| BuildError::TemplateCompile {
            path: page.src_path.clone(),
            name: page.id.clone(),
            reason: e.to_string(),
        })?;
        let body = namespace.get(&name).ok_or_else(|| BuildError::TemplateCompile {
            path: page.src_path.clone(),
            name: page.id.clone(),
            reason: "template missing after compilation".to_string(),
        })?;

        let header = self.snippet_template(&self.config.header_snippet, page)?;
        let footer = self.snippet_template(&self.config.footer_snippet, page)?;

        let mut buf = render_untrimmed(header, context);
        buf.push_str(&render_untrimmed(body, context));
        buf.push_str(&render_untrimmed(footer, context));

        Ok(RenderedPage {
            id: page.id.clone(),
            src_path: page.src_path.clone(),
            pub_path: page.pub_path.clone(),
            output: publish_output(page.page_type, buf),
        })
    }

    fn snippet_template(&self, id: &str, page: &Page) -> Result<&Template<'static>> {
        self.snippets.template(id).ok_or_else(|| BuildError::TemplateRuntime {
            path: page.src_path.clone(),
            name: id.to_string(),
            reason: format!("snippet '{}' not found in {}", id, self.config.snippets_dir.display()),
        })
    }
}

/// Compiling drops trailing whitespace from a template; this puts it back.
/// A partial expanded inside a template still renders trimmed.
fn render_untrimmed<C: Content>(template: &Template, context: &C) -> String {
    let mut out = template.render(context);
    let src = template.source();
    out.push_str(&src[src.trim_end().len()..]);
    out
}

/// Markdown runs over the whole buffer, header and footer included, so
/// markup coming from those snippets is escaped on markdown pages.
fn publish_output(page_type: PageType, buf: String) -> String {
    match page_type {
        PageType::Txt | PageType::Html | PageType::Xml => buf,
        PageType::Md => markdown::to_html(&buf),
    }
}
