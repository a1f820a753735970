use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};

/// How a page is published. Decided by the source file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageType {
    Txt,
    Html,
    Xml,
    Md,
}

impl PageType {
    pub const EXTENSIONS: [&'static str; 4] = ["md", "html", "txt", "xml"];

    pub fn from_extension(ext: &str) -> Option<PageType> {
        match ext {
            "txt" => Some(PageType::Txt),
            "html" => Some(PageType::Html),
            "xml" => Some(PageType::Xml),
            "md" => Some(PageType::Md),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Txt => "txt",
            PageType::Html => "html",
            PageType::Xml => "xml",
            PageType::Md => "md",
        }
    }

    /// Markdown is converted to HTML, everything else keeps its extension.
    pub fn publish_extension(&self) -> &'static str {
        match self {
            PageType::Md => "html",
            other => other.as_str(),
        }
    }
}

impl Display for PageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One source document with its metadata and derived paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Permalink slug, also the published file name
    pub id: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    /// `pubdate` as written in the metadata block
    pub pub_date: String,
    pub date: DateTime<FixedOffset>,
    pub draft: bool,
    pub src_path: PathBuf,
    /// e.g. `/post/hello.md`
    pub src_rel: String,
    pub pub_path: PathBuf,
    /// e.g. `/post/hello-world.html`
    pub pub_rel: String,
    /// `post` for pages under `src/post`, `/` for the source root
    pub dir: String,
    pub page_type: PageType,
    /// Template source, not yet rendered
    pub body: String,
}

impl Display for Page {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, date={}, type={}, src={}, pub={}",
               self.id,
               self.date.to_rfc3339(),
               self.page_type,
               self.src_rel,
               self.pub_rel,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_types() {
        for ext in PageType::EXTENSIONS {
            let page_type = PageType::from_extension(ext).unwrap();
            assert_eq!(page_type.as_str(), ext);
        }
        assert_eq!(PageType::from_extension("json"), None);
        assert_eq!(PageType::from_extension("MD"), None);
    }

    #[test]
    fn test_publish_extension() {
        assert_eq!(PageType::Md.publish_extension(), "html");
        assert_eq!(PageType::Html.publish_extension(), "html");
        assert_eq!(PageType::Xml.publish_extension(), "xml");
        assert_eq!(PageType::Txt.publish_extension(), "txt");
    }
}
