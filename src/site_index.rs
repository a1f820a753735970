use std::collections::BTreeMap;
use std::ops::Deref;

use crate::page::Page;

/// The page collection in publication order, newest first.
///
/// Only [`SortedPages::sort`] creates one, and [`TagIndex::build`] only
/// accepts this type, so every tag bucket inherits the chronological order.
#[derive(Debug, Clone, Default)]
pub struct SortedPages(Vec<Page>);

impl SortedPages {
    /// Stable: pages with equal dates keep their load order.
    pub fn sort(mut pages: Vec<Page>) -> SortedPages {
        pages.sort_by(|a, b| b.date.cmp(&a.date));
        SortedPages(pages)
    }

    pub fn into_inner(self) -> Vec<Page> {
        self.0
    }
}

impl Deref for SortedPages {
    type Target = [Page];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Tag to pages carrying it. Buckets hold positions into the sorted
/// collection.
#[derive(Debug)]
pub struct TagIndex<'a> {
    pages: &'a SortedPages,
    buckets: BTreeMap<String, Vec<usize>>,
}

impl<'a> TagIndex<'a> {
    pub fn build(pages: &'a SortedPages) -> TagIndex<'a> {
        let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (pos, page) in pages.iter().enumerate() {
            for tag in &page.tags {
                let bucket = buckets.entry(tag.clone()).or_default();
                // a tag listed twice on one page
                if bucket.last() != Some(&pos) {
                    bucket.push(pos);
                }
            }
        }
        TagIndex { pages, buckets }
    }

    pub fn pages(&self, tag: &str) -> impl Iterator<Item = &'a Page> + '_ {
        let pages: &'a [Page] = self.pages;
        self.positions(tag).iter().map(move |&pos| &pages[pos])
    }

    pub fn positions(&self, tag: &str) -> &[usize] {
        self.buckets.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tags in name order with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.buckets.iter().map(|(tag, bucket)| (tag.as_str(), bucket.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::page::PageType;
    use crate::text_utils::parse_pub_date;

    use super::*;

    fn page(id: &str, pubdate: &str, tags: &[&str]) -> Page {
        Page {
            id: id.to_string(),
            title: String::new(),
            summary: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            pub_date: pubdate.to_string(),
            date: parse_pub_date(pubdate).unwrap(),
            draft: false,
            src_path: PathBuf::from(format!("/blog/src/{id}.md")),
            src_rel: format!("/{id}.md"),
            pub_path: PathBuf::from(format!("/blog/{id}.html")),
            pub_rel: format!("/{id}.html"),
            dir: "/".to_string(),
            page_type: PageType::Md,
            body: String::new(),
        }
    }

    fn ids<'a>(pages: impl Iterator<Item = &'a Page>) -> Vec<&'a str> {
        pages.map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_sort_is_stable_newest_first() {
        let sorted = SortedPages::sort(vec![
            page("first", "2020-01-01T00:00:00Z", &[]),
            page("newest", "2021-06-01T00:00:00Z", &[]),
            page("second", "2020-01-01T00:00:00Z", &[]),
        ]);
        assert_eq!(ids(sorted.iter()), ["newest", "first", "second"]);
    }

    #[test]
    fn test_sort_compares_instants() {
        // 01:00+02:00 is 23:00Z the day before
        let sorted = SortedPages::sort(vec![
            page("east", "2020-01-02T01:00:00+02:00", &[]),
            page("utc", "2020-01-02T00:00:00Z", &[]),
        ]);
        assert_eq!(ids(sorted.iter()), ["utc", "east"]);
    }

    #[test]
    fn test_tag_index() {
        let sorted = SortedPages::sort(vec![
            page("a", "2023-01-01T00:00:00Z", &["go"]),
            page("b", "2023-06-01T00:00:00Z", &["go", "blog"]),
            page("c", "2022-03-01T00:00:00Z", &["rust", "go", "rust"]),
        ]);
        let index = TagIndex::build(&sorted);

        assert_eq!(index.len(), 3);
        assert_eq!(ids(index.pages("go")), ["b", "a", "c"]);
        assert_eq!(ids(index.pages("blog")), ["b"]);
        assert_eq!(ids(index.pages("rust")), ["c"]);
        assert_eq!(ids(index.pages("missing")), Vec::<&str>::new());

        let tags: Vec<_> = index.iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, ["blog", "go", "rust"]);
    }

    #[test]
    fn test_tag_index_is_complete_and_ordered() {
        let sorted = SortedPages::sort(vec![
            page("p1", "2019-05-01T00:00:00Z", &["x", "y"]),
            page("p2", "2021-05-01T00:00:00Z", &["y"]),
            page("p3", "2020-05-01T00:00:00Z", &["x", "z"]),
            page("p4", "2021-05-01T00:00:00Z", &["z", "x"]),
        ]);
        let index = TagIndex::build(&sorted);

        for (pos, page) in sorted.iter().enumerate() {
            for tag in &page.tags {
                assert!(index.positions(tag).contains(&pos));
            }
        }
        for (_, bucket) in index.iter() {
            assert!(bucket.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_empty() {
        let sorted = SortedPages::sort(vec![]);
        let index = TagIndex::build(&sorted);
        assert!(sorted.is_empty());
        assert!(index.is_empty());
    }
}
