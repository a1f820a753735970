use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use ramhorns::{Ramhorns, Template};
use spdlog::debug;
use walkdir::WalkDir;

use crate::error::{BuildError, Result};
use crate::page::PageType;

/// A reusable template fragment, e.g. `header` or `footer`.
#[derive(Debug, Clone)]
pub struct Snippet {
    /// File name without its extension
    pub id: String,
    pub src_path: PathBuf,
    pub src: String,
}

/// All snippets of a site, keyed by id, plus their compiled templates.
///
/// Snippets reference each other as partials (`{{>nav}}`), and a page body
/// may do the same. Each page gets its own namespace from
/// [`SnippetStore::namespace`], so compiling one page never touches another.
pub struct SnippetStore {
    dir: PathBuf,
    snippets: BTreeMap<String, Snippet>,
    templates: Ramhorns,
}

impl SnippetStore {
    /// Loads every snippet under `dir`. A snippet that does not compile
    /// fails the whole load.
    pub fn load(dir: &Path) -> Result<SnippetStore> {
        let mut snippets = BTreeMap::new();

        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                BuildError::io(path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let recognized = path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(PageType::from_extension)
                .is_some();
            if !recognized {
                continue;
            }

            let Some(id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            let src = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;

            // Same id in another directory: last one wins
            snippets.insert(id.clone(), Snippet {
                id,
                src_path: path.to_path_buf(),
                src,
            });
        }

        let templates = compile_namespace(dir, &snippets)?;
        debug!("Loaded {} snippets from {}", snippets.len(), dir.display());

        Ok(SnippetStore {
            dir: dir.to_path_buf(),
            snippets,
            templates,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.snippets.get(id)
    }

    pub fn template(&self, id: &str) -> Option<&Template<'static>> {
        self.templates.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snippet> {
        self.snippets.values()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// A fresh namespace holding every snippet, ready for one page template.
    pub fn namespace(&self) -> Result<Ramhorns> {
        compile_namespace(&self.dir, &self.snippets)
    }
}

/// Compiles snippets into one namespace. A snippet can only be inserted once
/// the partials it uses are present, so inserting repeats until nothing is
/// left or a whole pass makes no progress (syntax error, unknown or cyclic
/// partial).
fn compile_namespace(dir: &Path, snippets: &BTreeMap<String, Snippet>) -> Result<Ramhorns> {
    for snippet in snippets.values() {
        check_sections(&snippet.src_path, &snippet.id, &snippet.src)?;
    }

    let mut namespace: Ramhorns = Ramhorns::lazy(dir).map_err(|e| {
        BuildError::io(dir, io::Error::other(e.to_string()))
    })?;

    let mut pending: Vec<&Snippet> = snippets.values().collect();
    while !pending.is_empty() {
        let mut failed = vec![];
        let mut first_error = None;

        for snippet in pending.iter().copied() {
            if let Err(e) = namespace.insert(snippet.src.clone(), snippet.id.clone()) {
                first_error.get_or_insert((snippet, e));
                failed.push(snippet);
            }
        }

        if failed.len() == pending.len() {
            if let Some((snippet, e)) = first_error {
                return Err(BuildError::TemplateCompile {
                    path: snippet.src_path.clone(),
                    name: snippet.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
        pending = failed;
    }

    Ok(namespace)
}

/// Fails on a `{{#name}}` or `{{^name}}` that is never closed. Ramhorns
/// rejects mismatched and stray closing tags but accepts a section left open
/// at the end of the source.
pub(crate) fn check_sections(path: &Path, name: &str, src: &str) -> Result<()> {
    match unclosed_section(src) {
        None => Ok(()),
        Some(section) => Err(BuildError::TemplateCompile {
            path: path.to_path_buf(),
            name: name.to_string(),
            reason: format!("section '{}' is never closed", section),
        }),
    }
}

/// Outermost section still open once `src` ends.
fn unclosed_section(src: &str) -> Option<&str> {
    let mut open: Vec<&str> = vec![];
    let mut rest = src;

    while let Some(start) = rest.find("{{") {
        let tag = &rest[start + 2..];
        // unterminated tag, the parser reports it
        let Some(end) = tag.find("}}") else {
            break;
        };
        let inner = &tag[..end];
        match inner.chars().next() {
            Some('#') | Some('^') => open.extend(inner[1..].split_whitespace()),
            Some('/') => {
                for _ in inner[1..].split_whitespace() {
                    open.pop();
                }
            }
            _ => {}
        }
        rest = &tag[end + 2..];
    }

    open.first().copied()
}
