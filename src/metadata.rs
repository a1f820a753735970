//! Splitting a source file into its YAML metadata block and template body.
//!
//! ```text
//! ---
//! id: why-i-wrote-this
//! title: Why I wrote this
//! tags: [rust, blog]
//! pubdate: 2023-06-01T00:00:00Z
//! ---
//! Body text, rendered as a template.
//! ```
//!
//! The closing delimiter is the first `---` after the opening one, so a
//! metadata block cannot contain `---` as data (for instance inside a quoted
//! title). Such a file is cut short at that point and usually fails later
//! as invalid YAML.

use std::path::Path;

use serde::Deserialize;

use crate::error::{BuildError, Result};

pub const DELIMITER: &str = "---";

/// Page attributes declared in the metadata block.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FrontMatter {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub tags: Vec<String>,
    pub pubdate: String,
    pub draft: bool,
}

/// The three regions of a source file, borrowed from the file contents.
#[derive(Debug, PartialEq)]
pub struct SourceParts<'a> {
    /// Text between the two delimiters
    pub metadata: &'a str,
    /// Line terminator following the closing delimiter, if any
    pub terminator: &'a str,
    pub body: &'a str,
}

impl SourceParts<'_> {
    /// Rebuilds the original file contents.
    pub fn reassemble(&self) -> String {
        format!("{DELIMITER}{}{DELIMITER}{}{}", self.metadata, self.terminator, self.body)
    }
}

pub fn split_source<'a>(path: &Path, src: &'a str) -> Result<SourceParts<'a>> {
    let Some(rest) = src.strip_prefix(DELIMITER) else {
        return Err(BuildError::MalformedSource {
            path: path.to_path_buf(),
            reason: format!("must have '{}' as the first 3 characters", DELIMITER),
        });
    };

    let Some(end) = rest.find(DELIMITER) else {
        return Err(BuildError::MalformedSource {
            path: path.to_path_buf(),
            reason: format!("closing '{}' of the metadata block not found", DELIMITER),
        });
    };

    let metadata = &rest[..end];
    let after = &rest[end + DELIMITER.len()..];
    let terminator_len = if after.starts_with("\r\n") {
        2
    } else if after.starts_with('\n') {
        1
    } else {
        0
    };

    Ok(SourceParts {
        metadata,
        terminator: &after[..terminator_len],
        body: &after[terminator_len..],
    })
}

pub fn parse_front_matter(path: &Path, metadata: &str) -> Result<FrontMatter> {
    if metadata.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    serde_yaml::from_str(metadata).map_err(|e| BuildError::MetadataValidation {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
