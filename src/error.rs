use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a build. Each variant names the file it came from.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Malformed source file {}: {reason}", path.display())]
    MalformedSource { path: PathBuf, reason: String },

    #[error("Invalid metadata in {}: {reason}", path.display())]
    MetadataValidation { path: PathBuf, reason: String },

    #[error("Unable to parse pubdate '{value}' in {}: {source}", path.display())]
    DateParse {
        path: PathBuf,
        value: String,
        source: chrono::ParseError,
    },

    #[error("Template '{name}' from {} failed to compile: {reason}", path.display())]
    TemplateCompile {
        path: PathBuf,
        name: String,
        reason: String,
    },

    #[error("Template '{name}' failed while rendering {}: {reason}", path.display())]
    TemplateRuntime {
        path: PathBuf,
        name: String,
        reason: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("BUG: page from file {} has invalid type '{page_type}'", path.display())]
    UnsupportedType { path: PathBuf, page_type: String },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// The file the error points at.
    pub fn path(&self) -> &PathBuf {
        match self {
            BuildError::MalformedSource { path, .. }
            | BuildError::MetadataValidation { path, .. }
            | BuildError::DateParse { path, .. }
            | BuildError::TemplateCompile { path, .. }
            | BuildError::TemplateRuntime { path, .. }
            | BuildError::Io { path, .. }
            | BuildError::UnsupportedType { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
