//! Error types for definition resolution.
//!
//! None of these ever reach an LSP client. The resolution facade logs them
//! and answers "no definition":
//!
//! - [`ResolveError::NoWorkspace`] and [`ResolveError::NotFound`] are the
//!   expected, everyday outcomes of a heuristic lookup.
//! - [`ResolveError::Io`] is raised for a single path; the search that hit it
//!   moves on to its next candidate.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for resolution helpers.
pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// No workspace folder was configured by the client.
    #[error("no workspace root is configured")]
    NoWorkspace,

    /// Every heuristic for the symbol was exhausted.
    #[error("no definition found for `{0}`")]
    NotFound(String),

    /// Reading a specific file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file exists but could not be parsed.
    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl ResolveError {
    /// Whether this error is an ordinary "nothing here" outcome rather than
    /// a failure worth a warning.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NoWorkspace | Self::NotFound(_))
    }
}

/// Read a file to a string, attaching the path to any I/O failure.
///
/// Invalid UTF-8 (Latin-1 comments, `# encoding:` magic comments) is
/// replaced with U+FFFD rather than rejected.
pub(crate) fn read_source(path: &std::path::Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}
