//! Data types shared by the classifier, the search engine and the category
//! resolvers.
//!
//! Everything here is created and dropped within a single resolution call.

use std::fmt;
use std::path::PathBuf;

use tower_lsp::lsp_types::{Location, Position, Range, Url};

/// The kind of Rails construct a line of source refers to.
///
/// Variants are listed in the order the classifier tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceCategory {
    /// `FooService`, `service: :foo`
    Service,
    /// `PostsController`, `controller: "posts"`
    Controller,
    /// `ReportsHelper`, `helper :reports`
    Helper,
    /// `UserMailer`, `Admin::DigestMailer`
    Mailer,
    /// `render partial: "form"`, `render :edit`
    View,
    /// `before_save :normalize_name`
    Callback,
    /// `belongs_to :author`, `Post.find`
    Model,
    /// Anything else: a method defined next to the reference.
    GenericMethod,
}

impl ReferenceCategory {
    /// The order [`crate::classifier::classify`] tries categories in.
    /// `GenericMethod` is the fallback and is not listed.
    pub const PRIORITY: [ReferenceCategory; 7] = [
        Self::Service,
        Self::Controller,
        Self::Helper,
        Self::Mailer,
        Self::View,
        Self::Callback,
        Self::Model,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Controller => "controller",
            Self::Helper => "helper",
            Self::Mailer => "mailer",
            Self::View => "view",
            Self::Callback => "callback",
            Self::Model => "model",
            Self::GenericMethod => "method",
        }
    }
}

impl fmt::Display for ReferenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The symbol under the cursor together with the line it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    /// The identifier token under the cursor (e.g. `"ReportsHelper"`).
    pub word: String,
    /// The full text of the cursor's line.
    pub line: String,
    /// The cursor column (in characters) within `line`.
    pub cursor_column: u32,
    /// `::`-separated qualifiers written before `word`, e.g. `["Admin"]` for
    /// `Admin::ReportsHelper`. Empty when unqualified.
    pub namespace_path: Vec<String>,
}

impl SourceReference {
    /// The word with its namespace qualifiers, e.g. `"Admin::ReportsHelper"`.
    pub fn qualified_name(&self) -> String {
        if self.namespace_path.is_empty() {
            self.word.clone()
        } else {
            format!("{}::{}", self.namespace_path.join("::"), self.word)
        }
    }
}

/// A position inside a target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub file_path: PathBuf,
    /// 0-based line in the target file.
    pub line: u32,
    /// 0-based column in the target file.
    pub column: u32,
}

impl ResolvedLocation {
    pub fn new(file_path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
        }
    }

    /// The top of a file, used when a file matches but no exact line does.
    pub fn file_start(file_path: impl Into<PathBuf>) -> Self {
        Self::new(file_path, 0, 0)
    }

    /// Convert to an LSP location with a zero-width range.
    ///
    /// Returns `None` when the path cannot be expressed as a `file://` URL
    /// (relative paths).
    pub fn to_lsp_location(&self) -> Option<Location> {
        let uri = Url::from_file_path(&self.file_path).ok()?;
        let position = Position {
            line: self.line,
            character: self.column,
        };
        Some(Location {
            uri,
            range: Range {
                start: position,
                end: position,
            },
        })
    }
}
