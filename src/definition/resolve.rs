/// The resolution facade.
///
/// A [`Resolver`] is built per request from the workspace root, the path of
/// the document being edited and the active [`Config`]. It owns nothing
/// mutable, so building one is cheap and two resolutions never share state.
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tower_lsp::lsp_types::Position;

use crate::classifier;
use crate::config::Config;
use crate::error::{ResolveError, Result};
use crate::types::{ReferenceCategory, ResolvedLocation, SourceReference};

use super::namespaced::ConstantKind;

/// A trailing `A::B::` immediately before the word.
static NAMESPACE_BEFORE_WORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\w+(?:::\w+)*)::$").ok());

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    workspace_root: Option<&'a Path>,
    current_file: Option<&'a Path>,
    config: &'a Config,
}

impl<'a> Resolver<'a> {
    pub fn new(
        workspace_root: Option<&'a Path>,
        current_file: Option<&'a Path>,
        config: &'a Config,
    ) -> Self {
        Self {
            workspace_root,
            current_file,
            config,
        }
    }

    /// Resolve the symbol at `position` in `content` (the text of the
    /// current document).
    ///
    /// Never fails: every error is logged and reported as `None`.
    pub fn resolve(&self, content: &str, position: Position) -> Option<ResolvedLocation> {
        let span = tracing::debug_span!(
            "resolve_definition",
            file = ?self.current_file,
            line = position.line,
            character = position.character,
        );
        let _entered = span.enter();

        let reference = Self::extract_reference(content, position)?;
        let category = classifier::classify(&reference.line);
        tracing::debug!(
            word = %reference.word,
            qualified = %reference.qualified_name(),
            %category,
            "classified reference"
        );

        match self.resolve_reference(&reference, category, content) {
            Ok(location) => {
                tracing::debug!(
                    path = %location.file_path.display(),
                    line = location.line,
                    "definition found"
                );
                Some(location)
            }
            Err(err) if err.is_expected() => {
                tracing::debug!("{err}");
                None
            }
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }

    /// Dispatch an already-classified reference to its category resolver,
    /// falling back to a method lookup in the current file.
    pub fn resolve_reference(
        &self,
        reference: &SourceReference,
        category: ReferenceCategory,
        content: &str,
    ) -> Result<ResolvedLocation> {
        let word = reference.word.as_str();
        let primary = match category {
            ReferenceCategory::Service => self.find_service_definition(word, &reference.namespace_path),
            ReferenceCategory::Controller => {
                self.find_controller_definition(word, &reference.namespace_path)
            }
            ReferenceCategory::Helper => {
                self.find_namespaced_definition(ConstantKind::Helper, &reference.qualified_name())
            }
            ReferenceCategory::Mailer => {
                self.find_namespaced_definition(ConstantKind::Mailer, &reference.qualified_name())
            }
            ReferenceCategory::View => self.find_view_definition(word, &reference.line),
            ReferenceCategory::Model => self.find_model_definition(word, &reference.namespace_path),
            ReferenceCategory::Callback | ReferenceCategory::GenericMethod => {
                return self.find_method_definition(word, content);
            }
        };

        primary.or_else(|err| {
            tracing::debug!(%category, "{err}; trying method definitions");
            self.find_method_definition(word, content)
        })
    }

    /// Extract the identifier under the cursor along with its line and
    /// namespace qualifiers.
    ///
    /// Returns `None` when the cursor is not on an identifier or is outside
    /// the document.
    pub fn extract_reference(content: &str, position: Position) -> Option<SourceReference> {
        let line = content.lines().nth(position.line as usize)?;
        let chars: Vec<char> = line.chars().collect();
        let pos = position.character as usize;
        if pos > chars.len() {
            return None;
        }

        let is_ident = |c: char| c.is_alphanumeric() || c == '_';

        let mut start = pos;
        while start > 0 && is_ident(chars[start - 1]) {
            start -= 1;
        }
        let mut end = pos;
        while end < chars.len() && is_ident(chars[end]) {
            end += 1;
        }
        if start == end {
            return None;
        }

        let word: String = chars[start..end].iter().collect();
        let before: String = chars[..start].iter().collect();
        let namespace_path = Self::namespace_before(&before)
            .or_else(|| Self::namespace_anywhere(line, &word))
            .map(|ns| {
                ns.split("::")
                    .filter(|segment| !segment.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Some(SourceReference {
            word,
            line: line.to_string(),
            cursor_column: position.character,
            namespace_path,
        })
    }

    fn namespace_before(before: &str) -> Option<String> {
        let re = NAMESPACE_BEFORE_WORD.as_ref()?;
        re.captures(before)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Anywhere on the line: `A::B::word` as a whole word.
    fn namespace_anywhere(line: &str, word: &str) -> Option<String> {
        let re = Regex::new(&format!(r"(\w+(?:::\w+)*)::{}\b", regex::escape(word))).ok()?;
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub(super) fn workspace_root(&self) -> Result<&'a Path> {
        self.workspace_root.ok_or(ResolveError::NoWorkspace)
    }

    pub(super) fn current_file(&self) -> Option<&'a Path> {
        self.current_file
    }

    pub(super) fn config(&self) -> &'a Config {
        self.config
    }

    /// `<root>/<segments…>`
    pub(super) fn workspace_path(&self, segments: &[&str]) -> Result<PathBuf> {
        let mut path = self.workspace_root()?.to_path_buf();
        path.extend(segments);
        Ok(path)
    }
}
