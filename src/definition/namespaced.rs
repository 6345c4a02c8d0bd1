/// Helper and mailer lookup.
///
/// Helpers and mailers are often namespaced (`Admin::ReportsHelper`) and do
/// not always live at a predictable path, so they are found by scanning
/// file contents. Files are tried in tiers, stopping at the first match:
///
///   1. files under the kind's directory whose name mentions the base name
///      (`reports`) or the namespace (`admin`),
///   2. every other file under that directory,
///   3. the configured fallback directories (`lib`, `app/models`,
///      `app/controllers` by default), in order.
use std::path::PathBuf;

use crate::error::{ResolveError, Result};
use crate::inflection::{classify, split_namespace, strip_suffix, to_snake_case};
use crate::search::{find_definition_in_file, find_ruby_files};
use crate::types::ResolvedLocation;

use super::Resolver;

/// Which family of module/class is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    Helper,
    Mailer,
}

impl ConstantKind {
    /// The conventional constant suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Helper => "Helper",
            Self::Mailer => "Mailer",
        }
    }

    /// Directory under `app/` that holds this kind.
    pub fn directory(self) -> &'static str {
        match self {
            Self::Helper => "helpers",
            Self::Mailer => "mailers",
        }
    }
}

impl Resolver<'_> {
    pub(super) fn find_namespaced_definition(
        &self,
        kind: ConstantKind,
        qualified: &str,
    ) -> Result<ResolvedLocation> {
        let root = self.workspace_root()?;
        let (namespace, raw_leaf) = split_namespace(qualified);

        // `helper :reports` names the module by its file stem.
        let leaf = if raw_leaf.starts_with(|c: char| c.is_ascii_lowercase()) {
            format!("{}{}", classify(&raw_leaf), kind.suffix())
        } else {
            raw_leaf
        };

        let base_name = to_snake_case(strip_suffix(&leaf, kind.suffix()));
        let namespace_token = namespace.to_lowercase().replace("::", "_");
        tracing::debug!(
            kind = kind.directory(),
            %namespace,
            %leaf,
            %base_name,
            "searching namespaced constant"
        );

        let options = &self.config().search;
        let kind_dir = root.join("app").join(kind.directory());
        let files: Vec<PathBuf> = find_ruby_files(&kind_dir, options).collect();
        tracing::debug!(count = files.len(), dir = %kind_dir.display(), "collected candidate files");

        let (by_name, rest): (Vec<&PathBuf>, Vec<&PathBuf>) = files.iter().partition(|path| {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            file_name.contains(&base_name)
                || (!namespace_token.is_empty() && file_name.contains(&namespace_token))
        });

        let found = by_name
            .into_iter()
            .chain(rest)
            .find_map(|path| find_definition_in_file(path, &leaf, &namespace));
        if let Some(location) = found {
            return Ok(location);
        }

        for dir in &self.config().helpers.fallback_dirs {
            let fallback = root.join(dir);
            if !fallback.is_dir() {
                continue;
            }
            let found = find_ruby_files(&fallback, options)
                .find_map(|path| find_definition_in_file(&path, &leaf, &namespace));
            if let Some(location) = found {
                return Ok(location);
            }
        }

        Err(ResolveError::NotFound(qualified.to_string()))
    }
}
