/// View and partial lookup for `render` calls.
///
/// The template name comes from the `render` call itself (`render "form"`,
/// `render partial: "shared/header"`, `render :edit`), falling back to the
/// word under the cursor. Partials get their leading underscore when the line
/// says `partial`. Lookup order:
///
///   1. `app/views/<controller>/<name>.html.erb` when the current file is a
///      controller,
///   2. a recursive scan of `app/views/` for `<name>.<ext>…`.
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ResolveError, Result};
use crate::search::find_files;
use crate::types::ResolvedLocation;
use crate::util::controller_name_from_path;

use super::Resolver;

static QUOTED_RENDER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"render\s*\(?\s*(?:partial\s*:\s*)?['"](.+?)['"]"#).ok()
});

static SYMBOL_RENDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"render\s*\(?\s*:(\w+)").ok());

impl Resolver<'_> {
    pub(super) fn find_view_definition(&self, word: &str, line: &str) -> Result<ResolvedLocation> {
        let views_dir = self.workspace_path(&["app", "views"])?;
        let partial = partial_name(word, line);
        tracing::debug!(%partial, "looking up view");

        if let Some(controller) = self.current_file().and_then(controller_name_from_path) {
            let scoped = views_dir.join(&controller).join(format!("{partial}.html.erb"));
            if scoped.is_file() {
                return Ok(ResolvedLocation::file_start(scoped));
            }
        }

        let (dir_part, name_part) = match partial.rsplit_once('/') {
            Some((dir, name)) => (dir, name),
            None => ("", partial.as_str()),
        };

        let extensions = self
            .config()
            .views
            .extensions
            .iter()
            .map(|ext| regex::escape(ext))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"^{}(?:\.\w+)*\.(?:{extensions})$", regex::escape(name_part));
        let file_re = Regex::new(&pattern).map_err(|_| ResolveError::NotFound(partial.clone()))?;

        let found = find_files(&views_dir, &self.config().search, move |name| {
            file_re.is_match(name)
        })
        .find(|path| {
            dir_part.is_empty() || path.parent().is_some_and(|p| p.ends_with(Path::new(dir_part)))
        });

        match found {
            Some(path) => Ok(ResolvedLocation::file_start(path)),
            None => Err(ResolveError::NotFound(partial.clone())),
        }
    }
}

/// The template name a `render` line refers to, with the partial underscore
/// applied to its last path segment.
pub(crate) fn partial_name(word: &str, line: &str) -> String {
    let from_line = QUOTED_RENDER
        .as_ref()
        .and_then(|re| re.captures(line))
        .or_else(|| SYMBOL_RENDER.as_ref().and_then(|re| re.captures(line)))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    let name = from_line.unwrap_or_else(|| word.to_string());

    if !line.contains("partial") {
        return name;
    }
    match name.rsplit_once('/') {
        Some((dir, file)) if !file.starts_with('_') => format!("{dir}/_{file}"),
        None if !name.starts_with('_') => format!("_{name}"),
        _ => name,
    }
}
