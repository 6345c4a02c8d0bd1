/// `def` lookup for callbacks (`before_save :normalize_name`) and plain
/// method calls.
///
/// The current document is searched first. From a controller, the
/// controller's own helper (`app/helpers/<name>_helper.rb`) is searched next.
use std::path::Path;

use regex::Regex;

use crate::error::{ResolveError, Result, read_source};
use crate::search::find_pattern_in_lines;
use crate::types::ResolvedLocation;
use crate::util::controller_name_from_path;

use super::Resolver;

impl Resolver<'_> {
    pub(super) fn find_method_definition(
        &self,
        name: &str,
        content: &str,
    ) -> Result<ResolvedLocation> {
        let not_found = || ResolveError::NotFound(name.to_string());
        let current = self.current_file().ok_or_else(not_found)?;
        let pattern = Regex::new(&format!(r"\bdef\s+(?:self\.)?{}\b", regex::escape(name)))
            .map_err(|_| not_found())?;

        if let Some((line, column)) = find_pattern_in_lines(content, &pattern) {
            return Ok(ResolvedLocation::new(current, line, column));
        }

        let helper = controller_name_from_path(current)
            .and_then(|controller| {
                let file_name = format!("{controller}_helper.rb");
                self.workspace_path(&["app", "helpers", file_name.as_str()]).ok()
            })
            .filter(|path| path.is_file());

        if let Some(helper) = helper {
            return find_method_in_file(&helper, &pattern).ok_or_else(not_found);
        }

        Err(not_found())
    }
}

fn find_method_in_file(path: &Path, pattern: &Regex) -> Option<ResolvedLocation> {
    let content = match read_source(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!("{err}");
            return None;
        }
    };
    find_pattern_in_lines(&content, pattern).map(|(line, column)| ResolvedLocation::new(path, line, column))
}
