/// Fixed-path lookups: models, controllers and services.
///
/// Each of these has exactly one conventional home (`app/models/post.rb`,
/// `app/controllers/posts_controller.rb`, `app/services/billing_service.rb`),
/// so resolution is a name transform followed by an existence check. When
/// the symbol is qualified (`Admin::PostsController`) the namespaced
/// directory (`app/controllers/admin/`) is tried before the flat one.
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{ResolveError, Result, read_source};
use crate::inflection::{classify, namespace_dir, singularize, strip_suffix, to_snake_case};
use crate::search::find_pattern_in_lines;
use crate::types::ResolvedLocation;

use super::Resolver;

impl Resolver<'_> {
    /// `belongs_to :author`, `has_many :comments`, `Post.find`.
    ///
    /// The singularized word is lowercased to form the file name; the
    /// snake_case form is tried as well so `BlogPost.find` reaches
    /// `blog_post.rb`.
    pub(super) fn find_model_definition(
        &self,
        word: &str,
        namespace: &[String],
    ) -> Result<ResolvedLocation> {
        let singular = singularize(word);
        let mut names = vec![singular.to_lowercase()];
        let snake = to_snake_case(&singular);
        if !names.contains(&snake) {
            names.push(snake);
        }

        for name in &names {
            let file_name = format!("{name}.rb");
            for path in self.convention_candidates(&["app", "models"], namespace, &file_name)? {
                if !path.is_file() {
                    continue;
                }
                match locate_class(&path, &classify(name)) {
                    Ok(location) => return Ok(location),
                    Err(err) => tracing::warn!("{err}"),
                }
            }
        }

        Err(ResolveError::NotFound(word.to_string()))
    }

    /// `PostsController`, `controller: "posts"`.
    pub(super) fn find_controller_definition(
        &self,
        word: &str,
        namespace: &[String],
    ) -> Result<ResolvedLocation> {
        let name = to_snake_case(strip_suffix(word, "Controller"));
        if name.is_empty() {
            return Err(ResolveError::NotFound(word.to_string()));
        }

        let file_name = format!("{name}_controller.rb");
        let class_name = format!("{}Controller", classify(&name));
        for path in self.convention_candidates(&["app", "controllers"], namespace, &file_name)? {
            if !path.is_file() {
                continue;
            }
            match locate_class(&path, &class_name) {
                Ok(location) => return Ok(location),
                Err(err) => tracing::warn!("{err}"),
            }
        }

        Err(ResolveError::NotFound(word.to_string()))
    }

    /// `BillingService.call`. Services get no content scan: the file start is
    /// the answer.
    pub(super) fn find_service_definition(
        &self,
        word: &str,
        namespace: &[String],
    ) -> Result<ResolvedLocation> {
        let name = to_snake_case(strip_suffix(word, "Service"));
        if name.is_empty() {
            return Err(ResolveError::NotFound(word.to_string()));
        }

        let file_name = format!("{name}_service.rb");
        self.convention_candidates(&["app", "services"], namespace, &file_name)?
            .into_iter()
            .find(|path| path.is_file())
            .map(ResolvedLocation::file_start)
            .ok_or_else(|| ResolveError::NotFound(word.to_string()))
    }

    /// `<root>/<base>/<namespace dir>/<file>` (when namespaced), then
    /// `<root>/<base>/<file>`.
    fn convention_candidates(
        &self,
        base: &[&str],
        namespace: &[String],
        file_name: &str,
    ) -> Result<Vec<PathBuf>> {
        let base_dir = self.workspace_path(base)?;
        let mut candidates = Vec::with_capacity(2);
        let ns_dir = namespace_dir(&namespace.join("::"));
        if !ns_dir.is_empty() {
            candidates.push(base_dir.join(&ns_dir).join(file_name));
        }
        candidates.push(base_dir.join(file_name));
        Ok(candidates)
    }
}

/// The line declaring `class <class_name>` (optionally written with a
/// namespace, `class Admin::Post`), or the top of the file.
fn locate_class(path: &Path, class_name: &str) -> Result<ResolvedLocation> {
    let content = read_source(path)?;
    let pattern = format!(r"\bclass\s+(?:\w+::)*{}\b", regex::escape(class_name));
    let position = Regex::new(&pattern)
        .ok()
        .and_then(|re| find_pattern_in_lines(&content, &re));

    Ok(match position {
        Some((line, column)) => ResolvedLocation::new(path, line, column),
        None => ResolvedLocation::file_start(path),
    })
}
