/// Small path helpers shared by the LSP host and the category resolvers.
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tower_lsp::lsp_types::Url;

static CONTROLLER_PATH: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"/controllers/(.+)_controller\.rb$").ok());

/// `…/app/controllers/admin/posts_controller.rb` → `admin/posts`.
///
/// Returns `None` when the path is not a controller file.
pub fn controller_name_from_path(path: &Path) -> Option<String> {
    let normalised = path.to_string_lossy().replace('\\', "/");
    let re = CONTROLLER_PATH.as_ref()?;
    re.captures(&normalised)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Turn a document URI string into a filesystem path. Non-`file` URIs
/// (untitled buffers and the like) yield `None`.
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    Url::parse(uri).ok()?.to_file_path().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_name_keeps_namespace_dirs() {
        let path = Path::new("/app/app/controllers/admin/posts_controller.rb");
        assert_eq!(controller_name_from_path(path).as_deref(), Some("admin/posts"));
    }

    #[test]
    fn non_controller_paths_have_no_name() {
        assert!(controller_name_from_path(Path::new("/app/app/models/post.rb")).is_none());
    }

    #[test]
    fn untitled_uris_have_no_path() {
        assert!(uri_to_path("untitled:Untitled-1").is_none());
    }
}
