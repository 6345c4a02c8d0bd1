//! Go-to-definition for Ruby on Rails projects, driven by naming
//! conventions rather than a Ruby parser.
//!
//! The line under the cursor is classified (model relation, controller,
//! helper, mailer, service, `render` call, callback or plain method) and the
//! symbol is mapped onto the Rails directory layout to find its file.
//!
//! - [`classifier`]: line → [`ReferenceCategory`]
//! - [`inflection`]: singularize / snake_case / classify / namespace splitting
//! - [`search`]: directory walks and `module`/`class` declaration scans
//! - [`definition`]: the [`Resolver`] facade and per-category resolvers
//! - [`server`]: the `tower-lsp` front end
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tower_lsp::Client;
use tower_lsp::lsp_types::*;

pub mod classifier;
pub mod config;
pub mod definition;
pub mod error;
pub mod inflection;
pub mod search;
mod server;
pub mod types;
pub mod util;

pub use config::Config;
pub use definition::Resolver;
pub use types::{ReferenceCategory, ResolvedLocation, SourceReference};

/// Command identifier for the explicit "jump to definition" entry point.
pub const GOTO_DEFINITION_COMMAND: &str = "railsGoto.goToDefinition";

pub struct Backend {
    name: String,
    version: String,
    /// The first workspace folder the client reported.
    workspace_root: Mutex<Option<PathBuf>>,
    /// Latest full text of every open document, keyed by URI.
    open_files: Mutex<HashMap<String, String>>,
    config: Mutex<Config>,
    client: Option<Client>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client: Some(client),
            ..Self::new_test()
        }
    }

    /// A backend without a client, for driving the server from tests.
    pub fn new_test() -> Self {
        Self {
            name: "RailsGoto".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            workspace_root: Mutex::new(None),
            open_files: Mutex::new(HashMap::new()),
            config: Mutex::new(Config::default()),
            client: None,
        }
    }

    /// A client-less backend already rooted at `root`. Only the project's
    /// own config file is read.
    pub fn new_test_with_workspace(root: PathBuf) -> Self {
        let backend = Self::new_test();
        *backend.config.lock() = Config::load_project(&root);
        *backend.workspace_root.lock() = Some(root);
        backend
    }

    pub fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.lock().clone()
    }

    pub(crate) fn set_workspace_root(&self, root: Option<PathBuf>) {
        let config = Config::load(root.as_deref());
        *self.config.lock() = config;
        *self.workspace_root.lock() = root;
    }

    /// Text of an open document, or of the file on disk when the client
    /// has not opened it.
    pub fn document_content(&self, uri: &str) -> Option<String> {
        if let Some(text) = self.open_files.lock().get(uri).cloned() {
            return Some(text);
        }
        let path = util::uri_to_path(uri)?;
        match error::read_source(&path) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }

    /// Resolve the definition for the symbol at `position` in the document
    /// `uri` whose text is `content`.
    ///
    /// Shared state is cloned out before any filesystem access, so no lock
    /// is held while resolving.
    pub fn resolve_definition(&self, uri: &str, content: &str, position: Position) -> Option<Location> {
        let root = self.workspace_root();
        let config = self.config.lock().clone();
        let current_file = util::uri_to_path(uri);

        let resolver = Resolver::new(root.as_deref(), current_file.as_deref(), &config);
        resolver.resolve(content, position)?.to_lsp_location()
    }

    /// Resolve against the stored text of `uri`.
    pub fn resolve_definition_for_uri(&self, uri: &str, position: Position) -> Option<Location> {
        let content = self.document_content(uri)?;
        self.resolve_definition(uri, &content, position)
    }

    pub(crate) async fn log(&self, typ: MessageType, message: String) {
        if let Some(client) = &self.client {
            client.log_message(typ, message).await;
        }
    }

    pub(crate) async fn notify(&self, typ: MessageType, message: &str) {
        if let Some(client) = &self.client {
            client.show_message(typ, message).await;
        }
    }

    /// Whether the client currently has `uri` open.
    pub fn is_open(&self, uri: &str) -> bool {
        self.open_files.lock().contains_key(uri)
    }
}

/// Resolve a definition without an LSP session: `path` is read from disk
/// and used as the current document.
pub fn resolve_in_file(
    workspace_root: Option<&Path>,
    path: &Path,
    position: Position,
    config: &Config,
) -> Option<ResolvedLocation> {
    let content = match error::read_source(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!("{err}");
            return None;
        }
    };
    Resolver::new(workspace_root, Some(path), config).resolve(&content, position)
}
