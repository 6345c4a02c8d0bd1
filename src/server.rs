/// LSP server trait implementation.
///
/// This module contains the `impl LanguageServer for Backend` block: the
/// lifecycle requests, full-text document sync, `textDocument/definition`
/// and the explicit `railsGoto.goToDefinition` command.
use serde_json::Value;
use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;

use crate::{Backend, GOTO_DEFINITION_COMMAND};

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Only the first workspace folder is used; `rootUri` covers clients
        // that predate workspace folders.
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|folder| folder.uri.to_file_path().ok())
            .or_else(|| {
                params
                    .root_uri
                    .as_ref()
                    .and_then(|uri| uri.to_file_path().ok())
            });

        self.set_workspace_root(workspace_root);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                definition_provider: Some(OneOf::Left(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![GOTO_DEFINITION_COMMAND.to_string()],
                    work_done_progress_options: WorkDoneProgressOptions {
                        work_done_progress: None,
                    },
                }),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let message = match self.workspace_root() {
            Some(root) => format!("RailsGoto initialized for {}", root.display()),
            None => "RailsGoto initialized without a workspace folder".to_string(),
        };
        tracing::info!("{message}");
        self.log(MessageType::INFO, message).await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let uri = doc.uri.to_string();
        self.open_files.lock().insert(uri.clone(), doc.text);
        tracing::debug!(%uri, "opened document");
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        // Full sync: the last change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().last() {
            self.open_files.lock().insert(uri, change.text);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        self.open_files.lock().remove(&uri);
        tracing::debug!(%uri, "closed document");
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params
            .text_document_position_params
            .text_document
            .uri
            .to_string();
        let position = params.text_document_position_params.position;

        Ok(self
            .resolve_definition_for_uri(&uri, position)
            .map(GotoDefinitionResponse::Scalar))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command != GOTO_DEFINITION_COMMAND {
            return Err(Error::invalid_params(format!(
                "unknown command: {}",
                params.command
            )));
        }

        let (uri, position) = parse_command_arguments(params.arguments)?;
        match self.resolve_definition_for_uri(uri.as_str(), position) {
            Some(location) => serde_json::to_value(location)
                .map(Some)
                .map_err(|err| Error::invalid_params(err.to_string())),
            None => {
                self.notify(MessageType::INFO, "No definition found").await;
                Ok(None)
            }
        }
    }
}

/// Accepts either `[TextDocumentPositionParams]` or `[uri, position]`.
fn parse_command_arguments(arguments: Vec<Value>) -> Result<(Url, Position)> {
    let invalid = || {
        Error::invalid_params(format!(
            "{GOTO_DEFINITION_COMMAND} expects [textDocumentPosition] or [uri, position]"
        ))
    };

    let mut args = arguments.into_iter();
    match (args.next(), args.next()) {
        (Some(single), None) => {
            let params: TextDocumentPositionParams =
                serde_json::from_value(single).map_err(|_| invalid())?;
            Ok((params.text_document.uri, params.position))
        }
        (Some(uri), Some(position)) => {
            let uri: Url = serde_json::from_value(uri).map_err(|_| invalid())?;
            let position: Position = serde_json::from_value(position).map_err(|_| invalid())?;
            Ok((uri, position))
        }
        _ => Err(invalid()),
    }
}
