mod common;

use common::RailsWorkspace;
use rails_goto_lsp::{Backend, GOTO_DEFINITION_COMMAND};
use serde_json::json;
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

fn open_params(uri: &Url, text: &str) -> DidOpenTextDocumentParams {
    DidOpenTextDocumentParams {
        text_document: TextDocumentItem {
            uri: uri.clone(),
            language_id: "ruby".to_string(),
            version: 1,
            text: text.to_string(),
        },
    }
}

fn definition_params(uri: &Url, line: u32, character: u32) -> GotoDefinitionParams {
    GotoDefinitionParams {
        text_document_position_params: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            position: Position { line, character },
        },
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
    }
}

fn model_workspace() -> RailsWorkspace {
    RailsWorkspace::with_files(&[(
        "app/models/author.rb",
        "class Author < ApplicationRecord\nend\n",
    )])
}

#[tokio::test]
async fn test_initialize_server_info_and_capabilities() {
    let backend = Backend::new_test();
    let result = backend.initialize(InitializeParams::default()).await.unwrap();

    let server_info = result.server_info.expect("server_info should be present");
    assert_eq!(server_info.name, "RailsGoto");
    assert_eq!(server_info.version.as_deref(), Some(env!("CARGO_PKG_VERSION")));

    let caps = result.capabilities;
    assert_eq!(caps.definition_provider, Some(OneOf::Left(true)));
    let commands = caps.execute_command_provider.expect("commands").commands;
    assert_eq!(commands, vec![GOTO_DEFINITION_COMMAND.to_string()]);
}

#[tokio::test]
async fn test_initialize_uses_first_workspace_folder() {
    let first = RailsWorkspace::new();
    let second = RailsWorkspace::new();
    let backend = Backend::new_test();

    let folder = |ws: &RailsWorkspace| WorkspaceFolder {
        uri: Url::from_file_path(ws.root()).unwrap(),
        name: "app".to_string(),
    };
    let params = InitializeParams {
        workspace_folders: Some(vec![folder(&first), folder(&second)]),
        root_uri: Some(Url::from_file_path(second.root()).unwrap()),
        ..InitializeParams::default()
    };
    backend.initialize(params).await.unwrap();

    assert_eq!(backend.workspace_root().as_deref(), Some(first.root()));
}

#[tokio::test]
async fn test_initialize_falls_back_to_root_uri() {
    let ws = RailsWorkspace::new();
    let backend = Backend::new_test();
    let params = InitializeParams {
        root_uri: Some(Url::from_file_path(ws.root()).unwrap()),
        ..InitializeParams::default()
    };
    backend.initialize(params).await.unwrap();

    assert_eq!(backend.workspace_root().as_deref(), Some(ws.root()));
}

#[tokio::test]
async fn test_did_open_and_close_track_documents() {
    let backend = Backend::new_test();
    let uri = Url::parse("file:///app/models/post.rb").unwrap();

    backend.did_open(open_params(&uri, "class Post\nend\n")).await;
    assert!(backend.is_open(uri.as_str()));

    backend
        .did_close(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
        })
        .await;
    assert!(!backend.is_open(uri.as_str()));
}

#[tokio::test]
async fn test_goto_definition_on_open_document() {
    let ws = model_workspace();
    let backend = Backend::new_test_with_workspace(ws.root().to_path_buf());
    let uri = Url::from_file_path(ws.path("app/models/post.rb")).unwrap();

    backend
        .did_open(open_params(&uri, "class Post\n  belongs_to :author\nend\n"))
        .await;

    let response = backend
        .goto_definition(definition_params(&uri, 1, 16))
        .await
        .unwrap();

    match response {
        Some(GotoDefinitionResponse::Scalar(location)) => {
            assert_eq!(location.uri, Url::from_file_path(ws.path("app/models/author.rb")).unwrap());
            assert_eq!(location.range.start, Position { line: 0, character: 0 });
        }
        other => panic!("expected a scalar location, got {other:?}"),
    }
}

#[tokio::test]
async fn test_goto_definition_uses_latest_change() {
    let ws = model_workspace();
    let backend = Backend::new_test_with_workspace(ws.root().to_path_buf());
    let uri = Url::from_file_path(ws.path("app/models/post.rb")).unwrap();

    backend.did_open(open_params(&uri, "class Post\nend\n")).await;
    backend
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.clone(),
                version: 2,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "class Post\n  belongs_to :author\nend\n".to_string(),
            }],
        })
        .await;

    let response = backend
        .goto_definition(definition_params(&uri, 1, 16))
        .await
        .unwrap();
    assert!(response.is_some());
}

#[tokio::test]
async fn test_goto_definition_reads_unopened_file_from_disk() {
    let ws = model_workspace();
    let post = ws.write("app/models/post.rb", "class Post\n  belongs_to :author\nend\n");
    let backend = Backend::new_test_with_workspace(ws.root().to_path_buf());
    let uri = Url::from_file_path(post).unwrap();

    let response = backend
        .goto_definition(definition_params(&uri, 1, 16))
        .await
        .unwrap();
    assert!(response.is_some());
}

#[tokio::test]
async fn test_goto_definition_without_match_is_none() {
    let ws = RailsWorkspace::new();
    let backend = Backend::new_test_with_workspace(ws.root().to_path_buf());
    let uri = Url::from_file_path(ws.path("app/models/post.rb")).unwrap();

    backend
        .did_open(open_params(&uri, "class Post\n  belongs_to :author\nend\n"))
        .await;

    let response = backend
        .goto_definition(definition_params(&uri, 1, 16))
        .await
        .unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_workspace_backend_uses_project_config() {
    let ws = RailsWorkspace::with_files(&[
        (".rails-goto.toml", "[helpers]\nfallback_dirs = [\"engines\"]\n"),
        ("lib/reports.rb", "module ReportsHelper\nend\n"),
        ("engines/core/reports.rb", "\nmodule ReportsHelper\nend\n"),
    ]);
    let backend = Backend::new_test_with_workspace(ws.root().to_path_buf());
    let uri = Url::from_file_path(ws.path("app/controllers/posts_controller.rb")).unwrap();
    backend
        .did_open(open_params(&uri, "  include ReportsHelper\n"))
        .await;

    let response = backend
        .goto_definition(definition_params(&uri, 0, 12))
        .await
        .unwrap();
    match response {
        Some(GotoDefinitionResponse::Scalar(location)) => {
            assert_eq!(location.uri, Url::from_file_path(ws.path("engines/core/reports.rb")).unwrap());
            assert_eq!(location.range.start, Position { line: 1, character: 0 });
        }
        other => panic!("expected a scalar location, got {other:?}"),
    }
}

#[tokio::test]
async fn test_execute_command_matches_goto_definition() {
    let ws = model_workspace();
    let backend = Backend::new_test_with_workspace(ws.root().to_path_buf());
    let uri = Url::from_file_path(ws.path("app/models/post.rb")).unwrap();
    backend
        .did_open(open_params(&uri, "class Post\n  belongs_to :author\nend\n"))
        .await;

    let via_command = backend
        .execute_command(ExecuteCommandParams {
            command: GOTO_DEFINITION_COMMAND.to_string(),
            arguments: vec![json!(uri), json!({ "line": 1, "character": 16 })],
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await
        .unwrap()
        .expect("command should return a location");
    let location: Location = serde_json::from_value(via_command).unwrap();

    let via_request = backend
        .goto_definition(definition_params(&uri, 1, 16))
        .await
        .unwrap();
    assert_eq!(via_request, Some(GotoDefinitionResponse::Scalar(location)));
}

#[tokio::test]
async fn test_execute_command_accepts_position_params_object() {
    let ws = model_workspace();
    let backend = Backend::new_test_with_workspace(ws.root().to_path_buf());
    let uri = Url::from_file_path(ws.path("app/models/post.rb")).unwrap();
    backend
        .did_open(open_params(&uri, "class Post\n  belongs_to :author\nend\n"))
        .await;

    let result = backend
        .execute_command(ExecuteCommandParams {
            command: GOTO_DEFINITION_COMMAND.to_string(),
            arguments: vec![json!({
                "textDocument": { "uri": uri },
                "position": { "line": 1, "character": 16 }
            })],
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await
        .unwrap();
    assert!(result.is_some());
}

#[tokio::test]
async fn test_execute_command_rejects_bad_input() {
    let backend = Backend::new_test();

    let unknown = backend
        .execute_command(ExecuteCommandParams {
            command: "something.else".to_string(),
            arguments: vec![],
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await;
    assert!(unknown.is_err());

    let malformed = backend
        .execute_command(ExecuteCommandParams {
            command: GOTO_DEFINITION_COMMAND.to_string(),
            arguments: vec![json!(42)],
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await;
    assert!(malformed.is_err());
}

#[tokio::test]
async fn test_shutdown() {
    let backend = Backend::new_test();
    assert!(backend.shutdown().await.is_ok());
}
