use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tower_lsp::lsp_types::Position;
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use rails_goto_lsp::{Backend, Config};

/// Convention-driven go-to-definition for Ruby on Rails.
#[derive(Parser)]
#[command(name = "rails-goto-lsp", version, about, long_about = None)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the language server over stdio (the default)
    Serve,

    /// Resolve one reference and print its location as JSON
    Locate {
        /// Ruby file containing the reference
        file: PathBuf,
        /// 0-based line of the cursor
        line: u32,
        /// 0-based column of the cursor
        column: u32,
        /// Rails project root (defaults to the current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout belongs to the LSP transport.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let (service, socket) = LspService::new(Backend::new);
            Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
                .serve(service)
                .await;
            ExitCode::SUCCESS
        }
        Command::Locate {
            file,
            line,
            column,
            workspace,
        } => locate(file, Position { line, character: column }, workspace),
    }
}

fn locate(file: PathBuf, position: Position, workspace: Option<PathBuf>) -> ExitCode {
    let root = match workspace.map_or_else(std::env::current_dir, Ok) {
        Ok(root) => root,
        Err(err) => {
            tracing::error!("cannot determine workspace root: {err}");
            return ExitCode::FAILURE;
        }
    };
    let file = if file.is_absolute() { file } else { root.join(file) };
    let config = Config::load(Some(&root));

    match rails_goto_lsp::resolve_in_file(Some(&root), &file, position, &config) {
        Some(location) => {
            let json = serde_json::json!({
                "path": location.file_path.display().to_string(),
                "line": location.line,
                "column": location.column,
            });
            println!("{json}");
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("No definition found");
            ExitCode::FAILURE
        }
    }
}
