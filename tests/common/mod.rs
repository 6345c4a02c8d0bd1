#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rails_goto_lsp::{Config, ResolvedLocation, Resolver};
use tower_lsp::lsp_types::Position;

/// A temporary Rails-shaped project.
pub struct RailsWorkspace {
    dir: tempfile::TempDir,
    config: Config,
}

impl RailsWorkspace {
    pub fn new() -> Self {
        RailsWorkspace {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
            config: Config::default(),
        }
    }

    /// Create a workspace populated with `(relative path, content)` pairs.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let ws = Self::new();
        for (rel_path, content) in files {
            ws.write(rel_path, content);
        }
        ws
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel_path: &str) -> PathBuf {
        self.dir.path().join(rel_path)
    }

    pub fn write(&self, rel_path: &str, content: &str) -> PathBuf {
        let full = self.path(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&full, content).expect("failed to write file");
        full
    }

    /// Write raw bytes, for files that are not valid UTF-8.
    pub fn write_bytes(&self, rel_path: &str, content: &[u8]) -> PathBuf {
        let full = self.path(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&full, content).expect("failed to write file");
        full
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Resolve at the first occurrence of `needle` in `content`, as if
    /// `content` were the open text of `current_file`.
    pub fn resolve_at(
        &self,
        current_file: &str,
        content: &str,
        needle: &str,
    ) -> Option<ResolvedLocation> {
        let position = position_of(content, needle);
        self.resolve_position(current_file, content, position)
    }

    pub fn resolve_position(
        &self,
        current_file: &str,
        content: &str,
        position: Position,
    ) -> Option<ResolvedLocation> {
        let current = self.path(current_file);
        Resolver::new(Some(self.root()), Some(&current), &self.config).resolve(content, position)
    }
}

/// Position of the first character of the first `needle` in `content`.
pub fn position_of(content: &str, needle: &str) -> Position {
    for (line_idx, line) in content.lines().enumerate() {
        if let Some(byte_col) = line.find(needle) {
            return Position {
                line: line_idx as u32,
                character: line[..byte_col].chars().count() as u32,
            };
        }
    }
    panic!("needle {needle:?} not found in content");
}

/// Assert a location points at `rel_path` in `ws` at `(line, column)`.
pub fn assert_location(
    ws: &RailsWorkspace,
    location: Option<ResolvedLocation>,
    rel_path: &str,
    line: u32,
    column: u32,
) {
    let location = location.unwrap_or_else(|| panic!("expected a location in {rel_path}"));
    assert_eq!(location.file_path, ws.path(rel_path), "wrong file");
    assert_eq!((location.line, location.column), (line, column), "wrong position in {rel_path}");
}
