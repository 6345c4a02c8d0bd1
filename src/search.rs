/// Filesystem search for convention-based definitions.
///
/// Two primitives the category resolvers build on:
///
/// - [`find_files`]: a lazy, depth-first walk of one directory tree that
///   yields files whose name passes a predicate. Entries are visited in
///   lexical order so the same tree always produces the same sequence.
///   Unreadable directories and symlink loops are logged and skipped.
/// - [`find_definition_in_file`]: scans one file's text for a
///   `module`/`class` declaration of a (possibly namespaced) constant.
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use regex::Regex;

use crate::config::SearchConfig;
use crate::error::read_source;
use crate::types::ResolvedLocation;

/// Walk `root` and yield every regular file whose file name satisfies
/// `matches`.
///
/// The walk is lazy: callers that stop at the first useful hit never touch
/// the rest of the tree. A missing `root` yields nothing.
pub fn find_files<F>(
    root: &Path,
    options: &SearchConfig,
    matches: F,
) -> impl Iterator<Item = PathBuf> + use<F>
where
    F: Fn(&str) -> bool,
{
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(false)
        .follow_links(options.follow_symlinks)
        .max_depth(options.max_depth)
        .sort_by_file_name(|a, b| a.cmp(b));

    let walker = root.is_dir().then(|| builder.build());

    walker.into_iter().flatten().filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // Permission errors and symlink loops land here.
                tracing::warn!("skipping unreadable entry: {err}");
                return None;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            return None;
        }
        let accepted = entry.file_name().to_str().is_some_and(&matches);
        accepted.then(|| entry.into_path())
    })
}

/// Convenience wrapper: every `.rb` file under `root`.
pub fn find_ruby_files(
    root: &Path,
    options: &SearchConfig,
) -> impl Iterator<Item = PathBuf> + use<> {
    find_files(root, options, |name| name.ends_with(".rb"))
}

/// Locate the declaration of `leaf` (optionally nested in
/// `namespace_prefix`, written `A::B`) inside `path`.
///
/// Tried in order:
///   1. `module|class Namespace::Leaf` (or `Namespace Leaf` on one line)
///   2. `module|class Leaf` anywhere in the file
///   3. the file declares `module Namespace` *and* `module|class Leaf`
///      somewhere. Nesting is not checked and the file start is returned.
///
/// Read errors are logged and reported as no match.
pub fn find_definition_in_file(
    path: &Path,
    leaf: &str,
    namespace_prefix: &str,
) -> Option<ResolvedLocation> {
    let content = match read_source(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!("{err}");
            return None;
        }
    };

    let position = find_definition_in_content(&content, leaf, namespace_prefix)?;
    Some(ResolvedLocation::new(path, position.0, position.1))
}

/// The content half of [`find_definition_in_file`], returning `(line, column)`.
pub fn find_definition_in_content(
    content: &str,
    leaf: &str,
    namespace_prefix: &str,
) -> Option<(u32, u32)> {
    if leaf.is_empty() {
        return None;
    }
    let leaf_pattern = regex::escape(leaf);
    let namespace = namespace_prefix.trim_matches(':');

    if !namespace.is_empty() {
        let ns_pattern = namespace
            .split("::")
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("::");
        let qualified = format!(r"\b(?:module|class)\s+{ns_pattern}(?:::)?\s*{leaf_pattern}\b");
        if let Some(offset) = first_match_offset(content, &qualified) {
            return Some(line_col_at_offset(content, offset));
        }
    }

    let simple = format!(r"\b(?:module|class)\s+{leaf_pattern}\b");
    if let Some(offset) = first_match_offset(content, &simple) {
        return Some(line_col_at_offset(content, offset));
    }

    if !namespace.is_empty()
        && content.contains(&format!("module {namespace}"))
        && (content.contains(&format!("module {leaf}")) || content.contains(&format!("class {leaf}")))
    {
        return Some((0, 0));
    }

    None
}

/// Find the first line of `content` matching `pattern` and return
/// `(line, column)` of the match start.
pub fn find_pattern_in_lines(content: &str, pattern: &Regex) -> Option<(u32, u32)> {
    content.lines().enumerate().find_map(|(idx, line)| {
        pattern
            .find(line)
            .map(|m| (idx as u32, line[..m.start()].chars().count() as u32))
    })
}

/// Convert a byte offset into `(line, column)` by counting the newlines
/// before it. The column is measured in characters.
pub fn line_col_at_offset(content: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(content.len());
    let before = &content.as_bytes()[..offset];
    let line = memchr::memchr_iter(b'\n', before).count();
    let line_start = memchr::memrchr(b'\n', before).map_or(0, |idx| idx + 1);
    let column = content[line_start..offset].chars().count();
    (line as u32, column as u32)
}

fn first_match_offset(content: &str, pattern: &str) -> Option<usize> {
    match Regex::new(pattern) {
        Ok(re) => re.find(content).map(|m| m.start()),
        Err(err) => {
            tracing::warn!("invalid definition pattern {pattern:?}: {err}");
            None
        }
    }
}
