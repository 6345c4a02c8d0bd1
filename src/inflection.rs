//! Rails naming-convention transforms.
//!
//! These map the way a symbol is written in Ruby source (`BlogPost`,
//! `:blog_posts`, `Admin::ReportsHelper`) to the names Rails expects on disk
//! and in class declarations. They are intentionally naive: no irregular
//! plurals, no acronym handling. `HTMLParser` snake-cases to `htmlparser` and
//! `people` singularizes to `peopl`.

/// Remove `suffix` from the end of `name` when present.
pub fn strip_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
    name.strip_suffix(suffix).unwrap_or(name)
}

/// `BlogPost` → `blog_post`, `Api2Client` → `api2_client`.
///
/// An underscore is inserted before an uppercase letter only when the
/// preceding character is a lowercase letter or a digit.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for ch in name.chars() {
        if ch.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push('_');
        }
        out.push(ch.to_ascii_lowercase());
        prev = Some(ch);
    }
    out
}

/// `categories` → `category`, `posts` → `post`, `post` → `post`.
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = word.strip_suffix('s') {
        stem.to_string()
    } else {
        word.to_string()
    }
}

/// `blog_post` → `BlogPost`.
pub fn classify(snake: &str) -> String {
    snake
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Split `Admin::Reports::SummaryHelper` into
/// (`"Admin::Reports"`, `"SummaryHelper"`). The prefix is empty for an
/// unqualified name.
pub fn split_namespace(qualified: &str) -> (String, String) {
    match qualified.rsplit_once("::") {
        Some((prefix, leaf)) => (prefix.to_string(), leaf.to_string()),
        None => (String::new(), qualified.to_string()),
    }
}

/// `Admin::ReportCards` → `admin/report_cards`, the directory Rails
/// autoloading expects for a namespace.
pub fn namespace_dir(prefix: &str) -> String {
    prefix
        .split("::")
        .filter(|segment| !segment.is_empty())
        .map(to_snake_case)
        .collect::<Vec<_>>()
        .join("/")
}
