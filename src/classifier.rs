//! Line classification.
//!
//! A line is matched against one regex set per [`ReferenceCategory`], in
//! [`ReferenceCategory::PRIORITY`] order, and the first category that
//! matches wins. A line can plausibly match several categories
//! (`FooService.new` looks like both a service and a model construction);
//! the priority order settles it. Suffix-driven categories come first
//! because `*Service` / `*Controller` are the most specific signals.
use std::sync::LazyLock;

use regex::RegexSet;

use crate::types::ReferenceCategory;

/// The predicates for one category, each a regex over the whole line.
fn patterns(category: ReferenceCategory) -> &'static [&'static str] {
    match category {
        ReferenceCategory::Service => &[r"\b\w+Service\b", r"\bservice\s*:?\s*:?\w+"],
        ReferenceCategory::Controller => &[
            r"\b\w+Controller\b",
            r#"\bcontroller\s*:\s*(?:['"]\w+['"]|:\w+)"#,
        ],
        ReferenceCategory::Helper => &[
            r"\bhelper\s*:?\s*:?\w+",
            r"\b\w+Helper\b",
            r"\b(?:\w+::)+\w+Helper\b",
        ],
        ReferenceCategory::Mailer => &[
            r"\bmailer\s*:?\s*:?\w+",
            r"\b\w+Mailer\b",
            r"\b(?:\w+::)+\w+Mailer\b",
        ],
        ReferenceCategory::View => &[
            r#"\brender\s*\(?\s*['"]\w+"#,
            r"\brender\s*\(?\s*:\w+",
            r#"\brender\s*\(?\s*partial\s*:\s*['"]\w+"#,
        ],
        ReferenceCategory::Callback => {
            &[r"\b(?:before|after)_(?:validation|save|create|update|destroy)\s+:\w+"]
        }
        ReferenceCategory::Model => &[
            r"\bbelongs_to\s+:\w+",
            r"\bhas_many\s+:\w+",
            r"\bhas_one\s+:\w+",
            r"\bhas_and_belongs_to_many\s+:\w+",
            r#"\bclass_name\s*[=:]\s*['"]\w+['"]"#,
            r"\b[A-Z]\w+\.(?:find|where|create|new)",
        ],
        ReferenceCategory::GenericMethod => &[],
    }
}

/// One compiled set per category, in [`ReferenceCategory::PRIORITY`] order.
static COMPILED: LazyLock<Vec<(ReferenceCategory, RegexSet)>> = LazyLock::new(|| {
    ReferenceCategory::PRIORITY
        .iter()
        .filter_map(|&category| match RegexSet::new(patterns(category)) {
            Ok(set) => Some((category, set)),
            Err(err) => {
                tracing::error!(%category, "invalid classifier pattern: {err}");
                None
            }
        })
        .collect()
});

/// Assign exactly one category to `line`.
pub fn classify(line: &str) -> ReferenceCategory {
    COMPILED
        .iter()
        .find(|(_, set)| set.is_match(line))
        .map_or(ReferenceCategory::GenericMethod, |(category, _)| *category)
}

/// Whether `line` matches the predicate for `category` on its own,
/// ignoring priority. `GenericMethod` matches every line.
pub fn matches(category: ReferenceCategory, line: &str) -> bool {
    if category == ReferenceCategory::GenericMethod {
        return true;
    }
    COMPILED
        .iter()
        .any(|(candidate, set)| *candidate == category && set.is_match(line))
}

/// Every category whose predicate matches `line`, in priority order.
pub fn candidates(line: &str) -> Vec<ReferenceCategory> {
    COMPILED
        .iter()
        .filter(|(_, set)| set.is_match(line))
        .map(|(category, _)| *category)
        .collect()
}
