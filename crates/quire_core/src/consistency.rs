//! Substantial-difference comparator for document bodies.
//!
//! A cached remote copy and a local draft often diverge only because the
//! editor rewrote whitespace or refreshed an auto-updated metadata field
//! such as `updated:`. Reporting those as conflicts would be noise, so
//! [`has_substantial_difference`] ignores:
//!
//! - any whitespace difference
//! - front matter drift, when both documents carry front matter, their
//!   bodies match exactly, and the total lengths differ by fewer than
//!   [`METADATA_DRIFT_THRESHOLD`] characters
//!
//! The threshold is a length heuristic, not a field-by-field comparison of
//! the front matter.

use std::fmt;

/// Line that opens and closes a front matter block.
pub const FRONT_MATTER_MARKER: &str = "---";

/// Largest total length change (exclusive) still treated as metadata drift.
pub const METADATA_DRIFT_THRESHOLD: usize = 20;

/// Splits `content` into its front matter and the body that follows.
///
/// The block must start at the very first byte with `---\n` and ends at the
/// first following `\n---`. Returns `None` when there is no such block.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(FRONT_MATTER_MARKER)?.strip_prefix('\n')?;
    let close = format!("\n{FRONT_MATTER_MARKER}");
    let end = rest.find(&close)?;
    Some((&rest[..end], &rest[end + close.len()..]))
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Returns true if `a` and `b` differ in a way that matters to the author.
///
/// Two empty documents are the same; an empty and a non-empty document are
/// different. Lengths are measured in characters.
pub fn has_substantial_difference(a: &str, b: &str) -> bool {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return false,
        (true, false) | (false, true) => return true,
        (false, false) => {}
    }

    if strip_whitespace(a) == strip_whitespace(b) {
        return false;
    }

    if let (Some((_, body_a)), Some((_, body_b))) = (split_front_matter(a), split_front_matter(b)) {
        if body_a.trim() == body_b.trim() {
            let delta = a.chars().count().abs_diff(b.chars().count());
            if delta < METADATA_DRIFT_THRESHOLD {
                return false;
            }
        }
    }

    true
}

/// Outcome recorded for a consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyOutcome {
    /// Both copies are the same.
    Match,
    /// The copies differ substantively.
    Mismatch,
    /// The copies differ only cosmetically and the difference was ignored.
    Ignored,
}

impl fmt::Display for ConsistencyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConsistencyOutcome::Match => "MATCH",
            ConsistencyOutcome::Mismatch => "MISMATCH",
            ConsistencyOutcome::Ignored => "IGNORED",
        };
        f.write_str(s)
    }
}

impl ConsistencyOutcome {
    /// Classifies a pair of documents.
    pub fn classify(a: &str, b: &str) -> Self {
        if a == b {
            ConsistencyOutcome::Match
        } else if has_substantial_difference(a, b) {
            ConsistencyOutcome::Mismatch
        } else {
            ConsistencyOutcome::Ignored
        }
    }
}

/// Emits a structured log event for a consistency check on `path`.
pub fn log_consistency_check(path: &str, outcome: ConsistencyOutcome, details: Option<&str>) {
    match outcome {
        ConsistencyOutcome::Mismatch => tracing::info!(
            target: "quire::consistency",
            path,
            %outcome,
            details = details.unwrap_or(""),
            "consistency check"
        ),
        _ => tracing::debug!(
            target: "quire::consistency",
            path,
            %outcome,
            details = details.unwrap_or(""),
            "consistency check"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_inputs() {
        assert!(!has_substantial_difference("", ""));
        assert!(has_substantial_difference("", "x"));
        assert!(has_substantial_difference("x", ""));
    }

    #[test]
    fn whitespace_only_changes_are_ignored() {
        assert!(!has_substantial_difference("a b\nc", "ab c\r\n"));
        assert!(!has_substantial_difference("# Title\n\nbody", "# Title\nbody\n\n"));
    }

    #[test]
    fn metadata_drift_is_ignored() {
        let a = "---\nx: 1\n---\nbody";
        let b = "---\nx: 2\n---\nbody";
        assert!(!has_substantial_difference(a, b));

        let a = "---\ntitle: Hi\nupdated: 2026-01-01 10:00:00\n---\n\nHello";
        let b = "---\ntitle: Hi\nupdated: 2026-10-19 08:30:12\n---\nHello\n";
        assert!(!has_substantial_difference(a, b));
    }

    #[test]
    fn body_change_is_substantial() {
        let a = "---\nx: 1\n---\nbody";
        let b = "---\nx: 2\n---\nbody changed";
        assert!(has_substantial_difference(a, b));
    }

    #[test]
    fn large_metadata_change_is_substantial() {
        let a = "---\nx: 1\n---\nbody";
        let b = "---\nx: 1\ntags: [one, two, three, four]\n---\nbody";
        assert!(has_substantial_difference(a, b));
    }

    #[test]
    fn front_matter_required_on_both_sides() {
        let a = "---\nx: 1\n---\nbody";
        let b = "body x";
        assert!(has_substantial_difference(a, b));
    }

    #[test]
    fn split_front_matter_shapes() {
        assert_eq!(split_front_matter("---\nk: v\n---\nbody"), Some(("k: v", "\nbody")));
        assert_eq!(split_front_matter("---\n\n---"), Some(("", "")));
        assert_eq!(split_front_matter("no front matter"), None);
        assert_eq!(split_front_matter(" ---\nk: v\n---\n"), None);
        assert_eq!(split_front_matter("---\nunterminated"), None);
    }

    #[test]
    fn outcome_classification() {
        assert_eq!(ConsistencyOutcome::classify("a", "a"), ConsistencyOutcome::Match);
        assert_eq!(ConsistencyOutcome::classify("a", "a "), ConsistencyOutcome::Ignored);
        assert_eq!(ConsistencyOutcome::classify("a", "b"), ConsistencyOutcome::Mismatch);
        assert_eq!(ConsistencyOutcome::Ignored.to_string(), "IGNORED");
    }

    proptest! {
        #[test]
        fn identical_inputs_never_differ(s in ".*") {
            prop_assert!(!has_substantial_difference(&s, &s));
        }

        #[test]
        fn comparison_is_symmetric(a in "[ a-c\n-]{0,24}", b in "[ a-c\n-]{0,24}") {
            prop_assert_eq!(has_substantial_difference(&a, &b), has_substantial_difference(&b, &a));
        }
    }
}
