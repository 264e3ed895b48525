//! Denylist validation for unsafe LaTeX directives.
//!
//! Messages are checked against a fixed set of forbidden directive names
//! before any fragment reaches the external typesetting toolchain. Each
//! entry is matched two ways: as a literal substring, and as a
//! `\begin{...}` environment opener (which would otherwise smuggle the
//! directive past a bare-command check).
//!
//! This is best-effort filtering, not a security boundary against a fully
//! adversarial author.

use regex::Regex;
use std::sync::LazyLock;

/// Forbidden directive names.
///
/// The set is a process-wide constant and is never mutated after
/// initialization. Entries carry their leading backslash; the
/// environment-form pattern strips it.
pub const DENYLIST: [&str; 42] = [
    "\\def",
    "\\let",
    "\\futurelet",
    "\\newcommand",
    "\\renewcommand",
    "\\else",
    "\\fi",
    "\\write",
    "\\input",
    "\\include",
    "\\chardef",
    "\\catcode",
    "\\makeatletter",
    "\\noexpand",
    "\\toksdef",
    "\\every",
    "\\errhelp",
    "\\errorstopmode",
    "\\scrollmode",
    "\\nonstopmode",
    "\\batchmode",
    "\\read",
    "\\csname",
    "\\newhelp",
    "\\relax",
    "\\afterground",
    "\\afterassignment",
    "\\expandafter",
    "\\noexpand",
    "\\special",
    "\\command",
    "\\loop",
    "\\repeat",
    "\\toks",
    "\\output",
    "\\line",
    "\\mathcode",
    "\\name",
    "\\item",
    "\\section",
    "\\mbox",
    "\\DeclareRobustCommand",
];

/// One denylist entry with its precompiled environment-form pattern.
struct Entry {
    /// Literal directive text, leading backslash included.
    literal: &'static str,
    /// Matches `\begin { name }` with optional non-word filler.
    ///
    /// `None` if the pattern failed to compile; the literal check for this
    /// entry and all checks for other entries still apply.
    begin_env: Option<Regex>,
}

/// Patterns are compiled once per process and reused across all calls.
static ENTRIES: LazyLock<Vec<Entry>> = LazyLock::new(|| {
    DENYLIST
        .iter()
        .map(|literal| {
            let name = literal.trim_start_matches('\\');
            let pattern = format!(r"\\begin\W*\{{\W*{}\W*\}}", regex::escape(name));
            Entry {
                literal,
                begin_env: Regex::new(&pattern).ok(),
            }
        })
        .collect()
});

/// Returns `true` if the text contains any denylisted directive.
///
/// Matching is exact: no case folding, no word boundaries. A directive is
/// caught either as a literal substring (`\def` also matches inside
/// `\define`) or introduced through an environment (`\begin{ def }`).
/// Short-circuits on the first match.
///
/// # Examples
///
/// ```
/// use texsplice::denylist::is_denylisted;
///
/// assert!(is_denylisted(r"\def\x{y}"));
/// assert!(is_denylisted(r"\begin{input}"));
/// assert!(!is_denylisted(r"\sum{n}"));
/// ```
#[must_use]
pub fn is_denylisted(text: &str) -> bool {
    ENTRIES.iter().any(|entry| {
        if text.contains(entry.literal) {
            return true;
        }
        entry
            .begin_env
            .as_ref()
            .is_some_and(|re| re.is_match(text))
    })
}
