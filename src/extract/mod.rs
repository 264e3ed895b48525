//! Fragment extraction from message text.
//!
//! Two independent linear scans over the same text produce two
//! positionally-correlated sequences: command tokens (the name after each
//! backslash) and snippets (the brace-group text that follows). Keeping
//! the scans separate is a design invariant, not an accident - the outputs
//! must align index-for-index, and a length mismatch means the message is
//! malformed and the whole pass must abort.
//!
//! Both scans are iterative with explicit counters, so deeply nested input
//! cannot overflow the call stack.

use crate::error::ExtractError;

/// Index-aligned command and snippet sequences extracted from one message.
///
/// Invariant: `commands.len() == snippets.len()`, and pair `i` corresponds
/// to exactly one physical `\command{snippet}` occurrence in the original
/// text, in left-to-right order.
///
/// # Examples
///
/// ```
/// use texsplice::extract::extract;
///
/// let ex = extract(r"\a{x}\b{y{z}}").unwrap();
/// assert_eq!(ex.commands(), ["a", "b"]);
/// assert_eq!(ex.snippets(), ["x", "y{z}"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    commands: Vec<String>,
    snippets: Vec<String>,
}

impl Extraction {
    /// Returns the number of extracted fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no fragments were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the command tokens in order of appearance.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Returns the snippets in order of appearance, braces stripped.
    #[must_use]
    pub fn snippets(&self) -> &[String] {
        &self.snippets
    }

    /// Iterates over `(command, snippet)` pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.commands
            .iter()
            .map(String::as_str)
            .zip(self.snippets.iter().map(String::as_str))
    }
}

/// Scans for backslash-introduced command tokens.
///
/// On each `\`, a new token starts; subsequent ASCII alphanumerics are
/// consumed into it and the token ends at the first other character. The
/// scan does not look at what follows the token, so a backslash with no
/// name yields an empty token (caught later by the count check or by
/// occurrence location).
#[must_use]
pub fn scan_commands(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            continue;
        }
        let mut token = String::new();
        while let Some(&next) = chars.peek() {
            if !next.is_ascii_alphanumeric() {
                break;
            }
            token.push(next);
            chars.next();
        }
        commands.push(token);
    }

    commands
}

/// Scans for fully-nested brace groups, tracking depth with a counter.
///
/// A `{` at depth zero opens a new snippet; nested braces are copied
/// verbatim; the `}` that returns the depth to zero finalizes the snippet
/// with the outer braces stripped. A stray `}` at depth zero is ignored.
///
/// # Errors
///
/// Returns [`ExtractError::UnterminatedGroup`] if a group is still open at
/// the end of the text.
pub fn scan_snippets(text: &str) -> Result<Vec<String>, ExtractError> {
    let mut snippets = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut open_at = 0usize;

    for (offset, c) in text.char_indices() {
        match c {
            '{' if depth == 0 => {
                depth = 1;
                open_at = offset;
                current.clear();
            }
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    snippets.push(std::mem::take(&mut current));
                } else {
                    current.push(c);
                }
            }
            _ if depth > 0 => current.push(c),
            _ => {}
        }
    }

    if depth > 0 {
        return Err(ExtractError::UnterminatedGroup { offset: open_at });
    }

    Ok(snippets)
}

/// Extracts the aligned command and snippet sequences from a message.
///
/// # Errors
///
/// Returns [`ExtractError::UnterminatedGroup`] for an unclosed brace group
/// and [`ExtractError::CountMismatch`] when the two scans disagree (a
/// command with no group, or a group with no preceding command). Either
/// error means the caller must abort the pass and keep the original text.
pub fn extract(text: &str) -> Result<Extraction, ExtractError> {
    let commands = scan_commands(text);
    let snippets = scan_snippets(text)?;

    if commands.len() != snippets.len() {
        return Err(ExtractError::CountMismatch {
            commands: commands.len(),
            snippets: snippets.len(),
        });
    }

    Ok(Extraction { commands, snippets })
}
