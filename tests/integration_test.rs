//! Integration tests for texsplice.

#![allow(clippy::expect_used)]

use texsplice::{
    ArtifactId, PassOutcome, Pipeline, RenderError, SkipReason, extract, image_tag, splice,
};

/// Renderer that assigns sequential ids starting at `first`.
fn sequential_renderer(
    first: u32,
) -> impl FnMut(&str, &str) -> Result<ArtifactId, RenderError> {
    let mut next = first;
    move |_: &str, _: &str| {
        let id = ArtifactId::new(next).ok_or(RenderError::StoreRejected)?;
        next += 1;
        Ok(id)
    }
}

/// Renderer that fails for the given call indices (0-based) and assigns
/// sequential ids otherwise.
fn failing_renderer(
    fail_at: Vec<usize>,
) -> impl FnMut(&str, &str) -> Result<ArtifactId, RenderError> {
    let mut call = 0usize;
    let mut next = 1u32;
    move |_: &str, _: &str| {
        let index = call;
        call += 1;
        if fail_at.contains(&index) {
            return Err(RenderError::ToolchainFailed {
                tool: "latex".to_string(),
                detail: "exit status: 1".to_string(),
            });
        }
        let id = ArtifactId::new(next).ok_or(RenderError::StoreRejected)?;
        next += 1;
        Ok(id)
    }
}

#[test]
fn test_no_backslash_is_identity() {
    let mut pipeline = Pipeline::new(sequential_renderer(1));
    for text in [
        "",
        "plain words",
        "braces {but no} commands",
        "unicode: 数学 α β",
        "<img id=\"3\"> already substituted",
    ] {
        let outcome = pipeline.transform_outgoing(text);
        assert!(matches!(
            outcome,
            PassOutcome::Unchanged(SkipReason::NoWork)
        ));
        assert_eq!(outcome.output(text), text);
    }
}

#[test]
fn test_denylisted_text_passes_through() {
    let mut pipeline = Pipeline::new(sequential_renderer(1));
    for text in [
        r"\def\x{y}",
        r"innocent prefix \write18{sh} suffix",
        r"\begin{input}stuff\end{input}",
        r"\begin { csname }",
    ] {
        let outcome = pipeline.transform_incoming(text);
        assert!(matches!(
            outcome,
            PassOutcome::Unchanged(SkipReason::Denylisted)
        ));
        assert_eq!(outcome.output(text), text);
    }
}

#[test]
fn test_single_fragment_round_trip() {
    let mut pipeline = Pipeline::new(sequential_renderer(7));
    let text = r"the sum \cmd{arg} is shown";
    let outcome = pipeline.transform_outgoing(text);

    let output = outcome.output(text);
    assert!(output.contains("<img id=\"7\">"));
    assert!(!output.contains(r"\cmd{arg}"));
    assert_eq!(output, "the sum <img id=\"7\"> is shown");
}

#[test]
fn test_many_fragments_order_preserving() {
    let mut pipeline = Pipeline::new(sequential_renderer(1));
    let text = r"\a{1} \b{2} \c{3} \d{4}";
    let outcome = pipeline.transform_outgoing(text);

    assert_eq!(
        outcome.output(text),
        "<img id=\"1\"> <img id=\"2\"> <img id=\"3\"> <img id=\"4\">"
    );
}

#[test]
fn test_partial_render_failure_degrades_per_fragment() {
    let mut pipeline = Pipeline::new(failing_renderer(vec![1]));
    let text = r"\a{x} \b{y} \c{z}";
    let outcome = pipeline.transform_outgoing(text);

    let PassOutcome::Spliced(report) = outcome else {
        unreachable!("expected spliced outcome");
    };
    assert_eq!(report.text, "<img id=\"1\"> \\b{y} <img id=\"2\">");
    assert_eq!(report.spliced, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(report.failures[0].command, "b");
}

#[test]
fn test_mismatched_counts_abort_whole_message() {
    let mut pipeline = Pipeline::new(sequential_renderer(1));
    for text in [
        "{unmatched}",
        r"\alpha with no group",
        r"\frac{a}{b}",
        r"\a{unterminated",
    ] {
        let outcome = pipeline.transform_outgoing(text);
        assert!(
            matches!(
                outcome,
                PassOutcome::Unchanged(SkipReason::Inconsistent(_))
            ),
            "expected inconsistent abort for {text:?}"
        );
        assert_eq!(outcome.output(text), text);
    }
}

#[test]
fn test_second_pass_is_no_op() {
    let mut pipeline = Pipeline::new(sequential_renderer(1));
    let text = r"\x{1} and \y{2}";

    let first = pipeline.transform_outgoing(text);
    let output = first.output(text).to_string();
    assert!(output.contains("<img id=\"1\">"));

    let second = pipeline.transform_outgoing(&output);
    assert!(matches!(
        second,
        PassOutcome::Unchanged(SkipReason::NoWork)
    ));
    assert_eq!(second.output(&output), output);
}

#[test]
fn test_render_receives_correlated_pairs() {
    let mut calls = Vec::new();
    {
        let mut renderer = |command: &str, snippet: &str| {
            calls.push((command.to_string(), snippet.to_string()));
            ArtifactId::new(calls.len() as u32).ok_or(RenderError::StoreRejected)
        };
        let text = r"\alpha{a} \beta{b{c}}";
        let extraction = extract(text).expect("extraction should succeed");
        let report = splice(text, &extraction, &mut renderer);
        assert_eq!(report.spliced, 2);
    }
    assert_eq!(
        calls,
        vec![
            ("alpha".to_string(), "a".to_string()),
            ("beta".to_string(), "b{c}".to_string()),
        ]
    );
}

#[test]
fn test_image_tag_is_wire_contract_shape() {
    let id = ArtifactId::new(42).expect("non-zero");
    assert_eq!(image_tag(id), "<img id=\"42\">");
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn no_backslash_means_identity(text in "[a-zA-Z0-9 .,!?]{0,80}") {
            let mut pipeline = Pipeline::new(sequential_renderer(1));
            let outcome = pipeline.transform_outgoing(&text);
            prop_assert!(outcome.is_unchanged());
            prop_assert_eq!(outcome.output(&text), text.as_str());
        }

        #[test]
        fn well_formed_fragments_extract_aligned(
            pairs in prop::collection::vec(("[a-zA-Z]{1,8}", "[a-z0-9 ]{0,12}"), 1..6)
        ) {
            let text: String = pairs
                .iter()
                .map(|(c, s)| format!("\\{c}{{{s}}} "))
                .collect();
            let extraction = extract(&text).expect("well-formed input");
            prop_assert_eq!(extraction.len(), pairs.len());
            for (i, (command, snippet)) in extraction.pairs().enumerate() {
                prop_assert_eq!(command, pairs[i].0.as_str());
                prop_assert_eq!(snippet, pairs[i].1.as_str());
            }
        }

        #[test]
        fn all_fragments_substituted_when_render_succeeds(
            pairs in prop::collection::vec(("[a-zA-Z]{1,8}", "[a-z0-9]{0,12}"), 1..6)
        ) {
            let text: String = pairs
                .iter()
                .map(|(c, s)| format!("\\{c}{{{s}}} "))
                .collect();
            let mut pipeline = Pipeline::new(sequential_renderer(1));
            let outcome = pipeline.transform_outgoing(&text);
            let output = outcome.output(&text);

            prop_assert!(!output.contains('\\'));
            for i in 1..=pairs.len() {
                let tag = format!("<img id=\"{i}\">");
                prop_assert!(output.contains(&tag));
            }
        }
    }
}

/// CLI integration tests for the toolchain-free subcommands.
mod cli_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn texsplice() -> Command {
        Command::cargo_bin("texsplice").expect("binary should build")
    }

    #[test]
    fn test_cli_check_clean() {
        texsplice()
            .args(["check", r"\sum{n}"])
            .assert()
            .success()
            .stdout(predicate::str::contains("clean"));
    }

    #[test]
    fn test_cli_check_denylisted() {
        texsplice()
            .args(["check", r"\def\x{y}"])
            .assert()
            .success()
            .stdout(predicate::str::contains("denylisted"));
    }

    #[test]
    fn test_cli_check_reads_stdin() {
        texsplice()
            .arg("check")
            .write_stdin("plain text\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("clean"));
    }

    #[test]
    fn test_cli_extract_text() {
        texsplice()
            .args(["extract", r"\a{x}\b{y{z}}"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 fragment(s)"))
            .stdout(predicate::str::contains(r"\b{y{z}}"));
    }

    #[test]
    fn test_cli_extract_json() {
        texsplice()
            .args(["extract", r"\a{x}", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"command\": \"a\""));
    }

    #[test]
    fn test_cli_extract_inconsistent_fails() {
        texsplice()
            .args(["extract", "{orphan}"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("extraction error"));
    }

    #[test]
    fn test_cli_render_missing_toolchain_fails() {
        texsplice()
            .args([
                "render",
                r"\a{x}",
                "--latex",
                "/nonexistent/latex",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("toolchain executable not found"));
    }
}
