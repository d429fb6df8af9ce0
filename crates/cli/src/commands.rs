//! Grading commands
//!
//! Each command loads its documents, runs the evaluation engine and writes a
//! human-readable report to the given writer. The scoring commands return the
//! grading verdict; hard failures (unreadable files, malformed JSON, unknown
//! question ids) are errors instead. `validate` reports an invalid submission
//! as an error too.

use anyhow::{Context, Result};
use moulinette_core::config::Config;
use moulinette_core::{load_answer_submission, load_dataset, load_submission, Submission};
use moulinette_evaluation::report::{format_recall_report, format_validation, format_verdict};
use moulinette_evaluation::{grade, validate, Grade, ValidationLimits};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Machine-readable output of `evaluate --json`
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    passed: bool,
    violations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recall: Option<moulinette_evaluation::RecallScores<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<moulinette_evaluation::RecallCounts>,
}

/// Validates a submission without scoring it
///
/// The outcome is written in full, warnings included. A submission with
/// blocking violations is then returned as a validation failure error.
pub fn run_validate(config: &Config, submission_path: &Path, out: &mut dyn Write) -> Result<()> {
    info!("Validating {}", submission_path.display());
    let submission = load_submission(submission_path)?;

    let outcome = validate(&submission, &ValidationLimits::from(&config.validation));
    write!(out, "{}", format_validation(&outcome)).context("Failed to write report")?;

    outcome.into_result()?;
    Ok(())
}

/// Validates, scores and gates a search-results submission
pub fn run_evaluate(
    config: &Config,
    dataset_path: &Path,
    submission_path: &Path,
    json: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    info!(
        "Evaluating {} against {}",
        submission_path.display(),
        dataset_path.display()
    );
    let submission = load_submission(submission_path)?;
    grade_and_print(config, dataset_path, &submission, json, out)
}

/// Scores an answer-bearing submission
///
/// Every search result must carry an answer. Only the retrieved sources are
/// scored; answer text is not compared with the reference answers.
pub fn run_answers(
    config: &Config,
    dataset_path: &Path,
    submission_path: &Path,
    out: &mut dyn Write,
) -> Result<bool> {
    info!(
        "Evaluating answers in {} against {}",
        submission_path.display(),
        dataset_path.display()
    );
    let submission = load_answer_submission(submission_path)?;
    grade_and_print(config, dataset_path, &submission, false, out)
}

fn grade_and_print(
    config: &Config,
    dataset_path: &Path,
    submission: &Submission,
    json: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let dataset = load_dataset(dataset_path)?;
    let grade = grade(config, &dataset, submission)?;

    if json {
        write_json(&grade, out)?;
    } else {
        write_text(&grade, out)?;
    }

    Ok(grade.passed())
}

fn write_text(grade: &Grade, out: &mut dyn Write) -> Result<()> {
    let mut text = String::new();
    if !grade.validation.violations.is_empty() {
        text.push_str(&format_validation(&grade.validation));
    }
    if let Some(report) = &grade.report {
        text.push_str(&format_recall_report(report));
    }
    match &grade.verdict {
        Some(verdict) => {
            text.push_str(&format_verdict(verdict));
            text.push('\n');
        }
        None => text.push_str("Submission is not valid; it was not scored\n"),
    }
    out.write_all(text.as_bytes())
        .context("Failed to write report")
}

fn write_json(grade: &Grade, out: &mut dyn Write) -> Result<()> {
    let output = JsonOutput {
        passed: grade.passed(),
        violations: grade.validation.messages(),
        recall: grade.report.as_ref().map(|r| r.scores()),
        counts: grade.report.as_ref().map(|r| r.counts),
    };
    serde_json::to_writer_pretty(&mut *out, &output).context("Failed to write JSON report")?;
    writeln!(out).context("Failed to write JSON report")
}
