//! Human-readable rendering of validation outcomes and recall reports

use crate::aggregate::RecallReport;
use crate::validate::ValidationOutcome;
use moulinette_core::error::{Error, Result};
use serde::Serialize;

/// Pass/fail decision on recall at one cutoff
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateVerdict {
    pub k: usize,
    pub recall: f64,
    pub min_recall: f64,
    pub passed: bool,
}

/// Compares recall at `k` with `min_recall`
///
/// Fails with a configuration error when `k` was not part of the report.
pub fn gate(report: &RecallReport, k: usize, min_recall: f64) -> Result<GateVerdict> {
    let recall = report.recall_at(k).ok_or_else(|| {
        Error::config(format!(
            "gate cutoff recall@{k} is not among the reported cutoffs"
        ))
    })?;
    Ok(GateVerdict {
        k,
        recall,
        min_recall,
        passed: recall >= min_recall,
    })
}

/// Renders validation problems, warnings included
pub fn format_validation(outcome: &ValidationOutcome) -> String {
    let mut out = String::new();
    for violation in &outcome.violations {
        let tag = if violation.blocking { "error" } else { "warning" };
        out.push_str(&format!("[{tag:>7}] {violation}\n"));
    }
    out.push_str(&format!("Submission is valid: {}\n", outcome.ok));
    out
}

/// Renders counts and per-cutoff recall as a small table
pub fn format_recall_report(report: &RecallReport) -> String {
    let counts = &report.counts;
    let bar = "=".repeat(40);

    let mut out = format!("{bar}\nRETRIEVAL EVALUATION\n{bar}\n");
    out.push_str(&format!(
        "  Questions evaluated:        {}\n",
        counts.total_questions
    ));
    out.push_str(&format!(
        "  Questions with sources:     {}\n",
        counts.questions_with_ground_truth
    ));
    out.push_str(&format!(
        "  Questions with predictions: {}\n",
        counts.questions_with_predictions
    ));
    out.push_str(&"-".repeat(40));
    out.push('\n');
    for entry in &report.per_k {
        let label = format!("Recall@{}", entry.k);
        out.push_str(&format!(
            "  {label:<12} {:.3} ({:.1}%)\n",
            entry.recall,
            entry.recall * 100.0
        ));
    }
    out
}

/// One-line summary of a gate verdict
pub fn format_verdict(verdict: &GateVerdict) -> String {
    let status = if verdict.passed { "PASS" } else { "FAIL" };
    format!(
        "[{status}] recall@{} = {:.1}% (minimum {:.1}%)",
        verdict.k,
        verdict.recall * 100.0,
        verdict.min_recall * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{RecallAtK, RecallCounts};
    use crate::validate::{Violation, ViolationKind};
    use pretty_assertions::assert_eq;

    fn report() -> RecallReport {
        RecallReport {
            per_k: vec![
                RecallAtK { k: 1, recall: 0.5 },
                RecallAtK { k: 5, recall: 0.75 },
            ],
            counts: RecallCounts {
                total_questions: 4,
                questions_with_ground_truth: 3,
                questions_with_predictions: 2,
            },
        }
    }

    #[test]
    fn test_gate_is_inclusive_of_minimum() {
        let verdict = gate(&report(), 5, 0.75).unwrap();
        assert!(verdict.passed);
        assert!(!gate(&report(), 1, 0.75).unwrap().passed);
    }

    #[test]
    fn test_gate_on_missing_cutoff() {
        let err = gate(&report(), 10, 0.75).unwrap_err();
        assert!(err.to_string().contains("recall@10"), "{err}");
    }

    #[test]
    fn test_format_recall_report() {
        let text = format_recall_report(&report());
        assert!(text.contains("Questions evaluated:        4"));
        assert!(text.contains("Questions with sources:     3"));
        assert!(text.contains("Questions with predictions: 2"));
        assert!(text.contains("Recall@1     0.500 (50.0%)"));
        assert!(text.contains("Recall@5     0.750 (75.0%)"));
    }

    #[test]
    fn test_format_recall_report_layout() {
        let bar = "=".repeat(40);
        let rule = "-".repeat(40);
        let expected = format!(
            "{bar}\nRETRIEVAL EVALUATION\n{bar}\n\
             \x20 Questions evaluated:        4\n\
             \x20 Questions with sources:     3\n\
             \x20 Questions with predictions: 2\n\
             {rule}\n\
             \x20 Recall@1     0.500 (50.0%)\n\
             \x20 Recall@5     0.750 (75.0%)\n"
        );
        assert_eq!(format_recall_report(&report()), expected);
    }

    #[test]
    fn test_format_validation_tags_severity() {
        let outcome = ValidationOutcome {
            ok: true,
            violations: vec![Violation {
                kind: ViolationKind::SpanTooLong,
                question_id: Some("q1".to_string()),
                blocking: false,
                message: "source too long".to_string(),
            }],
        };
        assert_eq!(
            format_validation(&outcome),
            "[warning] source too long\nSubmission is valid: true\n"
        );
    }

    #[test]
    fn test_format_verdict() {
        let verdict = gate(&report(), 1, 0.75).unwrap();
        assert_eq!(
            format_verdict(&verdict),
            "[FAIL] recall@1 = 50.0% (minimum 75.0%)"
        );
    }
}
