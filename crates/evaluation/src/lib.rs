//! Retrieval evaluation for the moulinette grader
//!
//! This crate scores a submission of ranked source spans against a
//! ground-truth dataset:
//! - Span similarity as 1-D intersection-over-union ([`overlap`])
//! - Per-question recall@k ([`recall_at_k`])
//! - Dataset-level recall@k and diagnostic counts ([`aggregate`])
//! - Structural limits checked before scoring ([`validate`])
//!
//! Everything here is pure: the same inputs always give the same report.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod aggregate;
pub mod overlap;
pub mod recall;
pub mod report;
pub mod validate;

pub use aggregate::{
    aggregate, EvaluationPair, RecallAtK, RecallCounts, RecallReport, RecallScores,
};
pub use overlap::overlap;
pub use recall::{recall_at_k, recall_at_k_with, GreedyMatcher, SpanMatcher};
pub use report::{gate, GateVerdict};
pub use validate::{validate, ValidationLimits, ValidationOutcome, Violation, ViolationKind};

use moulinette_core::error::Result;
use moulinette_core::{Config, RagDataset, Submission};
use tracing::info;

/// Everything a grading run produced
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub validation: ValidationOutcome,
    /// Absent when validation failed and scoring was skipped
    pub report: Option<RecallReport>,
    pub verdict: Option<GateVerdict>,
}

impl Grade {
    pub fn passed(&self) -> bool {
        self.validation.ok && self.verdict.is_some_and(|v| v.passed)
    }
}

/// Validates, scores and gates a submission with the given configuration
///
/// A submission that fails validation is not scored. Errors are reserved for
/// inputs that cannot be scored at all, such as unknown question ids or
/// unset spans in the ground truth.
pub fn grade(config: &Config, dataset: &RagDataset, submission: &Submission) -> Result<Grade> {
    let validation = validate(submission, &ValidationLimits::from(&config.validation));
    if !validation.ok {
        info!(
            "Submission rejected with {} blocking violations",
            validation.blocking().count()
        );
        return Ok(Grade {
            validation,
            report: None,
            verdict: None,
        });
    }

    let evaluation = &config.evaluation;
    let report = aggregate(
        &dataset.rag_questions,
        submission,
        evaluation.iou_threshold,
        &evaluation.k_values,
    )?;
    let verdict = gate(&report, evaluation.gate_k, evaluation.min_recall)?;
    info!(
        "recall@{} = {:.3} against minimum {:.3}",
        verdict.k, verdict.recall, verdict.min_recall
    );

    Ok(Grade {
        validation,
        report: Some(report),
        verdict: Some(verdict),
    })
}
