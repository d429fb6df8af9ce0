//! Structural checks a submission must pass before it is scored

use moulinette_core::config::{SpanLengthPolicy, ValidationConfig};
use moulinette_core::error::{Error, Result};
use moulinette_core::Submission;
use serde::Serialize;
use std::fmt;

/// Limits a submission is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_k: usize,
    pub max_span_length: usize,
    pub span_length_policy: SpanLengthPolicy,
}

impl From<&ValidationConfig> for ValidationLimits {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            max_k: config.max_k,
            max_span_length: config.max_span_length,
            span_length_policy: config.span_length_policy,
        }
    }
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self::from(&ValidationConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    DeclaredKExceedsLimit,
    TooManyResults,
    InvalidSpan,
    SpanTooLong,
}

/// One problem found in a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Question the problem was found in, if it is specific to one
    pub question_id: Option<String>,
    /// Whether this violation makes the submission invalid
    pub blocking: bool,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of validating a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    /// False iff at least one blocking violation was found
    pub ok: bool,
    /// Violations in the order they were found
    pub violations: Vec<Violation>,
}

impl ValidationOutcome {
    fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            ok: !violations.iter().any(|v| v.blocking),
            violations,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    pub fn blocking(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.blocking)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.blocking)
    }

    /// Turns a failed outcome into [`Error::ValidationFailure`]
    pub fn into_result(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(Error::ValidationFailure(
                self.blocking().map(ToString::to_string).collect(),
            ))
        }
    }
}

/// Checks a submission against the given limits
///
/// An over-limit declared k stops validation at once. A result with more
/// spans than `max_k` is reported and its spans are not inspected; later
/// results are still checked. Over-long spans block only under
/// [`SpanLengthPolicy::Reject`]. Unset or empty spans are reported as
/// warnings; they fail scoring only if they are compared with a ground-truth
/// span in the same file.
pub fn validate(submission: &Submission, limits: &ValidationLimits) -> ValidationOutcome {
    if submission.declared_k > limits.max_k {
        return ValidationOutcome::from_violations(vec![Violation {
            kind: ViolationKind::DeclaredKExceedsLimit,
            question_id: None,
            blocking: true,
            message: format!(
                "declared k exceeds limit: submission declares k = {}, the limit is {}",
                submission.declared_k, limits.max_k
            ),
        }]);
    }

    let mut violations = Vec::new();
    for result in &submission.results {
        let count = result.ranked_spans.len();
        if count > limits.max_k {
            violations.push(Violation {
                kind: ViolationKind::TooManyResults,
                question_id: Some(result.question_id.clone()),
                blocking: true,
                message: format!(
                    "search result {} has {count} sources, more than the limit of {}",
                    result.question_id, limits.max_k
                ),
            });
            continue;
        }

        for span in &result.ranked_spans {
            let Some(length) = span.char_len() else {
                violations.push(Violation {
                    kind: ViolationKind::InvalidSpan,
                    question_id: Some(result.question_id.clone()),
                    blocking: false,
                    message: format!(
                        "source {span} in search result {} has unset or empty bounds",
                        result.question_id
                    ),
                });
                continue;
            };

            if length > limits.max_span_length {
                violations.push(Violation {
                    kind: ViolationKind::SpanTooLong,
                    question_id: Some(result.question_id.clone()),
                    blocking: limits.span_length_policy == SpanLengthPolicy::Reject,
                    message: format!(
                        "source {span} has a length of {length} which is more than the limit of {} characters",
                        limits.max_span_length
                    ),
                });
            }
        }
    }

    ValidationOutcome::from_violations(violations)
}
