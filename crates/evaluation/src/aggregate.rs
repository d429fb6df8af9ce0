//! Dataset-level recall@k

use crate::recall::recall_at_k;
use moulinette_core::error::{Error, Result};
use moulinette_core::{Question, SourceSpan, Submission};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Ground truth and predictions for one question, joined by id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationPair<'a> {
    pub true_spans: &'a [SourceSpan],
    pub predicted_spans: &'a [SourceSpan],
}

/// Average recall at one cutoff
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RecallAtK {
    pub k: usize,
    pub recall: f64,
}

/// Diagnostic counts gathered while joining a submission to a dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RecallCounts {
    pub total_questions: usize,
    pub questions_with_ground_truth: usize,
    pub questions_with_predictions: usize,
}

/// Outcome of one evaluation run
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RecallReport {
    /// One entry per requested cutoff, in request order
    pub per_k: Vec<RecallAtK>,
    pub counts: RecallCounts,
}

impl RecallReport {
    /// Average recall at cutoff `k`, if it was requested
    pub fn recall_at(&self, k: usize) -> Option<f64> {
        self.per_k.iter().find(|r| r.k == k).map(|r| r.recall)
    }

    /// The `"recall@k" -> value` view of the report
    pub fn scores(&self) -> RecallScores<'_> {
        RecallScores(&self.per_k)
    }
}

/// Serializes as a JSON object keyed `"recall@<k>"`, keeping request order
#[derive(Debug, Clone, Copy)]
pub struct RecallScores<'a>(&'a [RecallAtK]);

impl Serialize for RecallScores<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&format!("recall@{}", entry.k), &entry.recall)?;
        }
        map.end()
    }
}

/// Joins questions with submitted results in dataset order
///
/// Questions the submission does not mention get no predictions. A repeated
/// result for the same question replaces the earlier one.
pub fn join<'a>(
    dataset: &'a [Question],
    submission: &'a Submission,
) -> Result<Vec<(&'a str, EvaluationPair<'a>)>> {
    let mut pairs = Vec::with_capacity(dataset.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(dataset.len());

    for question in dataset {
        let id = question.question_id.as_str();
        if index.insert(id, pairs.len()).is_some() {
            return Err(Error::malformed(
                "dataset",
                format!("duplicate question_id '{id}'"),
            ));
        }
        pairs.push((
            id,
            EvaluationPair {
                true_spans: question.true_spans(),
                predicted_spans: &[],
            },
        ));
    }

    let mut assigned = vec![false; pairs.len()];
    for result in &submission.results {
        let slot = *index
            .get(result.question_id.as_str())
            .ok_or_else(|| Error::unknown_question(&result.question_id))?;
        if assigned[slot] {
            warn!(
                "Submission has more than one result for question '{}'; keeping the last",
                result.question_id
            );
        }
        assigned[slot] = true;
        pairs[slot].1.predicted_spans = result.ranked_spans.as_slice();
    }

    Ok(pairs)
}

fn check_true_spans(pairs: &[(&str, EvaluationPair<'_>)]) -> Result<()> {
    for (id, pair) in pairs {
        if let Some(span) = pair.true_spans.iter().find(|s| !s.is_well_formed()) {
            return Err(Error::invalid_span(format!(
                "ground-truth source {span} of question '{id}' has unset or empty bounds"
            )));
        }
    }
    Ok(())
}

/// Recall@k averaged over every question of the dataset
///
/// The denominator is the number of questions in `dataset`, so questions
/// missing from the submission pull the average down unless they cite no
/// spans. Repeated values in `k_values` are reported once. An empty dataset
/// reports `0.0` at every cutoff.
///
/// Every ground-truth span must be well formed. An unset or empty one fails
/// with [`Error::InvalidSpan`] before anything is compared, whether or not a
/// prediction shares its file.
pub fn aggregate(
    dataset: &[Question],
    submission: &Submission,
    threshold: f64,
    k_values: &[usize],
) -> Result<RecallReport> {
    let pairs = join(dataset, submission)?;
    check_true_spans(&pairs)?;

    let counts = RecallCounts {
        total_questions: pairs.len(),
        questions_with_ground_truth: pairs
            .iter()
            .filter(|(_, pair)| !pair.true_spans.is_empty())
            .count(),
        questions_with_predictions: pairs
            .iter()
            .filter(|(_, pair)| !pair.predicted_spans.is_empty())
            .count(),
    };
    debug!(
        "Joined {} questions: {} with ground truth, {} with predictions",
        counts.total_questions, counts.questions_with_ground_truth, counts.questions_with_predictions
    );

    let mut cutoffs: Vec<usize> = Vec::with_capacity(k_values.len());
    for &k in k_values {
        if !cutoffs.contains(&k) {
            cutoffs.push(k);
        }
    }

    let mut per_k = Vec::with_capacity(cutoffs.len());
    for k in cutoffs {
        let mut total = 0.0;
        for (_, pair) in &pairs {
            total += recall_at_k(pair.true_spans, pair.predicted_spans, threshold, k)?;
        }
        let recall = if pairs.is_empty() {
            0.0
        } else {
            total / pairs.len() as f64
        };
        debug!("recall@{k} = {recall:.4}");
        per_k.push(RecallAtK { k, recall });
    }

    Ok(RecallReport { per_k, counts })
}
