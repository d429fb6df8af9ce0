//! Recall@k for a single question

use crate::overlap::overlap;
use moulinette_core::error::Result;
use moulinette_core::SourceSpan;

/// Strategy for deciding which ground-truth spans a prediction list covers
pub trait SpanMatcher {
    /// Number of `true_spans` matched by `predicted` at the given threshold
    ///
    /// `predicted` is already truncated to the cutoff and non-empty.
    fn count_found(
        &self,
        true_spans: &[SourceSpan],
        predicted: &[SourceSpan],
        threshold: f64,
    ) -> Result<usize>;
}

/// First-match scan in rank order
///
/// Each true span is matched independently against the predictions, stopping
/// at the first one whose overlap strictly exceeds the threshold. There is no
/// one-to-one assignment: one prediction may cover several true spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMatcher;

impl SpanMatcher for GreedyMatcher {
    fn count_found(
        &self,
        true_spans: &[SourceSpan],
        predicted: &[SourceSpan],
        threshold: f64,
    ) -> Result<usize> {
        let mut found = 0;
        for true_span in true_spans {
            for pred_span in predicted {
                if overlap(true_span, pred_span)? > threshold {
                    found += 1;
                    break;
                }
            }
        }
        Ok(found)
    }
}

/// Fraction of `true_spans` covered by the first `k` of `predicted_spans`
///
/// Returns `1.0` when there is nothing to find and `0.0` when there is
/// something to find but no prediction within the cutoff.
pub fn recall_at_k(
    true_spans: &[SourceSpan],
    predicted_spans: &[SourceSpan],
    threshold: f64,
    k: usize,
) -> Result<f64> {
    recall_at_k_with(&GreedyMatcher, true_spans, predicted_spans, threshold, k)
}

/// [`recall_at_k`] with an explicit matching strategy
pub fn recall_at_k_with<M: SpanMatcher + ?Sized>(
    matcher: &M,
    true_spans: &[SourceSpan],
    predicted_spans: &[SourceSpan],
    threshold: f64,
    k: usize,
) -> Result<f64> {
    if true_spans.is_empty() {
        return Ok(1.0);
    }

    let top_k = &predicted_spans[..k.min(predicted_spans.len())];
    if top_k.is_empty() {
        return Ok(0.0);
    }

    let found = matcher.count_found(true_spans, top_k, threshold)?;
    Ok(found as f64 / true_spans.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use moulinette_core::Error;

    fn span(path: &str, first: usize, last: usize) -> SourceSpan {
        SourceSpan::new(path, first, last)
    }

    #[test]
    fn test_contained_prediction_is_found() {
        let truth = [span("f.py", 0, 100)];
        let pred = [span("f.py", 10, 90)];
        assert_eq!(recall_at_k(&truth, &pred, 0.01, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_other_file_is_not_found() {
        let truth = [span("a.py", 0, 50)];
        let pred = [span("b.py", 0, 50)];
        assert_eq!(recall_at_k(&truth, &pred, 0.01, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_no_true_spans_is_vacuously_recalled() {
        assert_eq!(recall_at_k(&[], &[], 0.5, 0).unwrap(), 1.0);
        assert_eq!(
            recall_at_k(&[], &[span("a.py", 0, 1)], 0.5, 3).unwrap(),
            1.0
        );
    }

    #[test]
    fn test_no_predictions_recalls_nothing() {
        let truth = [span("a.py", 0, 50)];
        assert_eq!(recall_at_k(&truth, &[], 0.01, 5).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_cutoff_discards_predictions() {
        let truth = [span("a.py", 0, 50)];
        let pred = [span("a.py", 0, 50)];
        assert_eq!(recall_at_k(&truth, &pred, 0.01, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_cutoff_truncates_rank_order() {
        let truth = [span("a.py", 0, 50)];
        let pred = [span("z.py", 0, 50), span("a.py", 0, 50)];
        assert_eq!(recall_at_k(&truth, &pred, 0.01, 1).unwrap(), 0.0);
        assert_eq!(recall_at_k(&truth, &pred, 0.01, 2).unwrap(), 1.0);
        assert_eq!(recall_at_k(&truth, &pred, 0.01, 10).unwrap(), 1.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let truth = [span("a.py", 0, 100)];
        // IoU = 50 / 100
        let pred = [span("a.py", 0, 50)];
        assert_eq!(recall_at_k(&truth, &pred, 0.5, 1).unwrap(), 0.0);
        assert_eq!(recall_at_k(&truth, &pred, 0.49, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_partial_recall() {
        let truth = [span("a.py", 0, 100), span("b.py", 0, 100), span("c.py", 0, 100)];
        let pred = [span("b.py", 20, 80)];
        let recall = recall_at_k(&truth, &pred, 0.01, 5).unwrap();
        assert!((recall - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_one_prediction_can_cover_several_true_spans() {
        let truth = [span("a.py", 0, 100), span("a.py", 50, 150)];
        let pred = [span("a.py", 0, 150)];
        assert_eq!(recall_at_k(&truth, &pred, 0.01, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_true_span_propagates() {
        let truth = [SourceSpan::unknown("a.py")];
        let pred = [span("a.py", 0, 10)];
        assert!(matches!(
            recall_at_k(&truth, &pred, 0.01, 1),
            Err(Error::InvalidSpan(_))
        ));
    }

    struct NeverMatches;

    impl SpanMatcher for NeverMatches {
        fn count_found(&self, _: &[SourceSpan], _: &[SourceSpan], _: f64) -> Result<usize> {
            Ok(0)
        }
    }

    #[test]
    fn test_custom_matcher_keeps_edge_cases() {
        let truth = [span("a.py", 0, 10)];
        let pred = [span("a.py", 0, 10)];
        assert_eq!(
            recall_at_k_with(&NeverMatches, &truth, &pred, 0.01, 1).unwrap(),
            0.0
        );
        assert_eq!(
            recall_at_k_with(&NeverMatches, &[], &pred, 0.01, 1).unwrap(),
            1.0
        );
    }
}
