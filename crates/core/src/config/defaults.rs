//! Default values and functions for configuration

use super::SpanLengthPolicy;

pub(crate) const DEFAULT_MAX_K: usize = 10;
pub(crate) const DEFAULT_MAX_SPAN_LENGTH: usize = 2000;
pub(crate) const DEFAULT_IOU_THRESHOLD: f64 = 0.01;
pub(crate) const DEFAULT_GATE_K: usize = 5;
pub(crate) const DEFAULT_MIN_RECALL: f64 = 0.75;

pub(crate) fn default_max_k() -> usize {
    DEFAULT_MAX_K
}

pub(crate) fn default_max_span_length() -> usize {
    DEFAULT_MAX_SPAN_LENGTH
}

pub(crate) fn default_span_length_policy() -> SpanLengthPolicy {
    SpanLengthPolicy::Warn
}

pub(crate) fn default_iou_threshold() -> f64 {
    DEFAULT_IOU_THRESHOLD
}

pub(crate) fn default_k_values() -> Vec<usize> {
    vec![1, 3, 5, 10]
}

pub(crate) fn default_gate_k() -> usize {
    DEFAULT_GATE_K
}

pub(crate) fn default_min_recall() -> f64 {
    DEFAULT_MIN_RECALL
}
