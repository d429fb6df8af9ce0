//! Intersection-over-union of two character spans

use moulinette_core::error::{Error, Result};
use moulinette_core::SourceSpan;

/// Bounds of a span that may take part in a comparison
fn comparable_bounds(span: &SourceSpan) -> Result<(usize, usize)> {
    match span.bounds() {
        Some((first, last)) if last > first => Ok((first, last)),
        Some(_) => Err(Error::invalid_span(format!(
            "{span} has a non-positive length"
        ))),
        None => Err(Error::invalid_span(format!("{span} has unset bounds"))),
    }
}

/// Similarity of two spans as a 1-D Jaccard index in `[0, 1]`
///
/// Spans in different files score `0.0` without their bounds being looked at.
/// Spans in the same file must both be well formed, otherwise
/// [`Error::InvalidSpan`] is returned.
pub fn overlap(a: &SourceSpan, b: &SourceSpan) -> Result<f64> {
    if a.file_path != b.file_path {
        return Ok(0.0);
    }

    let (a_first, a_last) = comparable_bounds(a)?;
    let (b_first, b_last) = comparable_bounds(b)?;

    let intersection = a_last.min(b_last).saturating_sub(a_first.max(b_first));
    // both lengths are positive and intersection <= either length, so union > 0
    let union = (a_last - a_first) + (b_last - b_first) - intersection;

    Ok(intersection as f64 / union as f64)
}
