//! Character spans within source files
//!
//! A [`SourceSpan`] is the unit a retrieval pipeline returns and the unit the
//! ground truth cites. On the wire both bounds are plain integers and `-1`
//! marks an offset that was never set; in memory that case is
//! [`SpanRange::Unknown`] so it can never be compared by accident. A bound
//! that was set is kept even when the other one was not.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire value marking an unset character offset
pub const UNSET_INDEX: i64 = -1;

/// Half-open character range `[first, last)` or a range with an unset bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanRange {
    Known { first: usize, last: usize },
    /// At least one bound is unset; `None` marks the unset side
    Unknown {
        first: Option<usize>,
        last: Option<usize>,
    },
}

/// A character range inside a named file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireSpan", into = "WireSpan")]
pub struct SourceSpan {
    pub file_path: String,
    pub range: SpanRange,
}

impl SourceSpan {
    /// Creates a span with known bounds
    ///
    /// Bounds are stored as given; a span with `last <= first` is kept so that
    /// validation can report it instead of losing it at construction.
    pub fn new(file_path: impl Into<String>, first: usize, last: usize) -> Self {
        Self {
            file_path: file_path.into(),
            range: SpanRange::Known { first, last },
        }
    }

    /// Creates a span whose offsets were never set
    pub fn unknown(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            range: SpanRange::Unknown {
                first: None,
                last: None,
            },
        }
    }

    /// Returns `(first, last)` when both bounds are known
    pub fn bounds(&self) -> Option<(usize, usize)> {
        match self.range {
            SpanRange::Known { first, last } => Some((first, last)),
            SpanRange::Unknown { .. } => None,
        }
    }

    /// Number of characters covered, if the span is well formed
    pub fn char_len(&self) -> Option<usize> {
        self.bounds()
            .and_then(|(first, last)| last.checked_sub(first))
            .filter(|len| *len > 0)
    }

    /// True when both bounds are known and `last > first`
    pub fn is_well_formed(&self) -> bool {
        self.char_len().is_some()
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            SpanRange::Known { first, last } => write!(f, "{}[{first}:{last}]", self.file_path),
            SpanRange::Unknown {
                first: None,
                last: None,
            } => write!(f, "{}[unset]", self.file_path),
            SpanRange::Unknown { first, last } => write!(
                f,
                "{}[{}:{}]",
                self.file_path,
                bound_label(first),
                bound_label(last)
            ),
        }
    }
}

fn bound_label(bound: Option<usize>) -> String {
    bound.map_or_else(|| "unset".to_string(), |b| b.to_string())
}

/// JSON shape shared by dataset sources and submission results
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireSpan {
    file_path: String,
    first_character_index: i64,
    last_character_index: i64,
}

impl TryFrom<WireSpan> for SourceSpan {
    type Error = String;

    fn try_from(wire: WireSpan) -> std::result::Result<Self, Self::Error> {
        let WireSpan {
            file_path,
            first_character_index: first,
            last_character_index: last,
        } = wire;

        let first = decode_bound(first, "first_character_index", &file_path)?;
        let last = decode_bound(last, "last_character_index", &file_path)?;

        let range = match (first, last) {
            (Some(first), Some(last)) => SpanRange::Known { first, last },
            (first, last) => SpanRange::Unknown { first, last },
        };
        Ok(Self { file_path, range })
    }
}

/// `None` for the unset sentinel, an error for any other negative index
fn decode_bound(
    index: i64,
    field: &str,
    file_path: &str,
) -> std::result::Result<Option<usize>, String> {
    if index == UNSET_INDEX {
        return Ok(None);
    }
    usize::try_from(index)
        .map(Some)
        .map_err(|_| format!("negative {field} {index} for {file_path}"))
}

fn encode_bound(bound: Option<usize>) -> i64 {
    bound.map_or(UNSET_INDEX, |b| i64::try_from(b).unwrap_or(i64::MAX))
}

impl From<SourceSpan> for WireSpan {
    fn from(span: SourceSpan) -> Self {
        let (first, last) = match span.range {
            SpanRange::Known { first, last } => (Some(first), Some(last)),
            SpanRange::Unknown { first, last } => (first, last),
        };
        Self {
            file_path: span.file_path,
            first_character_index: encode_bound(first),
            last_character_index: encode_bound(last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_known_span() {
        let span: SourceSpan = serde_json::from_str(
            r#"{"file_path": "src/lib.rs", "first_character_index": 10, "last_character_index": 90}"#,
        )
        .unwrap();
        assert_eq!(span, SourceSpan::new("src/lib.rs", 10, 90));
        assert_eq!(span.char_len(), Some(80));
    }

    #[test]
    fn test_sentinel_becomes_unknown() {
        let span: SourceSpan = serde_json::from_str(
            r#"{"file_path": "a.py", "first_character_index": -1, "last_character_index": 40}"#,
        )
        .unwrap();
        assert_eq!(
            span.range,
            SpanRange::Unknown {
                first: None,
                last: Some(40)
            }
        );
        assert!(!span.is_well_formed());
        assert_eq!(span.to_string(), "a.py[unset:40]");
    }

    #[test]
    fn test_half_set_span_keeps_known_bound_on_round_trip() {
        let wire = serde_json::json!({
            "file_path": "a.py",
            "first_character_index": 10,
            "last_character_index": -1
        });
        let span: SourceSpan = serde_json::from_value(wire.clone()).unwrap();

        assert_eq!(span.bounds(), None);
        assert_eq!(span.to_string(), "a.py[10:unset]");
        assert_eq!(serde_json::to_value(&span).unwrap(), wire);
    }

    #[test]
    fn test_other_negative_index_is_rejected() {
        let result: std::result::Result<SourceSpan, _> = serde_json::from_str(
            r#"{"file_path": "a.py", "first_character_index": -5, "last_character_index": 40}"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("negative first_character_index -5"), "{err}");
    }

    #[test]
    fn test_empty_and_inverted_spans_are_not_well_formed() {
        assert!(!SourceSpan::new("a.py", 5, 5).is_well_formed());
        assert!(!SourceSpan::new("a.py", 9, 5).is_well_formed());
        assert_eq!(SourceSpan::new("a.py", 9, 5).char_len(), None);
    }

    #[test]
    fn test_unknown_serializes_back_to_sentinel() {
        let json = serde_json::to_value(SourceSpan::unknown("a.py")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "file_path": "a.py",
                "first_character_index": -1,
                "last_character_index": -1
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceSpan::new("f.py", 0, 100).to_string(), "f.py[0:100]");
        assert_eq!(SourceSpan::unknown("f.py").to_string(), "f.py[unset]");
    }
}
