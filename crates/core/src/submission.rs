//! Submission documents produced by a retrieval pipeline under evaluation

use crate::span::SourceSpan;
use serde::{Deserialize, Serialize};

/// Ranked retrieval output for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedResult {
    pub question_id: String,

    /// Question text echoed back by the submitter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// Retrieved spans, most relevant first
    #[serde(rename = "retrieved_sources")]
    pub ranked_spans: Vec<SourceSpan>,

    /// Generated answer, present in answer-bearing submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl SubmittedResult {
    pub fn new(question_id: impl Into<String>, ranked_spans: Vec<SourceSpan>) -> Self {
        Self {
            question_id: question_id.into(),
            question: None,
            ranked_spans,
            answer: None,
        }
    }
}

/// A full submission: one result per question plus the declared rank depth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(rename = "search_results")]
    pub results: Vec<SubmittedResult>,

    /// Maximum rank depth the submitter claims to have produced
    #[serde(rename = "k")]
    pub declared_k: usize,
}

impl Submission {
    pub fn new(results: Vec<SubmittedResult>, declared_k: usize) -> Self {
        Self {
            results,
            declared_k,
        }
    }

    /// Ids of results that carry no answer
    pub fn unanswered_ids(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.answer.is_none())
            .map(|r| r.question_id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_search_results() {
        let submission: Submission = serde_json::from_str(
            r#"{"search_results": [{
                "question_id": "q1",
                "question": "Where is the parser?",
                "retrieved_sources": [
                    {"file_path": "src/parse.rs", "first_character_index": 0, "last_character_index": 80},
                    {"file_path": "src/lex.rs", "first_character_index": 10, "last_character_index": 30}
                ]
            }], "k": 5}"#,
        )
        .unwrap();

        assert_eq!(submission.declared_k, 5);
        assert_eq!(submission.results.len(), 1);
        assert_eq!(
            submission.results[0].ranked_spans,
            vec![
                SourceSpan::new("src/parse.rs", 0, 80),
                SourceSpan::new("src/lex.rs", 10, 30),
            ]
        );
        assert_eq!(submission.unanswered_ids(), vec!["q1"]);
    }

    #[test]
    fn test_answer_bearing_result() {
        let result: SubmittedResult = serde_json::from_str(
            r#"{"question_id": "q1", "retrieved_sources": [], "answer": "42"}"#,
        )
        .unwrap();
        assert_eq!(result.answer.as_deref(), Some("42"));
        assert_eq!(result.question, None);
    }

    #[test]
    fn test_negative_k_is_rejected() {
        let result: std::result::Result<Submission, _> =
            serde_json::from_str(r#"{"search_results": [], "k": -3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let submission = Submission::new(
            vec![SubmittedResult::new("q1", vec![SourceSpan::new("a.py", 1, 2)])],
            3,
        );
        assert_eq!(
            serde_json::to_value(submission).unwrap(),
            serde_json::json!({
                "search_results": [{
                    "question_id": "q1",
                    "retrieved_sources": [
                        {"file_path": "a.py", "first_character_index": 1, "last_character_index": 2}
                    ]
                }],
                "k": 3
            })
        );
    }
}
