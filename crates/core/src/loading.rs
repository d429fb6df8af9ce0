//! Loading of dataset and submission documents from JSON files

use crate::dataset::{DatasetShape, RagDataset};
use crate::error::{Error, Result, ResultExt};
use crate::submission::Submission;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, warn};

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
}

fn parse_document<T: DeserializeOwned>(source_name: &str, content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| Error::malformed(source_name, e.to_string()))
}

/// Parses a ground-truth dataset from JSON text
///
/// `source_name` only labels errors and log lines.
pub fn parse_dataset(source_name: &str, content: &str) -> Result<RagDataset> {
    let dataset: RagDataset = parse_document(source_name, content)?;

    if dataset.shape() == DatasetShape::Mixed {
        warn!(
            "Dataset {source_name} mixes answered and unanswered questions; \
             unanswered ones count as fully recalled"
        );
    }
    debug!(
        "Loaded {} questions from {source_name}",
        dataset.rag_questions.len()
    );

    Ok(dataset)
}

/// Parses a submission from JSON text
pub fn parse_submission(source_name: &str, content: &str) -> Result<Submission> {
    let submission: Submission = parse_document(source_name, content)?;
    debug!(
        "Loaded {} search results (k = {}) from {source_name}",
        submission.results.len(),
        submission.declared_k
    );
    Ok(submission)
}

/// Parses a submission in which every result must carry an answer
pub fn parse_answer_submission(source_name: &str, content: &str) -> Result<Submission> {
    let submission = parse_submission(source_name, content)?;
    let missing = submission.unanswered_ids();
    if !missing.is_empty() {
        return Err(Error::malformed(
            source_name,
            format!("search results without an answer: {}", missing.join(", ")),
        ));
    }
    Ok(submission)
}

/// Loads a ground-truth dataset file
pub fn load_dataset(path: &Path) -> Result<RagDataset> {
    parse_dataset(&path.display().to_string(), &read_document(path)?)
}

/// Loads a search-results submission file
pub fn load_submission(path: &Path) -> Result<Submission> {
    parse_submission(&path.display().to_string(), &read_document(path)?)
}

/// Loads an answer-bearing submission file
pub fn load_answer_submission(path: &Path) -> Result<Submission> {
    parse_answer_submission(&path.display().to_string(), &read_document(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_schema_error_is_malformed_input() {
        let err = parse_dataset("dataset.json", r#"{"questions": []}"#).unwrap_err();
        match err {
            Error::MalformedInput {
                source_name,
                message,
            } => {
                assert_eq!(source_name, "dataset.json");
                assert!(message.contains("rag_questions"), "{message}");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_answer_submission_requires_answers() {
        let content = r#"{"search_results": [
            {"question_id": "q1", "retrieved_sources": [], "answer": "yes"},
            {"question_id": "q2", "retrieved_sources": []}
        ], "k": 10}"#;

        assert!(parse_submission("s.json", content).is_ok());
        let err = parse_answer_submission("s.json", content).unwrap_err();
        assert!(err.to_string().contains("without an answer: q2"), "{err}");
    }

    #[test]
    fn test_load_submission_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"search_results": [], "k": 5}"#).unwrap();
        file.flush().unwrap();

        let submission = load_submission(file.path()).unwrap();
        assert_eq!(submission.declared_k, 5);
        assert!(submission.results.is_empty());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_dataset(Path::new("/nonexistent/dataset.json")).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Failed to read /nonexistent/dataset.json"),
            "{err}"
        );
    }
}
