//! Ground-truth dataset of questions and the spans that justify their answers

use crate::span::SourceSpan;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the dataset knows about a question's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroundTruth {
    /// The question carries cited sources and a reference answer
    Answered {
        sources: Vec<SourceSpan>,
        answer: String,
    },
    /// The question has no reference answer and no cited sources
    Unanswered,
}

/// A single evaluation question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireQuestion", into = "WireQuestion")]
pub struct Question {
    pub question_id: String,
    pub question: String,
    pub ground_truth: GroundTruth,
}

impl Question {
    /// Spans that a submission has to retrieve for this question
    ///
    /// Unanswered questions cite nothing, so they are satisfied by any
    /// submission.
    pub fn true_spans(&self) -> &[SourceSpan] {
        match &self.ground_truth {
            GroundTruth::Answered { sources, .. } => sources,
            GroundTruth::Unanswered => &[],
        }
    }

    /// Reference answer, if the dataset has one
    pub fn answer(&self) -> Option<&str> {
        match &self.ground_truth {
            GroundTruth::Answered { answer, .. } => Some(answer),
            GroundTruth::Unanswered => None,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.ground_truth, GroundTruth::Answered { .. })
    }
}

/// Kind of entries a dataset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetShape {
    Empty,
    Answered,
    Unanswered,
    /// Answered and unanswered entries side by side
    Mixed,
}

/// Ground-truth dataset document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagDataset {
    pub rag_questions: Vec<Question>,
}

impl RagDataset {
    pub fn new(rag_questions: Vec<Question>) -> Self {
        Self { rag_questions }
    }

    pub fn len(&self) -> usize {
        self.rag_questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rag_questions.is_empty()
    }

    pub fn shape(&self) -> DatasetShape {
        let answered = self.rag_questions.iter().filter(|q| q.is_answered()).count();
        match answered {
            _ if self.rag_questions.is_empty() => DatasetShape::Empty,
            0 => DatasetShape::Unanswered,
            n if n == self.rag_questions.len() => DatasetShape::Answered,
            _ => DatasetShape::Mixed,
        }
    }
}

fn generate_question_id() -> String {
    Uuid::new_v4().to_string()
}

/// JSON shape of a dataset entry; `sources` and `answer` travel together
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireQuestion {
    #[serde(default = "generate_question_id")]
    question_id: String,
    question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<SourceSpan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
}

impl TryFrom<WireQuestion> for Question {
    type Error = String;

    fn try_from(wire: WireQuestion) -> std::result::Result<Self, Self::Error> {
        let ground_truth = match (wire.sources, wire.answer) {
            (Some(sources), Some(answer)) => GroundTruth::Answered { sources, answer },
            (None, None) => GroundTruth::Unanswered,
            (Some(_), None) => {
                return Err(format!(
                    "question '{}' has sources but no answer",
                    wire.question_id
                ))
            }
            (None, Some(_)) => {
                return Err(format!(
                    "question '{}' has an answer but no sources",
                    wire.question_id
                ))
            }
        };

        Ok(Self {
            question_id: wire.question_id,
            question: wire.question,
            ground_truth,
        })
    }
}

impl From<Question> for WireQuestion {
    fn from(question: Question) -> Self {
        let (sources, answer) = match question.ground_truth {
            GroundTruth::Answered { sources, answer } => (Some(sources), Some(answer)),
            GroundTruth::Unanswered => (None, None),
        };
        Self {
            question_id: question.question_id,
            question: question.question,
            sources,
            answer,
        }
    }
}
