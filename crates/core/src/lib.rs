//! Core types for the moulinette retrieval grader
//!
//! This crate provides the foundational pieces shared by the evaluation
//! engine and the command-line front end:
//!
//! - **Spans**: character ranges within source files, with unset offsets
//!   represented explicitly
//! - **Dataset**: ground-truth questions and the spans that justify them
//! - **Submission**: ranked spans retrieved per question
//! - **Configuration**: grading limits and recall parameters
//! - **Error handling**: unified error types
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod dataset;
pub mod error;
pub mod loading;
pub mod span;
pub mod submission;

// Re-export main types for convenience
pub use config::{Config, EvaluationConfig, SpanLengthPolicy, ValidationConfig};
pub use dataset::{DatasetShape, GroundTruth, Question, RagDataset};
pub use error::{Error, Result, ResultExt};
pub use loading::{load_answer_submission, load_dataset, load_submission};
pub use span::{SourceSpan, SpanRange};
pub use submission::{Submission, SubmittedResult};
