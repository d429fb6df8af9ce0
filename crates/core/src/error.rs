use thiserror::Error;

/// Result type for moulinette operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for moulinette operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A document does not match its expected JSON schema
    #[error("Malformed input in {source_name}: {message}")]
    MalformedInput {
        source_name: String,
        message: String,
    },

    /// A span with unset or non-positive-length bounds reached the comparator
    #[error("Invalid span: {0}")]
    InvalidSpan(String),

    /// A submission references a question that is not in the dataset
    #[error("Unknown question id '{0}' in submission")]
    UnknownQuestionId(String),

    /// The submission broke one or more blocking limits
    #[error("Submission failed validation: {}", .0.join("; "))]
    ValidationFailure(Vec<String>),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a malformed input error for the named document
    pub fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid span error
    pub fn invalid_span(msg: impl Into<String>) -> Self {
        Self::InvalidSpan(msg.into())
    }

    /// Creates an unknown question id error
    pub fn unknown_question(question_id: impl Into<String>) -> Self {
        Self::UnknownQuestionId(question_id.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failure_lists_every_violation() {
        let err = Error::ValidationFailure(vec![
            "declared k 15 exceeds limit 10".to_string(),
            "q2 has 12 sources".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Submission failed validation: declared k 15 exceeds limit 10; q2 has 12 sources"
        );
    }

    #[test]
    fn test_malformed_names_the_source() {
        let err = Error::malformed("dataset.json", "missing field `question`");
        assert_eq!(
            err.to_string(),
            "Malformed input in dataset.json: missing field `question`"
        );
    }

    #[test]
    fn test_context_wraps_source_error() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = io.context("Failed to read submission").unwrap_err();
        assert_eq!(err.to_string(), "Failed to read submission: no such file");
    }
}
