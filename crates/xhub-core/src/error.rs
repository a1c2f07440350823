use thiserror::Error;

/// Errors from the admin workflows.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The REST layer failed; carries the full API error.
    #[error(transparent)]
    Api(#[from] xhub_api::Error),

    /// One or more fields failed validation. The save was aborted before
    /// any network call; every failure message is collected.
    #[error("Validation failed: {}", messages.join("; "))]
    Validation { messages: Vec<String> },

    /// A referenced entity does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// An event tracking record carried a payload that did not decode.
    #[error("Malformed tracking payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl CoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// The collected validation messages, empty for other variants.
    pub fn validation_messages(&self) -> &[String] {
        match self {
            Self::Validation { messages } => messages,
            _ => &[],
        }
    }
}
