//! Error types for Moodring

/// Result type alias using Moodring's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Moodring operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A scorer failed while scoring a single input
    #[error("scorer error: {0}")]
    Scorer(String),

    /// The pretrained model could not be resolved or loaded
    #[error("model load error: {0}")]
    Model(String),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new scorer error
    pub fn scorer(msg: impl Into<String>) -> Self {
        Self::Scorer(msg.into())
    }

    /// Create a new model load error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
