use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotelyError {
    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl NotelyError {
    /// Client errors (4xx) will fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            NotelyError::Http { status, .. } => !(400..500).contains(status),
            NotelyError::Network(_) | NotelyError::Io(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, NotelyError>;
