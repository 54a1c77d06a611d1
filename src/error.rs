use thiserror::Error;

/// Errors raised while parsing commands, building tasks or touching the save file.
#[derive(Debug, Error)]
pub enum Error {
    /// Any user-facing validation failure. The message is shown as-is.
    #[error("{0}")]
    Invalid(String),

    /// A saved line could not be turned back into a task.
    #[error("Save file line {line}: {message}")]
    Corrupt { line: usize, message: String },

    #[error("Save file could not be accessed: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Invalid(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
