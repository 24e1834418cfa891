use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The converter rejected the CSS it was given.
    #[error("Converter rejected input: {0}")]
    Syntax(String),

    /// The converter call itself failed (crashed, channel closed, process error).
    #[error("Converter call failed: {0}")]
    Transport(String),

    #[error("Converter did not answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ConvertError {
    /// Fixed label shown to the user. Converter detail is never included.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConvertError::Syntax(_) => "Syntax Error",
            ConvertError::Transport(_) | ConvertError::Timeout { .. } => "Server Error",
            ConvertError::Config(_) | ConvertError::Io(_) => "Configuration Error",
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConvertError {
    fn from(err: serde_yaml::Error) -> Self {
        ConvertError::Config(err.to_string())
    }
}
