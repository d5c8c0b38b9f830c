use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reported by the Moodle web service itself. The message is the
    /// one embedded in the remote error body when present.
    #[error("{message}")]
    Remote { message: String },

    #[error("Unexpected response from {function}: {detail}")]
    Decode { function: String, detail: String },
}

impl GatewayError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    pub fn decode(function: &str, detail: impl std::fmt::Display) -> Self {
        Self::Decode {
            function: function.to_string(),
            detail: detail.to_string(),
        }
    }
}
