//! Error taxonomy for fizzy-cli
//!
//! Every failure terminates the running command. Usage errors exit with 2 so
//! scripts can tell a malformed invocation apart from a failed request.

use crate::http::ApiError;

/// Exit code for a malformed invocation
pub const EXIT_USAGE: i32 = 2;

/// Exit code for every other failure
pub const EXIT_FAILURE: i32 = 1;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Missing or conflicting arguments, missing credentials or account
    #[error("{0}")]
    Usage(String),

    /// Transport-level failure (DNS, connect, timeout, TLS)
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// Non-2xx response from the API
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Response body is not JSON or does not have the expected shape
    #[error("invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid value for header {0}")]
    InvalidHeader(String),

    #[error("config file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A required field is absent from an otherwise valid response
    #[error("missing {0} in response")]
    MissingField(&'static str),

    #[error("pagination cycle detected: {0} was already fetched")]
    PaginationCycle(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage(message.into())
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, CliError::Usage(_))
    }

    /// The message followed by every underlying cause it does not already
    /// include, e.g. `error sending request for url (..): client error
    /// (Connect): tcp connect error: Connection refused`
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !text.is_empty() && !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            EXIT_USAGE
        } else {
            EXIT_FAILURE
        }
    }
}
