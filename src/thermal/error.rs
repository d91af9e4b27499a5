//! Failure taxonomy for a temperature fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Login was rejected or the BMC was unreachable
    #[error("Please check the username, password, IP is correct\n{0}")]
    Auth(String),

    /// A traversal step answered with something other than HTTP 200
    #[error("Url '{url}' response Error code {status}\nerror_message: {message}")]
    Http { url: String, status: u16, message: String },

    /// A fetched resource lacks a field the traversal needs
    #[error("Url '{url}' is missing {field}")]
    Traversal { url: String, field: String },

    /// Transport or decoding fault mid-traversal
    #[error("exception msg {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl FetchError {
    pub fn traversal(url: &str, field: &str) -> Self {
        FetchError::Traversal { url: url.to_string(), field: field.to_string() }
    }
}
