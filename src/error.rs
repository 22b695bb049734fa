/// Error taxonomy for talking to a YOURLS server
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KurlError {
    /// Base URL or API signature has not been saved yet
    #[error("Please configure the YOURLS URL and API signature in the options page.")]
    MissingSettings,

    /// The user has not granted access to the server's origin
    #[error("Host permission was not granted for {0}")]
    PermissionDenied(String),

    #[error("Short URL not found.")]
    NotFound,

    #[error("This keyword is already taken. Please choose another one.")]
    KeywordTaken,

    #[error("Please enter a short URL or keyword to delete.")]
    MissingKeyword,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-ok status or a body we could not make sense of
    #[error("{0}")]
    Remote(String),

    /// Network failure or a rejected promise from the browser bridge
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type KurlResult<T> = Result<T, KurlError>;
