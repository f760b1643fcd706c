use thiserror::Error;

/// Transport-level failures. Backend rejections are not errors: they come
/// back as envelopes with `success = 0`.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response body (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),
}

#[derive(Error, Debug)]
pub enum ServerLoginError {
    #[error("Server login rejected with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid response from server")]
    InvalidResponse,

    #[error(transparent)]
    Client(#[from] ClientError),
}
