use thiserror::Error;

/// Everything that can go wrong between a student client and the server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered 401: the classroom session ended or the cookies
    /// went stale. The student has to join again.
    #[error("Session expired, please join the classroom again")]
    SessionExpired,

    /// The server rejected the request with a non-2xx status.
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body did not have the expected shape.
    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
