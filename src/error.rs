/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum AlgoliaError {
    /// Missing or empty credentials while building a [`crate::Config`].
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Caller arguments rejected before any request was sent.
    #[error("validation error: {0}")]
    Validation(String),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Every host attempt failed before a response was received.
    #[error("transport failure after {attempts} attempts: {message}")]
    TransportFailure {
        /// Number of attempts made.
        attempts: usize,
        /// Last transport error observed.
        message: String,
    },
    /// The request could not be issued, so no other host was tried.
    #[error("transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),
    /// Response body could not be decoded as JSON.
    #[error("decode error: {0}")]
    Decode(String),
    /// Request payload could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
}

impl AlgoliaError {
    /// Returns the HTTP status for [`AlgoliaError::Http`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether all failover hosts were unreachable.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::TransportFailure { .. })
    }
}
