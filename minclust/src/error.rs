use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by cluster operations and the store adapter.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing key-value store failed. Pipelined writes are
    /// all-or-nothing, so no partial commit is retained.
    #[error("index store failure: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No signature is stored for the subject.
    #[error("no signature stored for subject `{0}`")]
    UnknownSubject(String),

    /// The stored signature is not a JSON array of 64-bit values of the
    /// configured length.
    #[error("malformed signature for subject `{subject}`: {detail}")]
    CorruptSignature { subject: String, detail: String },

    /// A signature could not be encoded for storage.
    #[error("signature encoding failure: {0}")]
    Codec(#[from] serde_json::Error),
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Store(Box::new(err))
    }
}
