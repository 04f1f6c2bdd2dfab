use thiserror::Error;

/// Input that cannot be read as a payload or envelope.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The document does not match the expected shape.
    #[error("invalid {type_name}: {reason}")]
    Schema {
        /// Name of the expected type.
        type_name: &'static str,
        /// Decoder message.
        reason: String,
    },
}

/// Envelope construction errors.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Payload or envelope input was malformed.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// Canonical rendering or hashing failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] c5_canonical::CanonicalizationError),
}

/// A received envelope whose id does not match its payload.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// The id carries no recognizable digest.
    #[error("id '{0}' does not embed a content digest")]
    NoDigest(String),
    /// The payload hashes to something other than the embedded digest.
    #[error("digest mismatch: id carries {expected}, payload hashes to {actual}")]
    DigestMismatch {
        /// Digest taken from the id.
        expected: String,
        /// Digest recomputed from the payload.
        actual: String,
    },
    /// The payload could not be hashed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] c5_canonical::CanonicalizationError),
}
