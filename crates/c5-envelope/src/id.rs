//! Message id derivation and verification.
//!
//! Derived ids embed the payload digest, by default as `"<t>-<digest>"`.
//! [`verify_envelope_id`] recomputes the digest of a received payload and
//! checks it against the id.

use c5_canonical::content_digest;
use regex::Regex;

use crate::errors::IntegrityError;
use crate::schema::Envelope;

/// Builds a message id from the envelope time and the payload digest.
pub trait IdGenerator: Send + Sync {
    /// Returns the id for time `t` (ms since epoch) and base58 `digest`.
    fn generate(&self, t: i64, digest: &str) -> String;
}

/// Default generator: `"<t>-<digest>"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeHashIdGenerator;

impl IdGenerator for TimeHashIdGenerator {
    fn generate(&self, t: i64, digest: &str) -> String {
        format!("{}-{}", t, digest)
    }
}

/// Digest only, without the time prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashIdGenerator;

impl IdGenerator for HashIdGenerator {
    fn generate(&self, _t: i64, digest: &str) -> String {
        digest.to_string()
    }
}

impl<F> IdGenerator for F
where
    F: Fn(i64, &str) -> String + Send + Sync,
{
    fn generate(&self, t: i64, digest: &str) -> String {
        self(t, digest)
    }
}

/// Splits an id into its optional time prefix and its digest.
///
/// Accepts both `"<t>-<digest>"` and a bare digest. Returns `None` for ids
/// that carry no base58 SHA-256 digest (e.g. caller-chosen ids).
pub fn split_id(id: &str) -> Option<(Option<i64>, &str)> {
    let re = Regex::new(r"^(?:(-?[0-9]+)-)?([1-9A-HJ-NP-Za-km-z]{32,44})$").expect("invalid regex");
    let caps = re.captures(id)?;
    let t = match caps.get(1) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };
    let digest = caps.get(2)?.as_str();
    Some((t, digest))
}

/// Checks that the digest embedded in `envelope.id` matches its payload data.
pub fn verify_envelope_id(envelope: &Envelope) -> Result<(), IntegrityError> {
    let (_, expected) =
        split_id(&envelope.id).ok_or_else(|| IntegrityError::NoDigest(envelope.id.clone()))?;
    let actual = content_digest(&envelope.data.data)?;
    if actual != expected {
        tracing::debug!(id = %envelope.id, %actual, "envelope digest mismatch");
        return Err(IntegrityError::DigestMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}
