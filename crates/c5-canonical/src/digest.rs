use sha2::{Digest as Sha2Digest, Sha256};

use crate::canonicalizer::{walk, CanonicalizationError};
use crate::collector::Collector;
use crate::event::Event;
use crate::value::Value;

/// Folds the event stream into a content digest.
///
/// Only attribute names and scalar digest forms reach the hash, in event
/// order; brackets contribute nothing. A collector covers one document.
#[derive(Debug, Clone)]
pub struct HashCollector {
    hasher: Sha256,
}

impl Default for HashCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl HashCollector {
    /// Creates a SHA-256 collector.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Base58 (Bitcoin alphabet) encoding of the hash so far.
    ///
    /// Finalizes a copy, so the accumulator is left as is.
    pub fn digest(&self) -> String {
        let bytes = self.hasher.clone().finalize();
        bs58::encode(bytes).into_string()
    }
}

impl Collector for HashCollector {
    fn append(&mut self, event: &Event<'_>) -> Result<(), CanonicalizationError> {
        match event {
            Event::Attribute(name) => self.hasher.update(name.as_bytes()),
            Event::Scalar(scalar) => self.hasher.update(scalar.digest_form()?.as_bytes()),
            _ => {}
        }
        Ok(())
    }
}

/// Computes the base58 SHA-256 content digest of `value`.
pub fn content_digest(value: &Value) -> Result<String, CanonicalizationError> {
    let mut collector = HashCollector::new();
    walk(value, &mut collector)?;
    Ok(collector.digest())
}
