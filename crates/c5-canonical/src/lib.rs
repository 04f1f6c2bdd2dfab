//! Canonical rendering and content digests for c5 payloads.
//!
//! A value is walked in a fixed order (object keys ascending byte-wise,
//! sequences as given) into a stream of [`Event`]s. Collectors consume that
//! stream: [`TextCollector`] renders canonical JSON and [`HashCollector`]
//! folds it into a base58 SHA-256 digest. Both see the same scalar
//! normalization, so equal values always render and hash identically.
//!
#![deny(missing_docs)]

/// Structural traversal and canonicalization errors.
pub mod canonicalizer;
/// Event stream consumers.
pub mod collector;
/// Hash collector and digest helpers.
pub mod digest;
/// Canonical traversal events.
pub mod event;
/// Leaf formatting in text and digest form.
pub mod scalar;
/// Canonical JSON rendering.
pub mod text;
/// JSON-like value model.
pub mod value;

pub use canonicalizer::{walk, walk_with_limit, CanonicalizationError, MAX_DEPTH};
pub use collector::{Collector, Tee};
pub use digest::{content_digest, HashCollector};
pub use event::Event;
pub use scalar::{format_number, format_timestamp, Scalar};
pub use text::{to_canonical_string, JsonProps, TextCollector};
pub use value::{Map, Number, Value};
