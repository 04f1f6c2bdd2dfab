//! Envelope construction with content-derived message ids.
//!
//! This crate provides:
//! - `Payload` and `Envelope` records matching the wire shape (`v`, `id`, `src`,
//!   `dst`, `t`, `ttl`, `data`)
//! - An [`EnvelopeBuilder`] that renders canonical envelope JSON, deriving the id
//!   from the payload digest when none is given
//! - Id verification for received envelopes
//!
//! Core invariants:
//! - Derived ids are `"<t>-<digest>"` by default, where the digest is the base58
//!   SHA-256 of the canonical payload body
//! - The payload body is walked once; its rendering is embedded verbatim in the
//!   envelope text
//! - A builder computes each result at most once
//!
#![deny(missing_docs)]

/// Envelope builder and its configuration.
pub mod builder;
/// Time sources.
pub mod clock;
/// Error types for envelope operations.
pub mod errors;
/// Id generation and verification.
pub mod id;
/// Payload and envelope records.
pub mod schema;

pub use builder::{EnvelopeBuilder, EnvelopeOptions, EnvelopeProps, EnvelopeTime};
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{EnvelopeError, IntegrityError, ValidationError};
pub use id::{split_id, verify_envelope_id, HashIdGenerator, IdGenerator, TimeHashIdGenerator};
pub use schema::{Envelope, Payload, Version, DEFAULT_TTL};
