use chrono::{DateTime, Utc};
use std::borrow::Cow;

use crate::canonicalizer::CanonicalizationError;
use crate::value::Number;

/// Timestamp layout: ISO-8601, UTC, millisecond precision, `Z` suffix.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A leaf value as it appears in the canonical event stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// Absent / null.
    Null,
    /// Boolean leaf.
    Bool(bool),
    /// Numeric leaf.
    Number(Number),
    /// String leaf.
    String(&'a str),
    /// UTC timestamp leaf.
    Timestamp(&'a DateTime<Utc>),
}

impl<'a> Scalar<'a> {
    /// Renders the scalar as canonical JSON text.
    ///
    /// Strings and timestamps are JSON-quoted; numbers follow
    /// [`format_number`].
    pub fn to_text(&self) -> Result<String, CanonicalizationError> {
        match self {
            Scalar::Null => Ok("null".to_string()),
            Scalar::Bool(b) => Ok(b.to_string()),
            Scalar::Number(n) => format_number(*n),
            Scalar::String(s) => quote(s),
            Scalar::Timestamp(ts) => quote(&format_timestamp(ts)),
        }
    }

    /// Renders the raw, unquoted form that is fed to the digest.
    pub fn digest_form(&self) -> Result<Cow<'a, str>, CanonicalizationError> {
        match *self {
            Scalar::Null => Ok(Cow::Borrowed("null")),
            Scalar::Bool(true) => Ok(Cow::Borrowed("true")),
            Scalar::Bool(false) => Ok(Cow::Borrowed("false")),
            Scalar::Number(n) => format_number(n).map(Cow::Owned),
            Scalar::String(s) => Ok(Cow::Borrowed(s)),
            Scalar::Timestamp(ts) => Ok(Cow::Owned(format_timestamp(ts))),
        }
    }
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Formats a number in canonical decimal form.
///
/// Floats that are mathematically integral render without a fractional part
/// (`4.0` becomes `4`, `-0.0` becomes `0`); all other finite floats use the
/// shortest representation that round-trips. NaN and infinities have no JSON
/// form and are rejected.
pub fn format_number(n: Number) -> Result<String, CanonicalizationError> {
    match n {
        Number::Int(i) => Ok(i.to_string()),
        Number::UInt(u) => Ok(u.to_string()),
        Number::Float(f) if !f.is_finite() => {
            Err(CanonicalizationError::NonFiniteNumber(f.to_string()))
        }
        Number::Float(f) if f == 0.0 => Ok("0".to_string()),
        Number::Float(f) if f.fract() == 0.0 => Ok(format!("{:.0}", f)),
        Number::Float(f) => serde_json::Number::from_f64(f)
            .map(|n| n.to_string())
            .ok_or_else(|| CanonicalizationError::NonFiniteNumber(f.to_string())),
    }
}

fn quote(s: &str) -> Result<String, CanonicalizationError> {
    serde_json::to_string(s).map_err(|err| CanonicalizationError::Other(err.to_string()))
}
