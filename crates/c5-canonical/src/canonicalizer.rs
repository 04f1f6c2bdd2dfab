use std::fmt;

use crate::collector::Collector;
use crate::event::Event;
use crate::scalar::Scalar;
use crate::value::Value;

/// Deepest container nesting accepted by [`walk`].
pub const MAX_DEPTH: usize = 128;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// The event stream does not describe a well-formed value.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number has no canonical form: {0}")]
    NonFiniteNumber(String),
    /// Containers nest deeper than the walker allows.
    #[error("nesting deeper than {limit} at {path}")]
    DepthExceeded {
        /// Configured nesting limit.
        limit: usize,
        /// Location of the first container past the limit.
        path: String,
    },
    /// The text sink refused a fragment.
    #[error("output sink rejected a fragment")]
    Sink(#[from] fmt::Error),
    /// Generic failure.
    #[error("other error: {0}")]
    Other(String),
}

/// Location inside the value being walked, used for error reporting.
#[derive(Debug, Clone, Default)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn push_field(&mut self, field: &str) {
        self.segments.push(field.to_string());
    }

    fn push_index(&mut self, index: usize) {
        self.segments.push(format!("[{}]", index));
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Walks `value` into `collector` with the default [`MAX_DEPTH`] guard.
///
/// Sequences keep their order; object keys are visited in ascending byte-wise
/// order, each as an [`Event::Attribute`] followed by the key's value.
pub fn walk<C: Collector + ?Sized>(
    value: &Value,
    collector: &mut C,
) -> Result<(), CanonicalizationError> {
    walk_with_limit(value, collector, MAX_DEPTH)
}

/// Walks `value` into `collector`, refusing containers nested deeper than `limit`.
pub fn walk_with_limit<C: Collector + ?Sized>(
    value: &Value,
    collector: &mut C,
    limit: usize,
) -> Result<(), CanonicalizationError> {
    let mut walker = Walker {
        limit,
        path: Path::default(),
    };
    walker.visit(value, 0, collector)
}

struct Walker {
    limit: usize,
    path: Path,
}

impl Walker {
    fn visit<C: Collector + ?Sized>(
        &mut self,
        value: &Value,
        depth: usize,
        collector: &mut C,
    ) -> Result<(), CanonicalizationError> {
        match value {
            Value::Array(items) => {
                self.enter(depth)?;
                collector.append(&Event::ArrayStart)?;
                for (idx, item) in items.iter().enumerate() {
                    self.path.push_index(idx);
                    self.visit(item, depth + 1, collector)?;
                    self.path.pop();
                }
                collector.append(&Event::ArrayEnd)
            }
            Value::Object(map) => {
                self.enter(depth)?;
                collector.append(&Event::ObjectStart)?;
                // str ordering is byte-wise, never locale-aware.
                let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
                keys.sort_unstable();
                for key in keys {
                    collector.append(&Event::Attribute(key))?;
                    self.path.push_field(key);
                    self.visit(&map[key], depth + 1, collector)?;
                    self.path.pop();
                }
                collector.append(&Event::ObjectEnd)
            }
            Value::Null => collector.append(&Event::Scalar(Scalar::Null)),
            Value::Bool(b) => collector.append(&Event::Scalar(Scalar::Bool(*b))),
            Value::Number(n) => collector.append(&Event::Scalar(Scalar::Number(*n))),
            Value::String(s) => collector.append(&Event::Scalar(Scalar::String(s))),
            Value::Timestamp(ts) => collector.append(&Event::Scalar(Scalar::Timestamp(ts))),
        }
    }

    fn enter(&self, depth: usize) -> Result<(), CanonicalizationError> {
        if depth >= self.limit {
            tracing::warn!(limit = self.limit, path = %self.path, "value nests too deep");
            return Err(CanonicalizationError::DepthExceeded {
                limit: self.limit,
                path: self.path.to_string(),
            });
        }
        Ok(())
    }
}
