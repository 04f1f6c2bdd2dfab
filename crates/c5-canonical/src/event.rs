use crate::scalar::Scalar;

/// One step of the canonical traversal.
///
/// Starts and ends balance. An [`Event::Attribute`] only appears directly inside
/// an object span and is immediately followed by the events of its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// Opens a sequence.
    ArrayStart,
    /// Closes the innermost sequence.
    ArrayEnd,
    /// Opens a mapping.
    ObjectStart,
    /// Closes the innermost mapping.
    ObjectEnd,
    /// Names the object member whose value follows.
    Attribute(&'a str),
    /// A leaf value.
    Scalar(Scalar<'a>),
}
