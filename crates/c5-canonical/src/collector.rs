use crate::canonicalizer::CanonicalizationError;
use crate::event::Event;

/// Consumer of the canonical event stream.
pub trait Collector {
    /// Handles the next event in traversal order.
    fn append(&mut self, event: &Event<'_>) -> Result<(), CanonicalizationError>;
}

impl<C: Collector + ?Sized> Collector for &mut C {
    fn append(&mut self, event: &Event<'_>) -> Result<(), CanonicalizationError> {
        (**self).append(event)
    }
}

/// Feeds every event to two collectors, first then second.
///
/// Lets a single walk drive both a digest and a rendering.
pub struct Tee<A, B>(pub A, pub B);

impl<A: Collector, B: Collector> Collector for Tee<A, B> {
    fn append(&mut self, event: &Event<'_>) -> Result<(), CanonicalizationError> {
        self.0.append(event)?;
        self.1.append(event)
    }
}
