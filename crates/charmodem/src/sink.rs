//! Downstream output abstraction for the push adapters.

/// Something that accepts one unit at a time, in order, with no feedback.
///
/// The push adapters forward their converted output through this trait. A
/// `Vec<T>` collects units; [`FnSink`] adapts a closure; `&mut S` forwards to
/// another sink, which is how a caller keeps ownership of a sink across an
/// adapter's lifetime.
pub trait Sink<T> {
    /// Accepts the next unit.
    fn accept(&mut self, unit: T);
}

impl<T> Sink<T> for Vec<T> {
    fn accept(&mut self, unit: T) {
        self.push(unit);
    }
}

impl<T, S: Sink<T> + ?Sized> Sink<T> for &mut S {
    fn accept(&mut self, unit: T) {
        (**self).accept(unit);
    }
}

/// Adapts a `FnMut(T)` closure into a [`Sink`].
#[derive(Clone, Copy, Debug)]
pub struct FnSink<F>(pub F);

impl<T, F: FnMut(T)> Sink<T> for FnSink<F> {
    fn accept(&mut self, unit: T) {
        (self.0)(unit);
    }
}
