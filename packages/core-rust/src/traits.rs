use crate::event::OperationEvent;

/// Sink for structured calculation events.
///
/// Invoked synchronously after every call made through a
/// [`Calculator`](crate::calculator::Calculator) that has an observer attached,
/// on success and on failure alike. Implementations must not block: they run
/// on the request path.
pub trait OperationObserver: Send + Sync {
    /// Called once per finished calculation.
    fn on_operation(&self, event: &OperationEvent);
}
