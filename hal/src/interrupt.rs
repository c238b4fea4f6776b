//! Interrupt controller abstraction

use alloc::sync::Arc;

/// Event handler invoked on any recognized timer event.
///
/// The runtime guarantees run-to-completion: a handler is never preempted
/// by another invocation of itself.
pub type EventHandler = Arc<dyn Fn() + Send + Sync>;

/// Registration primitive binding the event handler to the timer's
/// interrupt line.
pub trait IrqController: Send + Sync {
    /// Bind the handler invoked on overflow and compare-match events.
    /// Replaces any previously bound handler.
    fn bind(&self, handler: EventHandler);

    /// Enable delivery of timer events to the bound handler.
    fn enable_irq(&self);
}

impl<T: IrqController + ?Sized> IrqController for Arc<T> {
    fn bind(&self, handler: EventHandler) {
        (**self).bind(handler)
    }

    fn enable_irq(&self) {
        (**self).enable_irq()
    }
}
