//! Host boundaries: frame scheduling and resize observation.

pub mod headless;

pub use headless::HeadlessHost;

use std::cell::Cell;
use std::rc::Rc;

/// Shared "the surface changed size" flag. The host raises it; the surface
/// manager takes it before its next commit.
#[derive(Debug, Clone, Default)]
pub struct ResizeSignal(Rc<Cell<bool>>);

impl ResizeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self) {
        self.0.set(true);
    }

    /// Clear the flag, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }

    pub fn is_pending(&self) -> bool {
        self.0.get()
    }
}

/// The host's size-change notification service.
pub trait ResizeObserver {
    /// Start raising `signal` whenever the observed surface changes size.
    fn observe(&mut self, signal: ResizeSignal);

    /// Stop observing. Further size changes raise nothing.
    fn disconnect(&mut self);
}
