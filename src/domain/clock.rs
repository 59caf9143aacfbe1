use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Duration;

/// Time source and timer used by every scheduled or time-bounded operation.
///
/// Implementations: `BrowserClock` for the page event loop and `ManualClock`
/// for virtual time in tests.
pub trait Clock {
    /// Milliseconds since the Unix epoch (or since the virtual origin).
    fn now_ms(&self) -> u64;

    /// Future that resolves once `duration` has elapsed on this clock.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        (**self).sleep(duration)
    }
}
