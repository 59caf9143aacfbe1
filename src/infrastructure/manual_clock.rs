use crate::domain::clock::Clock;
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Virtual clock: time only moves when [`ManualClock::advance`] is called.
///
/// Cloning shares the same timeline. Sleepers whose deadline is reached are
/// woken in deadline order; the caller still has to drive its executor
/// (e.g. `LocalPool::run_until_stalled`) for the woken tasks to run.
#[derive(Clone, Default)]
pub struct ManualClock {
    inner: Rc<RefCell<VirtualTime>>,
}

#[derive(Default)]
struct VirtualTime {
    now_ms: u64,
    sleepers: Vec<(u64, oneshot::Sender<()>)>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { inner: Rc::new(RefCell::new(VirtualTime { now_ms: start_ms, sleepers: Vec::new() })) }
    }

    pub fn advance(&self, by: Duration) {
        let due = {
            let mut time = self.inner.borrow_mut();
            time.now_ms += by.as_millis() as u64;
            let now = time.now_ms;
            let (mut due, pending): (Vec<_>, Vec<_>) =
                time.sleepers.drain(..).partition(|(deadline, _)| *deadline <= now);
            time.sleepers = pending;
            due.sort_by_key(|(deadline, _)| *deadline);
            due
        };
        for (_, waker) in due {
            // receiver gone means the sleeping task was dropped or aborted
            let _ = waker.send(());
        }
    }

    /// Sleepers whose task is still alive and waiting.
    pub fn pending_sleepers(&self) -> usize {
        self.inner.borrow().sleepers.iter().filter(|(_, tx)| !tx.is_canceled()).count()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        if duration.is_zero() {
            return futures::future::ready(()).boxed_local();
        }
        let (tx, rx) = oneshot::channel();
        let mut time = self.inner.borrow_mut();
        let deadline = time.now_ms + duration.as_millis() as u64;
        time.sleepers.push((deadline, tx));
        rx.map(|_| ()).boxed_local()
    }
}
