use crate::config::PulseConfig;
use crate::domain::{
    clock::Clock,
    errors::DataUnavailable,
    logging::LogComponent,
    market_data::{PricePoint, repositories::TickerFeed},
};
use futures::future::{AbortHandle, Abortable, FutureExt};
use futures::task::{LocalSpawn, LocalSpawnExt, SpawnError};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const COMPONENT: LogComponent = LogComponent::Application("PricePoller");

/// Outcome of one successful poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTick {
    pub point: PricePoint,
    /// Price differs from the previous successful poll. Consumers use it to
    /// trigger a short highlight; it is not persisted anywhere.
    pub changed: bool,
}

/// Periodic ticker refresh.
///
/// Fetches once on [`start`](Self::start) and then on every interval
/// boundary until stopped or dropped.
pub struct PricePoller<T, C> {
    feed: Rc<T>,
    clock: C,
    interval: Duration,
    pulse: Duration,
    latest: Rc<RefCell<Option<PricePoint>>>,
    running: Option<AbortHandle>,
}

impl<T, C> PricePoller<T, C>
where
    T: TickerFeed + 'static,
    C: Clock + Clone + 'static,
{
    pub fn new(feed: Rc<T>, clock: C, config: &PulseConfig) -> Self {
        Self {
            feed,
            clock,
            interval: config.poll_interval(),
            pulse: config.pulse_duration(),
            latest: Rc::new(RefCell::new(None)),
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Last successful snapshot, kept across failed polls.
    pub fn latest(&self) -> Option<PricePoint> {
        *self.latest.borrow()
    }

    pub fn pulse_duration(&self) -> Duration {
        self.pulse
    }

    /// Spawns the polling task. A running poller is restarted.
    pub fn start<S>(
        &mut self,
        spawner: &S,
        on_update: impl FnMut(Result<PriceTick, DataUnavailable>) + 'static,
    ) -> Result<(), SpawnError>
    where
        S: LocalSpawn + ?Sized,
    {
        self.stop();

        let (handle, registration) = AbortHandle::new_pair();
        let task = poll_loop(
            Rc::clone(&self.feed),
            self.clock.clone(),
            self.interval,
            Rc::clone(&self.latest),
            on_update,
        );
        spawner.spawn_local(Abortable::new(task, registration).map(|_| ()))?;
        self.running = Some(handle);

        log_info!(COMPONENT, "🚀 polling every {}ms", self.interval.as_millis());
        Ok(())
    }

    /// Aborts the polling task, including a fetch in flight. No callback
    /// fires afterwards.
    pub fn stop(&mut self) {
        if let Some(handle) = self.running.take() {
            handle.abort();
            log_info!(COMPONENT, "🛑 polling stopped");
        }
    }
}

impl<T, C> Drop for PricePoller<T, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.running.take() {
            handle.abort();
        }
    }
}

async fn poll_loop<T, C>(
    feed: Rc<T>,
    clock: C,
    interval: Duration,
    latest: Rc<RefCell<Option<PricePoint>>>,
    mut on_update: impl FnMut(Result<PriceTick, DataUnavailable>),
) where
    T: TickerFeed,
    C: Clock,
{
    let interval_ms = (interval.as_millis() as u64).max(1);
    let origin = clock.now_ms();

    loop {
        let outcome = feed.fetch_ticker().await.map(|point| {
            let previous = latest.borrow_mut().replace(point);
            let changed = previous.is_some_and(|prev| prev.price != point.price);
            PriceTick { point, changed }
        });
        on_update(outcome);

        // boundaries that passed during the fetch are skipped
        let elapsed = clock.now_ms().saturating_sub(origin);
        let wait = interval_ms - elapsed % interval_ms;
        log_debug!(COMPONENT, "next poll in {wait}ms");
        clock.sleep(Duration::from_millis(wait)).await;
    }
}
