mod common;

use common::{FakeActor, FakeSource, Reply};
use futures::executor::LocalPool;
use icp_price_pulse::application::{DataSourceClient, PricePoller, PriceTick};
use icp_price_pulse::config::PulseConfig;
use icp_price_pulse::domain::clock::Clock;
use icp_price_pulse::domain::errors::{DataUnavailable, NetworkError, SourceError};
use icp_price_pulse::domain::market_data::{Price, PricePoint, TickerQuote, Timestamp, repositories::TickerFeed};
use icp_price_pulse::infrastructure::{ManualClock, ProxySource};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

const INTERVAL: Duration = Duration::from_secs(30);

fn unavailable() -> DataUnavailable {
    DataUnavailable::new(NetworkError::Status(500).into(), NetworkError::Rpc("down".into()).into())
}

/// Answers prices from a script; `None` entries fail. Records call times.
struct ScriptedTicker {
    clock: ManualClock,
    script: RefCell<VecDeque<Option<f64>>>,
    latency: Duration,
    calls: RefCell<Vec<u64>>,
}

impl ScriptedTicker {
    fn new(clock: &ManualClock, script: impl IntoIterator<Item = Option<f64>>) -> Rc<Self> {
        Self::slow(clock, script, Duration::ZERO)
    }

    fn slow(clock: &ManualClock, script: impl IntoIterator<Item = Option<f64>>, latency: Duration) -> Rc<Self> {
        Rc::new(Self {
            clock: clock.clone(),
            script: RefCell::new(script.into_iter().collect()),
            latency,
            calls: RefCell::default(),
        })
    }
}

impl TickerFeed for ScriptedTicker {
    async fn fetch_ticker(&self) -> Result<PricePoint, DataUnavailable> {
        self.calls.borrow_mut().push(self.clock.now_ms());
        self.clock.sleep(self.latency).await;
        let next = self.script.borrow_mut().pop_front().flatten();
        let price = next.ok_or_else(unavailable)?;
        let quote = TickerQuote { price: Price::from(price), change_24h_percent: 0.0 };
        Ok(PricePoint::from_quote(quote, 500_000_000.0, Timestamp::from_millis(self.clock.now_ms())))
    }
}

type Outcomes = Rc<RefCell<Vec<Result<PriceTick, DataUnavailable>>>>;

fn recorder() -> (Outcomes, impl FnMut(Result<PriceTick, DataUnavailable>) + 'static) {
    let outcomes: Outcomes = Rc::default();
    let sink = Rc::clone(&outcomes);
    (outcomes, move |outcome| sink.borrow_mut().push(outcome))
}

fn changed_flags(outcomes: &Outcomes) -> Vec<Option<bool>> {
    outcomes.borrow().iter().map(|o| o.as_ref().ok().map(|tick| tick.changed)).collect()
}

#[test]
fn polls_immediately_then_on_cadence() {
    let clock = ManualClock::default();
    let feed = ScriptedTicker::new(&clock, [Some(5.0), Some(5.0), Some(5.1)]);
    let mut poller = PricePoller::new(Rc::clone(&feed), clock.clone(), &PulseConfig::default());
    let mut pool = LocalPool::new();
    let (outcomes, on_update) = recorder();

    poller.start(&pool.spawner(), on_update).unwrap();
    pool.run_until_stalled();
    assert_eq!(*feed.calls.borrow(), vec![0]);

    for _ in 0..2 {
        clock.advance(INTERVAL);
        pool.run_until_stalled();
    }

    assert_eq!(*feed.calls.borrow(), vec![0, 30_000, 60_000]);
    assert_eq!(changed_flags(&outcomes), vec![Some(false), Some(false), Some(true)]);
    assert_eq!(poller.latest().map(|p| p.price.value()), Some(5.1));
}

#[test]
fn failure_is_reported_and_polling_continues() {
    let clock = ManualClock::default();
    let feed = ScriptedTicker::new(&clock, [Some(5.0), None, Some(5.0), Some(6.0)]);
    let mut poller = PricePoller::new(Rc::clone(&feed), clock.clone(), &PulseConfig::default());
    let mut pool = LocalPool::new();
    let (outcomes, on_update) = recorder();

    poller.start(&pool.spawner(), on_update).unwrap();
    pool.run_until_stalled();
    clock.advance(INTERVAL);
    pool.run_until_stalled();
    assert_eq!(poller.latest().map(|p| p.price.value()), Some(5.0));

    for _ in 0..2 {
        clock.advance(INTERVAL);
        pool.run_until_stalled();
    }

    // comparison is against the last successful price, not the failure
    assert_eq!(changed_flags(&outcomes), vec![Some(false), None, Some(false), Some(true)]);
}

#[test]
fn no_fetch_happens_after_stop() {
    let clock = ManualClock::default();
    let feed = ScriptedTicker::new(&clock, [Some(5.0)]);
    let mut poller = PricePoller::new(Rc::clone(&feed), clock.clone(), &PulseConfig::default());
    let mut pool = LocalPool::new();
    let (outcomes, on_update) = recorder();

    poller.start(&pool.spawner(), on_update).unwrap();
    pool.run_until_stalled();
    poller.stop();
    pool.run_until_stalled();
    assert!(!poller.is_running());

    for _ in 0..4 {
        clock.advance(INTERVAL);
        pool.run_until_stalled();
    }

    assert_eq!(feed.calls.borrow().len(), 1);
    assert_eq!(outcomes.borrow().len(), 1);
    assert_eq!(clock.pending_sleepers(), 0);
}

#[test]
fn stop_during_fetch_suppresses_callback() {
    let clock = ManualClock::default();
    let feed = ScriptedTicker::slow(&clock, [Some(5.0)], Duration::from_secs(5));
    let mut poller = PricePoller::new(Rc::clone(&feed), clock.clone(), &PulseConfig::default());
    let mut pool = LocalPool::new();
    let (outcomes, on_update) = recorder();

    poller.start(&pool.spawner(), on_update).unwrap();
    pool.run_until_stalled();
    poller.stop();
    clock.advance(Duration::from_secs(5));
    pool.run_until_stalled();

    assert_eq!(feed.calls.borrow().len(), 1);
    assert!(outcomes.borrow().is_empty());
}

#[test]
fn slow_fetch_skips_missed_boundary() {
    let clock = ManualClock::default();
    let feed = ScriptedTicker::slow(&clock, [Some(5.0)], Duration::from_secs(45));
    let mut poller = PricePoller::new(Rc::clone(&feed), clock.clone(), &PulseConfig::default());
    let mut pool = LocalPool::new();
    let (_outcomes, on_update) = recorder();

    poller.start(&pool.spawner(), on_update).unwrap();
    pool.run_until_stalled();

    for _ in 0..4 {
        clock.advance(Duration::from_secs(15));
        pool.run_until_stalled();
    }

    assert_eq!(*feed.calls.borrow(), vec![0, 60_000]);
}

#[test]
fn restart_replaces_running_loop() {
    let clock = ManualClock::default();
    let feed = ScriptedTicker::new(&clock, [Some(5.0)]);
    let mut poller = PricePoller::new(Rc::clone(&feed), clock.clone(), &PulseConfig::default());
    let mut pool = LocalPool::new();
    let fired = Rc::new(Cell::new(0));

    for _ in 0..2 {
        let counter = Rc::clone(&fired);
        poller.start(&pool.spawner(), move |_| counter.set(counter.get() + 1)).unwrap();
        pool.run_until_stalled();
    }
    clock.advance(INTERVAL);
    pool.run_until_stalled();

    assert_eq!(fired.get(), 3);
    assert_eq!(clock.pending_sleepers(), 1);
}

#[test]
fn dropping_poller_stops_it() {
    let clock = ManualClock::default();
    let feed = ScriptedTicker::new(&clock, [Some(5.0)]);
    let mut pool = LocalPool::new();
    let (_outcomes, on_update) = recorder();

    {
        let mut poller = PricePoller::new(Rc::clone(&feed), clock.clone(), &PulseConfig::default());
        poller.start(&pool.spawner(), on_update).unwrap();
        pool.run_until_stalled();
        assert_eq!(poller.pulse_duration(), Duration::from_millis(600));
    }

    clock.advance(INTERVAL);
    pool.run_until_stalled();
    assert_eq!(feed.calls.borrow().len(), 1);
}

#[test]
fn unresponsive_fallback_still_yields_errors_on_cadence() {
    let clock = ManualClock::default();
    let primary = FakeSource::new("rest", [Reply::status(500)]);
    let actor = FakeActor::unresponsive();
    let config = PulseConfig::default();
    let client = Rc::new(DataSourceClient::new(
        primary.clone(),
        ProxySource::new(actor.clone()),
        clock.clone(),
        &config,
    ));
    let mut poller = PricePoller::new(client, clock.clone(), &config);
    let mut pool = LocalPool::new();
    let (outcomes, on_update) = recorder();

    poller.start(&pool.spawner(), on_update).unwrap();
    pool.run_until_stalled();
    for _ in 0..300 {
        clock.advance(Duration::from_secs(1));
        pool.run_until_stalled();
    }

    // ticks at 0s..270s each fail 8s after starting; the 300s tick is in flight
    let outcomes = outcomes.borrow();
    assert_eq!(outcomes.len(), 10);
    for outcome in outcomes.iter() {
        let err = outcome.as_ref().unwrap_err();
        assert_eq!(err.fallback, SourceError::Network(NetworkError::Timeout(Duration::from_secs(8))));
    }
    assert_eq!(*primary.ticker_calls.borrow(), 11);
    assert_eq!(*actor.calls.borrow(), 11);
    assert!(poller.latest().is_none());
}
