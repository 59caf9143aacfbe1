use crate::config::PulseConfig;
use crate::domain::{
    errors::DataUnavailable,
    logging::LogComponent,
    market_data::{
        Candle, Granularity, RsiEngine, Signal,
        repositories::CandleFeed,
        services::{ProjectionEstimator, SignalDetector, recent_signals},
    },
    state::{ChartSnapshot, ChartState, ChartView},
};
use futures::task::{LocalSpawn, LocalSpawnExt};
use std::cell::RefCell;
use std::rc::Rc;

const COMPONENT: LogComponent = LogComponent::Application("ChartSession");

/// Message shown in the chart panel when candles cannot be loaded.
pub const CHART_ERROR_MESSAGE: &str = "Could not load chart data";

type Subscriber = Rc<dyn Fn(&ChartView)>;

/// Chart panel lifecycle: open/close, granularity switching, retry.
///
/// Every fetch is stamped with a generation number. Completing fetches whose
/// stamp is no longer current (the panel was closed, or another fetch was
/// started since) are dropped without touching the state.
pub struct ChartSessionController<F, S> {
    session: Rc<Session<F, S>>,
}

struct Session<F, S> {
    feed: Rc<F>,
    spawner: S,
    rsi: RsiEngine,
    detector: SignalDetector,
    estimator: ProjectionEstimator,
    current: RefCell<Current>,
    subscribers: RefCell<Vec<Subscriber>>,
}

struct Current {
    selected: Granularity,
    state: ChartState,
    generation: u64,
    open: bool,
}

impl<F, S> ChartSessionController<F, S>
where
    F: CandleFeed + 'static,
    S: LocalSpawn + 'static,
{
    pub fn new(feed: Rc<F>, spawner: S, config: &PulseConfig) -> Self {
        let session = Session {
            feed,
            spawner,
            rsi: RsiEngine::new(config.rsi_period),
            detector: SignalDetector::new(config.oversold, config.overbought),
            estimator: ProjectionEstimator::new(config.projection_window, config.projection_horizon),
            current: RefCell::new(Current {
                selected: Granularity::default(),
                state: ChartState::Idle,
                generation: 0,
                open: false,
            }),
            subscribers: RefCell::new(Vec::new()),
        };
        Self { session: Rc::new(session) }
    }

    pub fn open(&self) {
        self.session.current.borrow_mut().open = true;
        log_info!(COMPONENT, "📊 chart opened");
        self.load();
    }

    /// Back to `Idle`. A fetch still in flight completes into the void.
    pub fn close(&self) {
        {
            let mut current = self.session.current.borrow_mut();
            current.open = false;
            current.generation += 1;
            current.state = ChartState::Idle;
        }
        log_info!(COMPONENT, "chart closed");
        self.session.notify();
    }

    /// While closed this only records the choice for the next `open()`.
    pub fn select_granularity(&self, granularity: Granularity) {
        let open = {
            let mut current = self.session.current.borrow_mut();
            current.selected = granularity;
            current.open
        };
        if open {
            self.load();
        }
    }

    pub fn retry(&self) {
        if self.is_open() {
            self.load();
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.current.borrow().open
    }

    pub fn granularity(&self) -> Granularity {
        self.session.current.borrow().selected
    }

    pub fn state(&self) -> ChartState {
        self.session.current.borrow().state.clone()
    }

    pub fn view(&self) -> ChartView {
        self.session.view()
    }

    /// Up to `count` signals of the loaded chart, most recent first.
    pub fn recent_signals(&self, count: usize) -> Vec<Signal> {
        match &self.session.current.borrow().state {
            ChartState::Ready(snapshot) => recent_signals(&snapshot.signals, count),
            _ => Vec::new(),
        }
    }

    /// Called with the new view after every state transition.
    pub fn subscribe(&self, callback: impl Fn(&ChartView) + 'static) {
        self.session.subscribers.borrow_mut().push(Rc::new(callback));
    }

    fn load(&self) {
        let (generation, granularity) = {
            let mut current = self.session.current.borrow_mut();
            current.generation += 1;
            current.state = ChartState::Loading { granularity: current.selected };
            (current.generation, current.selected)
        };
        self.session.notify();

        let count = granularity.candle_count();
        log_debug!(COMPONENT, "loading {count} candles of {granularity} (generation {generation})");

        let session = Rc::clone(&self.session);
        let task = async move {
            let result = session.feed.fetch_candles(granularity, count).await;
            session.complete(generation, granularity, result);
        };
        if let Err(e) = self.session.spawner.spawn_local(task) {
            log_error!(COMPONENT, "failed to spawn chart fetch: {e}");
            self.session.apply(generation, ChartState::Error {
                granularity,
                message: CHART_ERROR_MESSAGE.to_string(),
            });
        }
    }
}

impl<F, S> Session<F, S> {
    fn view(&self) -> ChartView {
        let current = self.current.borrow();
        ChartView::from_state(current.selected, &current.state)
    }

    fn complete(&self, generation: u64, granularity: Granularity, result: Result<Vec<Candle>, DataUnavailable>) {
        let next = match result {
            Ok(candles) => ChartState::Ready(self.derive(granularity, candles)),
            Err(e) => {
                log_warn!(COMPONENT, "⚠️ {granularity} candles unavailable: {e}");
                ChartState::Error { granularity, message: CHART_ERROR_MESSAGE.to_string() }
            }
        };
        self.apply(generation, next);
    }

    /// RSI first, then signals and projection from the same candles.
    fn derive(&self, granularity: Granularity, candles: Vec<Candle>) -> ChartSnapshot {
        let rsi = self.rsi.compute_candles(&candles);
        let signals = self.detector.detect(&candles, &rsi);
        let projection = self.estimator.project(&candles);
        ChartSnapshot {
            granularity,
            candles: Rc::new(candles),
            rsi: Rc::new(rsi),
            signals: Rc::new(signals),
            projection,
        }
    }

    fn apply(&self, generation: u64, next: ChartState) {
        {
            let mut current = self.current.borrow_mut();
            if !current.open || current.generation != generation {
                log_debug!(COMPONENT, "discarding result of stale generation {generation}");
                return;
            }
            current.state = next;
        }
        self.notify();
    }

    fn notify(&self) {
        let subscribers = self.subscribers.borrow().clone();
        if subscribers.is_empty() {
            return;
        }
        let view = self.view();
        for subscriber in subscribers {
            subscriber(&view);
        }
    }
}
