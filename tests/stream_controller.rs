use quote_stream_wasm::app::toggle_label;
use quote_stream_wasm::application::{StreamController, StreamSnapshot};
use quote_stream_wasm::domain::market_data::{
    BatchCallback, Price, PriceLevel, Quote, QuoteFeed, Size, Symbol, Timestamp,
};
use quote_stream_wasm::domain::scheduling::{ScheduledTask, TickCallback, TickScheduler};
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

const POLL_MS: u64 = 100;

fn quote(seq: u64) -> Quote {
    let base = 100.0 + seq as f64;
    Quote::new(
        Symbol::from("ABC"),
        PriceLevel::new(Price::new(base - 0.25), Size::new(1000.0)),
        PriceLevel::new(Price::new(base + 0.25), Size::new(800.0)),
        Timestamp::from_millis(seq * POLL_MS),
    )
}

fn timestamps(snapshot: &StreamSnapshot) -> Vec<u64> {
    snapshot.quotes().iter().map(|q| q.timestamp.value()).collect()
}

struct Timer {
    id: u64,
    interval_ms: u64,
    next_fire: u64,
    callback: TickCallback,
}

#[derive(Default)]
struct SchedulerInner {
    now: u64,
    next_id: u64,
    timers: Vec<Timer>,
    cancelled: HashSet<u64>,
}

/// Deterministic scheduler: ticks fire only when the test advances the clock
#[derive(Default)]
struct ManualScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl ManualScheduler {
    fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn active_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Advance the simulated clock, firing every due tick in order
    fn advance(&self, ms: u64) {
        let target = self.inner.borrow().now + ms;

        loop {
            let due = {
                let inner = self.inner.borrow();
                inner
                    .timers
                    .iter()
                    .filter(|t| t.next_fire <= target)
                    .min_by_key(|t| (t.next_fire, t.id))
                    .map(|t| t.id)
            };
            let Some(id) = due else { break };

            // Take the timer out so the callback can re-enter the scheduler
            let mut timer = {
                let mut inner = self.inner.borrow_mut();
                let Some(pos) = inner.timers.iter().position(|t| t.id == id) else {
                    continue;
                };
                let timer = inner.timers.remove(pos);
                inner.now = inner.now.max(timer.next_fire);
                timer
            };

            (timer.callback)();
            timer.next_fire += timer.interval_ms;

            let mut inner = self.inner.borrow_mut();
            if !inner.cancelled.contains(&id) {
                inner.timers.push(timer);
            }
        }

        self.inner.borrow_mut().now = target;
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_repeating(&self, interval: Duration, callback: TickCallback) -> ScheduledTask {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let interval_ms = interval.as_millis() as u64;
        let next_fire = inner.now + interval_ms;
        inner.timers.push(Timer { id, interval_ms, next_fire, callback });

        let registry = Rc::clone(&self.inner);
        ScheduledTask::new(move || {
            let mut inner = registry.borrow_mut();
            inner.timers.retain(|t| t.id != id);
            inner.cancelled.insert(id);
        })
    }
}

/// Scripted feed: pops one pre-arranged batch per tick; an exhausted
/// script keeps answering with empty batches
#[derive(Default)]
struct ScriptedFeed {
    batches: RefCell<VecDeque<Vec<Quote>>>,
    deferred: Cell<bool>,
    pending: RefCell<Vec<BatchCallback>>,
}

impl ScriptedFeed {
    fn new(batches: Vec<Vec<Quote>>) -> Rc<Self> {
        Rc::new(Self { batches: RefCell::new(batches.into()), ..Self::default() })
    }

    /// Hold completions instead of resolving them synchronously
    fn defer(&self) {
        self.deferred.set(true);
    }

    /// Resolve every held completion, like the event loop draining late responses
    fn resolve_pending(&self) {
        for on_batch in self.pending.borrow_mut().drain(..) {
            let batch = self.batches.borrow_mut().pop_front().unwrap_or_default();
            on_batch(batch);
        }
    }
}

impl QuoteFeed for ScriptedFeed {
    fn fetch_batch(&self, on_batch: BatchCallback) {
        if self.deferred.get() {
            self.pending.borrow_mut().push(on_batch);
            return;
        }
        let batch = self.batches.borrow_mut().pop_front().unwrap_or_default();
        on_batch(batch);
    }
}

fn controller_with(
    scheduler: &Rc<ManualScheduler>,
    feed: &Rc<ScriptedFeed>,
) -> StreamController {
    StreamController::with_poll_interval(
        Rc::clone(scheduler) as Rc<dyn TickScheduler>,
        Rc::clone(feed) as Rc<dyn QuoteFeed>,
        Duration::from_millis(POLL_MS),
    )
}

#[test]
fn start_twice_schedules_single_timer() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![]);
    let controller = controller_with(&scheduler, &feed);

    controller.start_streaming();
    controller.start_streaming();

    assert!(controller.is_streaming());
    assert_eq!(scheduler.active_timers(), 1);
}

#[test]
fn stop_while_idle_is_noop() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![]);
    let controller = controller_with(&scheduler, &feed);

    controller.stop_streaming();

    assert!(!controller.is_streaming());
    assert_eq!(controller.quote_count(), 0);
    assert_eq!(scheduler.active_timers(), 0);
}

#[test]
fn toggle_sequences_never_stack_timers() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![]);
    let controller = controller_with(&scheduler, &feed);

    for _ in 0..7 {
        controller.toggle();
        assert!(scheduler.active_timers() <= 1);
    }

    // Seven toggles from idle end up streaming
    assert!(controller.is_streaming());
    assert_eq!(scheduler.active_timers(), 1);
}

#[test]
fn batches_accumulate_in_arrival_order() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![vec![quote(1), quote(2)], vec![quote(3)]]);
    let controller = controller_with(&scheduler, &feed);

    controller.mount();
    scheduler.advance(2 * POLL_MS);

    let snapshot = controller.snapshot();
    assert_eq!(timestamps(&snapshot), vec![100, 200, 300]);
}

#[test]
fn two_ticks_three_quotes() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![vec![quote(1)], vec![quote(2), quote(3)]]);
    let controller = controller_with(&scheduler, &feed);

    controller.mount();

    scheduler.advance(POLL_MS);
    assert_eq!(controller.quote_count(), 1);

    scheduler.advance(POLL_MS);
    assert_eq!(controller.quote_count(), 3);
    assert_eq!(timestamps(&controller.snapshot()), vec![100, 200, 300]);
}

#[test]
fn empty_batches_keep_streaming_with_no_data() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![]);
    let controller = controller_with(&scheduler, &feed);

    controller.mount();
    scheduler.advance(250);

    assert!(controller.is_streaming());
    assert_eq!(controller.quote_count(), 0);
}

#[test]
fn toggle_while_streaming_stops_ticks() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![vec![quote(1)], vec![quote(2)], vec![quote(3)]]);
    let controller = controller_with(&scheduler, &feed);

    controller.mount();
    scheduler.advance(POLL_MS);
    assert_eq!(controller.quote_count(), 1);

    controller.toggle();
    assert!(!controller.is_streaming());

    scheduler.advance(10 * POLL_MS);
    assert_eq!(controller.quote_count(), 1);
}

#[test]
fn unmount_cancels_timer_and_freezes_data() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![vec![quote(1)], vec![quote(2)]]);
    let controller = controller_with(&scheduler, &feed);

    controller.mount();
    scheduler.advance(POLL_MS);
    assert_eq!(controller.quote_count(), 1);

    controller.unmount();
    assert_eq!(scheduler.active_timers(), 0);

    scheduler.advance(5 * POLL_MS);
    assert_eq!(controller.quote_count(), 1);
    assert!(!controller.is_streaming());
}

#[test]
fn mount_after_unmount_is_terminal() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![vec![quote(1)]]);
    let controller = controller_with(&scheduler, &feed);

    controller.mount();
    controller.unmount();
    controller.mount();

    assert!(!controller.is_streaming());
    assert_eq!(scheduler.active_timers(), 0);
}

#[test]
fn stale_completion_after_stop_is_dropped() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![vec![quote(1)]]);
    let controller = controller_with(&scheduler, &feed);

    controller.mount();
    feed.defer();

    // Tick fires, the fetch stays in flight
    scheduler.advance(POLL_MS);
    assert_eq!(controller.quote_count(), 0);

    controller.stop_streaming();

    // The late completion resolves after the stream was stopped
    feed.resolve_pending();
    assert_eq!(controller.quote_count(), 0);
}

#[test]
fn stale_completion_after_unmount_is_dropped() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![vec![quote(1)]]);
    let controller = controller_with(&scheduler, &feed);

    controller.mount();
    feed.defer();
    scheduler.advance(POLL_MS);

    controller.unmount();

    feed.resolve_pending();
    assert_eq!(controller.quote_count(), 0);
}

#[test]
fn in_flight_completion_still_applies_while_streaming() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![vec![quote(1)]]);
    let controller = controller_with(&scheduler, &feed);

    controller.mount();
    feed.defer();
    scheduler.advance(POLL_MS);

    // Stream still active when the response lands
    feed.resolve_pending();
    assert_eq!(controller.quote_count(), 1);
}

#[test]
fn toggle_label_has_exactly_two_values() {
    assert_eq!(toggle_label(true), "Stop Streaming Data");
    assert_eq!(toggle_label(false), "Start Streaming Data");
}

#[test]
fn subscribers_observe_state_changes() {
    let scheduler = ManualScheduler::new();
    let feed = ScriptedFeed::new(vec![vec![quote(1)]]);
    let controller = controller_with(&scheduler, &feed);

    let seen: Rc<RefCell<Vec<(bool, usize)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    controller.subscribe(move |snapshot| {
        sink.borrow_mut().push((snapshot.is_streaming, snapshot.quote_count()));
    });

    controller.mount();
    scheduler.advance(POLL_MS);
    controller.stop_streaming();

    let seen = seen.borrow();
    // Initial sync, start, first batch, stop
    assert_eq!(seen.as_slice(), &[(false, 0), (true, 0), (true, 1), (false, 1)]);
}
