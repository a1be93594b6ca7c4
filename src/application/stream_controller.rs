use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::domain::{
    logging::{LogComponent, get_logger},
    market_data::{Price, Quote, QuoteFeed, QuoteSeries},
    scheduling::{TickCallback, TickScheduler},
};

/// Интервал опроса фида (мс)
pub const POLL_INTERVAL_MS: u64 = 100;

/// Снимок состояния контроллера для слоя отображения
#[derive(Debug, Clone)]
pub struct StreamSnapshot {
    pub is_streaming: bool,
    pub series: QuoteSeries,
}

impl StreamSnapshot {
    pub fn quotes(&self) -> &[Quote] {
        self.series.quotes()
    }

    pub fn quote_count(&self) -> usize {
        self.series.count()
    }

    pub fn latest_ask(&self) -> Option<Price> {
        self.series.latest_ask().copied()
    }

    pub fn latest_bid(&self) -> Option<Price> {
        self.series.latest_bid().copied()
    }
}

type Listener = Box<dyn Fn(&StreamSnapshot)>;

struct StreamState {
    series: QuoteSeries,
    is_streaming: bool,
    mounted: bool,
    /// Растёт при каждом stop/unmount; завершение fetch со старой эпохой
    /// отбрасывается, чтобы "висящий" запрос не дописал данные после отмены
    epoch: u64,
    task: Option<crate::domain::scheduling::ScheduledTask>,
}

impl StreamState {
    fn snapshot(&self) -> StreamSnapshot {
        StreamSnapshot { is_streaming: self.is_streaming, series: self.series.clone() }
    }
}

/// Сервис приложения - владеет циклом опроса и накопленной серией
///
/// Два состояния: Idle (таймер не запущен) и Streaming (таймер активен).
/// start/stop идемпотентны, поэтому одновременно существует не больше
/// одного таймера, сколько бы раз ни нажали кнопку.
pub struct StreamController {
    state: Rc<RefCell<StreamState>>,
    /// Подписчики уведомляются после каждого изменения состояния.
    /// Listener не должен повторно входить в start/stop/toggle.
    listeners: Rc<RefCell<Vec<Listener>>>,
    scheduler: Rc<dyn TickScheduler>,
    feed: Rc<dyn QuoteFeed>,
    poll_interval: Duration,
}

impl StreamController {
    pub fn new(scheduler: Rc<dyn TickScheduler>, feed: Rc<dyn QuoteFeed>) -> Self {
        Self::with_poll_interval(scheduler, feed, Duration::from_millis(POLL_INTERVAL_MS))
    }

    pub fn with_poll_interval(
        scheduler: Rc<dyn TickScheduler>,
        feed: Rc<dyn QuoteFeed>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(StreamState {
                series: QuoteSeries::new(),
                is_streaming: false,
                mounted: true,
                epoch: 0,
                task: None,
            })),
            listeners: Rc::new(RefCell::new(Vec::new())),
            scheduler,
            feed,
            poll_interval,
        }
    }

    /// Монтирование дашборда сразу запускает стриминг
    pub fn mount(&self) {
        if !self.state.borrow().mounted {
            get_logger().warn(
                LogComponent::Application("StreamController"),
                "mount() after unmount() ignored",
            );
            return;
        }

        get_logger().info(
            LogComponent::Application("StreamController"),
            "🚀 Dashboard mounted, starting stream",
        );
        self.start_streaming();
    }

    /// Размонтирование гарантированно снимает таймер, даже если флаг
    /// и handle разошлись. Для данного экземпляра это терминальный переход.
    pub fn unmount(&self) {
        self.stop_streaming();

        let leftover = {
            let mut state = self.state.borrow_mut();
            state.mounted = false;
            state.epoch += 1;
            state.task.take()
        };
        drop(leftover);

        get_logger().info(
            LogComponent::Application("StreamController"),
            "Dashboard unmounted, stream torn down",
        );
        self.notify();
    }

    /// Запустить опрос фида. No-op, если стриминг уже активен.
    pub fn start_streaming(&self) {
        {
            let state = self.state.borrow();
            if state.is_streaming {
                get_logger().debug(
                    LogComponent::Application("StreamController"),
                    "start_streaming() while already streaming - ignored",
                );
                return;
            }
            if !state.mounted {
                get_logger().debug(
                    LogComponent::Application("StreamController"),
                    "start_streaming() after unmount - ignored",
                );
                return;
            }
        }

        let task = self.scheduler.schedule_repeating(self.poll_interval, self.make_tick());

        {
            let mut state = self.state.borrow_mut();
            state.is_streaming = true;
            state.task = Some(task);
        }

        get_logger().info(
            LogComponent::Application("StreamController"),
            &format!("🔴 Streaming started, polling every {}ms", self.poll_interval.as_millis()),
        );
        self.notify();
    }

    /// Остановить опрос. No-op, если стриминг не активен или handle пуст.
    pub fn stop_streaming(&self) {
        let task = {
            let mut state = self.state.borrow_mut();
            if !state.is_streaming || state.task.is_none() {
                return;
            }
            state.is_streaming = false;
            state.epoch += 1;
            state.task.take()
        };

        if let Some(task) = task {
            task.cancel();
        }

        get_logger().info(
            LogComponent::Application("StreamController"),
            "🛑 Streaming stopped",
        );
        self.notify();
    }

    /// Переключатель для пользовательской кнопки
    pub fn toggle(&self) {
        let streaming = self.state.borrow().is_streaming;
        if streaming {
            self.stop_streaming();
        } else {
            self.start_streaming();
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.state.borrow().is_streaming
    }

    pub fn quote_count(&self) -> usize {
        self.state.borrow().series.count()
    }

    pub fn snapshot(&self) -> StreamSnapshot {
        self.state.borrow().snapshot()
    }

    /// Подписаться на изменения состояния. Подписчик сразу получает
    /// текущий снимок, чтобы слой отображения синхронизировался.
    pub fn subscribe(&self, listener: impl Fn(&StreamSnapshot) + 'static) {
        let snapshot = self.snapshot();
        listener(&snapshot);
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Тик таймера: один запрос к фиду, completion дописывает батч
    /// в серию только если эпоха не сменилась с момента тика
    fn make_tick(&self) -> TickCallback {
        let state = Rc::downgrade(&self.state);
        let listeners = Rc::clone(&self.listeners);
        let feed = Rc::clone(&self.feed);

        Box::new(move || {
            let Some(state) = state.upgrade() else {
                return;
            };

            let epoch = {
                let state_ref = state.borrow();
                if !state_ref.is_streaming || !state_ref.mounted {
                    return;
                }
                state_ref.epoch
            };

            let apply_state = Rc::downgrade(&state);
            let apply_listeners = Rc::clone(&listeners);

            feed.fetch_batch(Box::new(move |batch| {
                let Some(state) = apply_state.upgrade() else {
                    return;
                };

                {
                    let state_ref = state.borrow();
                    if !state_ref.mounted || !state_ref.is_streaming || state_ref.epoch != epoch {
                        get_logger().debug(
                            LogComponent::Application("StreamController"),
                            &format!("Dropping stale batch of {} quotes", batch.len()),
                        );
                        return;
                    }
                }

                if batch.is_empty() {
                    return;
                }

                {
                    let mut state_mut = state.borrow_mut();
                    state_mut.series.append_batch(batch);
                }

                notify_listeners(&state, &apply_listeners);
            }));
        })
    }

    fn notify(&self) {
        notify_listeners(&self.state, &self.listeners);
    }
}

fn notify_listeners(state: &Rc<RefCell<StreamState>>, listeners: &Rc<RefCell<Vec<Listener>>>) {
    let snapshot = state.borrow().snapshot();
    for listener in listeners.borrow().iter() {
        listener(&snapshot);
    }
}
