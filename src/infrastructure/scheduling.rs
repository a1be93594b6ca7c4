use crate::domain::scheduling::{ScheduledTask, TickCallback, TickScheduler};
use gloo_timers::callback::Interval;
use std::time::Duration;

/// Планировщик на браузерном setInterval (gloo)
///
/// Drop handle отменяет interval, так что ScheduledTask достаточно
/// держать таймер внутри cancel-замыкания.
#[derive(Debug, Default)]
pub struct IntervalScheduler;

impl IntervalScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule_repeating(&self, interval: Duration, mut callback: TickCallback) -> ScheduledTask {
        let timer = Interval::new(interval.as_millis() as u32, move || callback());
        ScheduledTask::new(move || drop(timer))
    }
}
