use std::time::Duration;

/// Callback одного тика таймера
pub type TickCallback = Box<dyn FnMut()>;

/// Интерфейс для периодического таймера
///
/// Платформенный таймер - глобальный мутабельный ресурс, поэтому он
/// абстрагирован как инжектируемая способность: продакшен использует
/// браузерный interval, тесты двигают часы вручную.
pub trait TickScheduler {
    /// Запустить повторяющийся тик с заданным интервалом
    fn schedule_repeating(&self, interval: Duration, callback: TickCallback) -> ScheduledTask;
}

/// Handle активного таймера. Отмена при drop, чтобы размонтирование
/// не оставляло "призрачных" тиков.
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduledTask {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Явная отмена таймера
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask").field("active", &self.cancel.is_some()).finish()
    }
}
