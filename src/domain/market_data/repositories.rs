use crate::domain::market_data::Quote;

/// Completion callback принимает батч в порядке прихода
pub type BatchCallback = Box<dyn FnOnce(Vec<Quote>)>;

/// Интерфейс для получения котировок
///
/// Контракт: один вызов за тик таймера, без курсора (сервер сам хранит
/// позицию чтения). Callback вызывается только при успешном ответе;
/// неудачный запрос просто не даёт данных на этом тике.
pub trait QuoteFeed {
    /// Запросить следующий батч котировок
    fn fetch_batch(&self, on_batch: BatchCallback);
}
