use std::rc::Rc;
use wasm_bindgen::prelude::*;

use crate::application::StreamController;
use crate::infrastructure::{
    http::{FeedConfig, HttpQuoteFeed},
    scheduling::IntervalScheduler,
};

/// WASM API для взаимодействия с JavaScript
/// Минимальная логика - только мост к application слою
#[wasm_bindgen]
pub struct QuoteStreamApi {
    controller: Rc<StreamController>,
}

#[wasm_bindgen]
impl QuoteStreamApi {
    /// Создать новый instance поверх боевого фида и браузерного таймера
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let controller = Rc::new(StreamController::new(
            Rc::new(IntervalScheduler::new()),
            Rc::new(HttpQuoteFeed::new(FeedConfig::default())),
        ));
        Self { controller }
    }

    #[wasm_bindgen(js_name = startStreaming)]
    pub fn start_streaming(&self) {
        self.controller.start_streaming();
    }

    #[wasm_bindgen(js_name = stopStreaming)]
    pub fn stop_streaming(&self) {
        self.controller.stop_streaming();
    }

    pub fn toggle(&self) {
        self.controller.toggle();
    }

    /// Терминальный teardown: снимает таймер и блокирует поздние батчи
    pub fn unmount(&self) {
        self.controller.unmount();
    }

    #[wasm_bindgen(js_name = isStreaming)]
    pub fn is_streaming(&self) -> bool {
        self.controller.is_streaming()
    }

    #[wasm_bindgen(js_name = quoteCount)]
    pub fn quote_count(&self) -> usize {
        self.controller.quote_count()
    }

    /// Накопленная серия как JSON (для хостов без Rust-биндингов)
    #[wasm_bindgen(js_name = quotesJson)]
    pub fn quotes_json(&self) -> Result<String, JsValue> {
        let snapshot = self.controller.snapshot();
        serde_json::to_string(snapshot.quotes())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize quotes: {e}")))
    }
}

impl Default for QuoteStreamApi {
    fn default() -> Self {
        Self::new()
    }
}
