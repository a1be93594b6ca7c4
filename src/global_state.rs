use leptos::*;
use once_cell::sync::OnceCell;

pub struct Globals {
    pub current_ask: RwSignal<f64>,
    pub current_bid: RwSignal<f64>,
    pub quote_count: RwSignal<usize>,
    pub is_streaming: RwSignal<bool>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        current_ask: create_rw_signal(0.0),
        current_bid: create_rw_signal(0.0),
        quote_count: create_rw_signal(0),
        is_streaming: create_rw_signal(false),
    })
}
