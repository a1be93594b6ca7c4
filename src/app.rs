use leptos::html::Canvas;
use leptos::*;
use std::rc::Rc;

use crate::{
    application::StreamController,
    domain::{
        chart::{ChartKind, QuoteChart},
        market_data::QuoteSeries,
    },
    global_state::globals,
    infrastructure::{
        http::{FeedConfig, HttpQuoteFeed},
        rendering::CanvasRenderer,
        scheduling::IntervalScheduler,
    },
};

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 500;

/// Текст кнопки-переключателя: ровно два значения
pub fn toggle_label(is_streaming: bool) -> &'static str {
    if is_streaming { "Stop Streaming Data" } else { "Start Streaming Data" }
}

/// 🦀 Главный компонент дашборда котировок на Leptos
#[component]
pub fn App() -> impl IntoView {
    view! {
        <style>
            {r#"
            .quote-stream-app {
                font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
                background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%);
                min-height: 100vh;
                padding: 20px;
                color: white;
            }

            .header {
                text-align: center;
                margin-bottom: 20px;
                background: rgba(255, 255, 255, 0.1);
                backdrop-filter: blur(10px);
                padding: 20px;
                border-radius: 15px;
                border: 1px solid rgba(255, 255, 255, 0.2);
            }

            .price-info {
                display: flex;
                justify-content: center;
                gap: 40px;
                margin-top: 15px;
            }

            .price-item {
                text-align: center;
            }

            .price-value {
                font-size: 24px;
                font-weight: 700;
                color: #72c685;
                font-family: 'Courier New', monospace;
            }

            .price-label {
                font-size: 12px;
                color: #a0a0a0;
                margin-top: 5px;
            }

            .chart-container {
                display: flex;
                flex-direction: column;
                align-items: center;
                gap: 10px;
                margin-bottom: 20px;
            }

            .stream-button {
                background: #4a5d73;
                color: white;
                border: none;
                padding: 10px 20px;
                border-radius: 8px;
                cursor: pointer;
                font-size: 14px;
                font-weight: bold;
            }

            .stream-button:hover {
                background: #5a6d83;
            }

            .status {
                color: #72c685;
                font-size: 14px;
                text-align: center;
            }
            "#}
        </style>
        <div class="quote-stream-app">
            <Header />
            <ChartContainer />
        </div>
    }
}

/// 📊 Заголовок с живой статистикой стрима
#[component]
fn Header() -> impl IntoView {
    let current_ask = globals().current_ask;
    let current_bid = globals().current_bid;
    let quote_count = globals().quote_count;
    let is_streaming = globals().is_streaming;

    view! {
        <div class="header">
            <h1>"📈 Live Quote Dashboard"</h1>
            <p>"Top of book • Leptos + Canvas"</p>

            <div class="price-info">
                <div class="price-item">
                    <div class="price-value">
                        {move || format!("${:.2}", current_ask.get())}
                    </div>
                    <div class="price-label">"Top Ask"</div>
                </div>
                <div class="price-item">
                    <div class="price-value">
                        {move || format!("${:.2}", current_bid.get())}
                    </div>
                    <div class="price-label">"Top Bid"</div>
                </div>
                <div class="price-item">
                    <div class="price-value">
                        {move || quote_count.get().to_string()}
                    </div>
                    <div class="price-label">"Quotes"</div>
                </div>
                <div class="price-item">
                    <div class="price-value">
                        {move || if is_streaming.get() { "🟢 LIVE" } else { "🔴 OFF" }}
                    </div>
                    <div class="price-label">"Stream"</div>
                </div>
            </div>
        </div>
    }
}

/// 🎨 Канвас графика + кнопка-переключатель стрима
#[component]
fn ChartContainer() -> impl IntoView {
    let (series, set_series) = create_signal(QuoteSeries::new());
    let (is_streaming, set_is_streaming) = create_signal(false);
    let (status, set_status) = create_signal("Initializing...".to_string());

    let canvas_ref = create_node_ref::<Canvas>();

    let controller = Rc::new(StreamController::new(
        Rc::new(IntervalScheduler::new()),
        Rc::new(HttpQuoteFeed::new(FeedConfig::default())),
    ));

    // Подписка транслирует снимки контроллера в реактивные сигналы
    controller.subscribe(move |snapshot| {
        set_is_streaming.set(snapshot.is_streaming);
        set_series.set(snapshot.series.clone());

        globals().is_streaming.set(snapshot.is_streaming);
        globals().quote_count.set(snapshot.quote_count());
        if let Some(ask) = snapshot.latest_ask() {
            globals().current_ask.set(ask.value());
        }
        if let Some(bid) = snapshot.latest_bid() {
            globals().current_bid.set(bid.value());
        }
    });

    // Монтирование запускает стрим, как только канвас появился в DOM
    let mount_controller = Rc::clone(&controller);
    create_effect(move |_| {
        if canvas_ref.get().is_some() {
            mount_controller.mount();
            set_status.set("🔌 Polling quote server...".to_string());
        }
    });

    // Размонтирование гарантированно снимает таймер
    let cleanup_controller = Rc::clone(&controller);
    on_cleanup(move || cleanup_controller.unmount());

    // Эффект для рендеринга при изменении данных
    let chart = QuoteChart::new("quote-stream-chart".to_string(), ChartKind::Line);
    let renderer = CanvasRenderer::new("chart-canvas".to_string(), CHART_WIDTH, CHART_HEIGHT);
    create_effect(move |_| {
        series.with(|series_data| {
            if canvas_ref.get().is_none() {
                return;
            }
            match renderer.render(&chart, series_data) {
                Ok(()) if !series_data.is_empty() => {
                    set_status.set(format!("✅ Rendered {} quotes", series_data.count()));
                }
                Ok(()) => {}
                Err(e) => {
                    set_status.set(format!("❌ Render error: {:?}", e));
                }
            }
        });
    });

    let toggle_controller = Rc::clone(&controller);

    view! {
        <div class="chart-container">
            <canvas
                id="chart-canvas"
                node_ref=canvas_ref
                width=CHART_WIDTH
                height=CHART_HEIGHT
                style="border: 2px solid #4a5d73; border-radius: 10px; background: #2c3e50;"
            />
            <button
                class="stream-button"
                on:click=move |_| toggle_controller.toggle()
            >
                {move || toggle_label(is_streaming.get())}
            </button>
            <div class="status">
                {move || status.get()}
            </div>
        </div>
    }
}
