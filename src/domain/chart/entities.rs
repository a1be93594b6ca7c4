use super::value_objects::{ChartBounds, ChartKind, PlotPoint};
use crate::domain::market_data::QuoteSeries;
use serde::Serialize;

/// Отступ цены сверху и снизу для лучшей визуализации
const PRICE_PADDING_RATIO: f64 = 0.05;

/// Доменная сущность - График котировок
#[derive(Debug, Clone)]
pub struct QuoteChart {
    pub id: String,
    pub kind: ChartKind,
}

/// Готовая к отрисовке геометрия: обе линии стакана в экранных координатах
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotGeometry {
    pub bounds: ChartBounds,
    pub ask_line: Vec<PlotPoint>,
    pub bid_line: Vec<PlotPoint>,
}

impl QuoteChart {
    pub fn new(id: String, kind: ChartKind) -> Self {
        Self { id, kind }
    }

    /// Вычислить границы по данным серии (5% отступ сверху и снизу)
    pub fn bounds_for(&self, series: &QuoteSeries, width: u32, height: u32) -> Option<ChartBounds> {
        let (min_price, max_price) = series.price_range()?;
        let (start, end) = series.time_range()?;

        let padding = (max_price.value() - min_price.value()) * PRICE_PADDING_RATIO;

        Some(ChartBounds {
            start_time: start.as_f64(),
            end_time: end.as_f64(),
            min_price: (min_price.value() - padding).max(0.1), // Минимум $0.1
            max_price: max_price.value() + padding,
            width,
            height,
        })
    }

    /// Построить геометрию для рендеринга
    ///
    /// Точки идут в порядке прихода котировок; пустая серия даёт None,
    /// рендерер в этом случае показывает заглушку.
    pub fn layout(&self, series: &QuoteSeries, width: u32, height: u32) -> Option<PlotGeometry> {
        let bounds = self.bounds_for(series, width, height)?;

        let mut ask_line = Vec::with_capacity(series.count());
        let mut bid_line = Vec::with_capacity(series.count());

        for (i, quote) in series.quotes().iter().enumerate() {
            // При совпадающих метках времени раскладываем точки по индексу
            let x = if bounds.time_range() == 0.0 {
                step_x(i, series.count(), width)
            } else {
                bounds.time_to_x(quote.timestamp.as_f64())
            };

            ask_line.push(PlotPoint::new(x, bounds.price_to_y(quote.top_ask.price.value())));
            bid_line.push(PlotPoint::new(x, bounds.price_to_y(quote.top_bid.price.value())));
        }

        Some(PlotGeometry { bounds, ask_line, bid_line })
    }
}

fn step_x(index: usize, count: usize, width: u32) -> f64 {
    if count <= 1 {
        return width as f64 / 2.0;
    }
    index as f64 / (count - 1) as f64 * width as f64
}
