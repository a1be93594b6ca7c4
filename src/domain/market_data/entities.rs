pub use super::value_objects::{Price, PriceLevel, Size, Symbol, Timestamp};
use serde::{Deserialize, Serialize};

/// Domain entity - Quote (top of book)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub top_bid: PriceLevel,
    pub top_ask: PriceLevel,
    pub timestamp: Timestamp,
}

impl Quote {
    pub fn new(symbol: Symbol, top_bid: PriceLevel, top_ask: PriceLevel, timestamp: Timestamp) -> Self {
        Self { symbol, top_bid, top_ask, timestamp }
    }

    pub fn mid_price(&self) -> Price {
        Price::from((self.top_bid.price.value() + self.top_ask.price.value()) / 2.0)
    }

    pub fn spread(&self) -> Price {
        Price::from(self.top_ask.price.value() - self.top_bid.price.value())
    }

    /// Кроссированный стакан: bid выше ask
    pub fn is_crossed(&self) -> bool {
        self.top_bid.price.value() > self.top_ask.price.value()
    }
}

/// Domain entity - Quote series
///
/// Append-only: порядок вставки = порядок прихода. Серия никогда не
/// усекается и не пересортировывается, пока контроллер смонтирован.
#[derive(Debug, Clone, Default)]
pub struct QuoteSeries {
    quotes: Vec<Quote>,
}

impl QuoteSeries {
    pub fn new() -> Self {
        Self { quotes: Vec::new() }
    }

    /// Append one fetched batch, preserving batch order
    pub fn append_batch(&mut self, batch: Vec<Quote>) {
        self.quotes.extend(batch);
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn latest(&self) -> Option<&Quote> {
        self.quotes.last()
    }

    pub fn count(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Get the last ask price
    pub fn latest_ask(&self) -> Option<&Price> {
        self.quotes.last().map(|quote| &quote.top_ask.price)
    }

    /// Get the last bid price
    pub fn latest_bid(&self) -> Option<&Price> {
        self.quotes.last().map(|quote| &quote.top_bid.price)
    }

    /// Get the price range across both sides of the book
    pub fn price_range(&self) -> Option<(&Price, &Price)> {
        if self.quotes.is_empty() {
            return None;
        }

        let mut min_price = &self.quotes[0].top_bid.price;
        let mut max_price = &self.quotes[0].top_ask.price;

        for quote in &self.quotes {
            if quote.top_bid.price.value() < min_price.value() {
                min_price = &quote.top_bid.price;
            }
            if quote.top_ask.price.value() > max_price.value() {
                max_price = &quote.top_ask.price;
            }
        }

        Some((min_price, max_price))
    }

    /// Get the time range of the series
    pub fn time_range(&self) -> Option<(Timestamp, Timestamp)> {
        match (self.quotes.first(), self.quotes.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }
}
