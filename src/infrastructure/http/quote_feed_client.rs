use crate::domain::errors::{AppError, NetworkResult};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{
    BatchCallback, Quote, QuoteFeed,
    value_objects::{Price, PriceLevel, Size, Symbol, Timestamp},
};
use gloo_net::http::Request;
use wasm_bindgen_futures::spawn_local;

#[derive(Debug, serde::Deserialize)]
struct PriceLevelDto {
    price: f64,
    size: f64,
}

#[derive(Debug, serde::Deserialize)]
struct QuoteDto {
    stock: String,
    top_bid: PriceLevelDto,
    top_ask: PriceLevelDto,
    timestamp: u64,
}

impl From<QuoteDto> for Quote {
    fn from(dto: QuoteDto) -> Self {
        Quote::new(
            Symbol::from(dto.stock.as_str()),
            PriceLevel::new(Price::new(dto.top_bid.price), Size::new(dto.top_bid.size)),
            PriceLevel::new(Price::new(dto.top_ask.price), Size::new(dto.top_ask.size)),
            Timestamp::from_millis(dto.timestamp),
        )
    }
}

/// Конфигурация квотного сервера
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub endpoint: String,
    pub instrument_id: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { endpoint: "http://localhost:8080".to_string(), instrument_id: 1 }
    }
}

/// Simple REST polling client for the quote server
///
/// Сервер сам хранит позицию чтения, поэтому запрос без курсора:
/// каждый вызов отдаёт следующую порцию котировок.
pub struct HttpQuoteFeed {
    config: FeedConfig,
}

impl HttpQuoteFeed {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    pub fn query_url(&self) -> String {
        format!("{}/query?id={}", self.config.endpoint, self.config.instrument_id)
    }
}

impl QuoteFeed for HttpQuoteFeed {
    fn fetch_batch(&self, on_batch: BatchCallback) {
        let url = self.query_url();
        spawn_local(async move {
            match fetch_from_url(&url).await {
                Ok(quotes) => on_batch(quotes),
                Err(e) => {
                    // Неудачный тик не даёт данных; контроллер об ошибке не знает
                    get_logger().error(
                        LogComponent::Infrastructure("QuoteFeed"),
                        &format!("❌ Fetch failed: {e}"),
                    );
                }
            }
        });
    }
}

async fn fetch_from_url(url: &str) -> NetworkResult<Vec<Quote>> {
    get_logger().debug(
        LogComponent::Infrastructure("QuoteFeed"),
        &format!("📈 Fetching quotes from: {url}"),
    );

    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to fetch quotes: {e:?}")))?;

    if !response.ok() {
        return Err(AppError::NetworkError(format!("HTTP error: {}", response.status())));
    }

    let batch: Vec<QuoteDto> = response
        .json()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to parse JSON: {e:?}")))?;

    Ok(batch.into_iter().map(Quote::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        let feed = HttpQuoteFeed::new(FeedConfig::default());
        assert_eq!(feed.query_url(), "http://localhost:8080/query?id=1");
    }

    #[test]
    fn test_query_url_custom_instrument() {
        let feed = HttpQuoteFeed::new(FeedConfig {
            endpoint: "https://quotes.example.com".to_string(),
            instrument_id: 7,
        });
        assert_eq!(feed.query_url(), "https://quotes.example.com/query?id=7");
    }

    #[test]
    fn test_quote_dto_mapping() {
        let json = r#"{
            "stock": "abc",
            "top_bid": { "price": 139.78, "size": 1000.0 },
            "top_ask": { "price": 140.12, "size": 800.0 },
            "timestamp": 1718000000123
        }"#;

        let dto: QuoteDto = serde_json::from_str(json).unwrap();
        let quote = Quote::from(dto);

        assert_eq!(quote.symbol.value(), "ABC");
        assert!((quote.top_bid.price.value() - 139.78).abs() < f64::EPSILON);
        assert!((quote.top_ask.size.value() - 800.0).abs() < f64::EPSILON);
        assert_eq!(quote.timestamp.value(), 1_718_000_000_123);
    }
}
