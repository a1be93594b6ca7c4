use quickcheck_macros::quickcheck;
use quote_stream_wasm::domain::market_data::{
    Price, PriceLevel, Quote, QuoteSeries, Size, Symbol, Timestamp,
};

fn quote(seq: u64) -> Quote {
    let base = 100.0 + (seq % 50) as f64;
    Quote::new(
        Symbol::from("ABC"),
        PriceLevel::new(Price::new(base - 0.5), Size::new(1000.0)),
        PriceLevel::new(Price::new(base + 0.5), Size::new(750.0)),
        Timestamp::from_millis(seq),
    )
}

#[quickcheck]
fn append_equals_concatenation(batches: Vec<Vec<u64>>) -> bool {
    let mut series = QuoteSeries::new();
    for batch in &batches {
        series.append_batch(batch.iter().map(|&seq| quote(seq)).collect());
    }

    let expected: Vec<u64> = batches.iter().flatten().copied().collect();
    let got: Vec<u64> = series.quotes().iter().map(|q| q.timestamp.value()).collect();
    got == expected
}

#[quickcheck]
fn count_is_sum_of_batch_sizes(batches: Vec<Vec<u64>>) -> bool {
    let mut series = QuoteSeries::new();
    for batch in &batches {
        series.append_batch(batch.iter().map(|&seq| quote(seq)).collect());
    }
    series.count() == batches.iter().map(Vec::len).sum::<usize>()
}

#[test]
fn empty_batch_changes_nothing() {
    let mut series = QuoteSeries::new();
    series.append_batch(vec![quote(1)]);
    series.append_batch(Vec::new());

    assert_eq!(series.count(), 1);
    assert_eq!(series.latest().unwrap().timestamp.value(), 1);
}

#[test]
fn arrival_order_survives_unsorted_timestamps() {
    // The series must never reorder, even when the feed delivers
    // out-of-order timestamps
    let mut series = QuoteSeries::new();
    series.append_batch(vec![quote(30), quote(10)]);
    series.append_batch(vec![quote(20)]);

    let got: Vec<u64> = series.quotes().iter().map(|q| q.timestamp.value()).collect();
    assert_eq!(got, vec![30, 10, 20]);
}

#[test]
fn latest_sides_track_last_quote() {
    let mut series = QuoteSeries::new();
    assert!(series.latest_ask().is_none());
    assert!(series.latest_bid().is_none());

    series.append_batch(vec![quote(1), quote(7)]);

    assert!((series.latest_ask().unwrap().value() - 107.5).abs() < f64::EPSILON);
    assert!((series.latest_bid().unwrap().value() - 106.5).abs() < f64::EPSILON);
}

#[test]
fn price_range_spans_both_sides() {
    let mut series = QuoteSeries::new();
    series.append_batch(vec![quote(5), quote(20), quote(11)]);

    let (min, max) = series.price_range().unwrap();
    // Lowest bid and highest ask across the whole series
    assert!((min.value() - 104.5).abs() < f64::EPSILON);
    assert!((max.value() - 120.5).abs() < f64::EPSILON);
}

#[test]
fn time_range_is_first_and_last_arrival() {
    let mut series = QuoteSeries::new();
    series.append_batch(vec![quote(40), quote(10), quote(25)]);

    let (start, end) = series.time_range().unwrap();
    assert_eq!(start.value(), 40);
    assert_eq!(end.value(), 25);
}

#[test]
fn quote_helpers() {
    let q = quote(2);
    assert!((q.mid_price().value() - 102.0).abs() < f64::EPSILON);
    assert!((q.spread().value() - 1.0).abs() < f64::EPSILON);
    assert!(!q.is_crossed());
}
