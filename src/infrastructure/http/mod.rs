pub mod quote_feed_client;

pub use quote_feed_client::*;
