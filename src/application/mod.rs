pub mod stream_controller;

pub use stream_controller::*;
