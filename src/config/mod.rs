//! Configuration module for the screener application.

mod binance;
mod screener;

// Re-export commonly used items
pub use binance::{BINANCE, BINANCE_API_KEY_ENV, BinanceConfig};
pub use screener::{SCREENER, ScreenerConfig};
