mod kline;
mod provider;

pub use {
    kline::{KlineError, RawKline, convert_klines},
    provider::{BinanceUsdFutures, MarketData, SymbolInfo, Ticker24hr},
};
