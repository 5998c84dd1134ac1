use std::cmp::Ordering;
use std::fmt;

use anyhow::{Context, Result, bail};

use crate::config::SCREENER;
use crate::data::MarketData;
use crate::domain::Candle;
use crate::utils::{TimeUtils, epoch_ms_to_human};

/// One tradable perpetual contract plus the statistics derived from the
/// current screening window.
///
/// The derived fields are recomputed together on every refresh; a failed
/// fetch leaves the previous window untouched.
pub struct Coin {
    pub symbol: String,
    candles: Vec<Candle>,
    volume: f64,
    price_change: f64,
    sorted_prices: Vec<(i64, f64)>,
}

impl Coin {
    /// Construct a coin and run the initial refresh.
    pub async fn fetch(market: &dyn MarketData, symbol: &str) -> Result<Self> {
        let candles = fetch_window(market, symbol).await?;
        Self::from_candles(symbol, candles)
    }

    /// Build a coin from an already-fetched candle window.
    pub fn from_candles(symbol: impl Into<String>, candles: Vec<Candle>) -> Result<Self> {
        let mut coin = Coin {
            symbol: symbol.into(),
            candles: Vec::new(),
            volume: 0.0,
            price_change: 0.0,
            sorted_prices: Vec::new(),
        };
        coin.apply_window(candles)?;
        Ok(coin)
    }

    /// Re-fetch the candle window and recompute every derived statistic.
    pub async fn refresh(&mut self, market: &dyn MarketData) -> Result<()> {
        let candles = fetch_window(market, &self.symbol).await?;
        self.apply_window(candles)
    }

    fn apply_window(&mut self, candles: Vec<Candle>) -> Result<()> {
        if candles.is_empty() {
            bail!("{}: exchange returned an empty candle window", self.symbol);
        }

        let volume = candles.iter().map(|c| c.quote_asset_volume).sum();
        let sorted_prices = sorted_price_list(&candles);
        // Change across the window's full price range, low extreme to high
        // extreme, NOT open-to-close.
        let min_price = sorted_prices[0].1;
        let max_price = sorted_prices[sorted_prices.len() - 1].1;
        let price_change = (max_price - min_price) / min_price * 100.0;

        self.candles = candles;
        self.volume = volume;
        self.sorted_prices = sorted_prices;
        self.price_change = price_change;
        Ok(())
    }

    /// Quote-volume sum over the screening window.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Price range of the window as a percentage of its minimum.
    pub fn price_change(&self) -> f64 {
        self.price_change
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Every high and low in the window as (open time, price), ascending by price.
    pub fn sorted_prices(&self) -> &[(i64, f64)] {
        &self.sorted_prices
    }

    /// 24h ticker quote volume. A missing or malformed field downgrades to 0
    /// with a log line naming the symbol; the screening run carries on.
    pub async fn volume_24h(&self, market: &dyn MarketData) -> Result<f64> {
        let ticker = market
            .ticker_24hr(&self.symbol)
            .await
            .with_context(|| format!("24hr ticker fetch failed for {}", self.symbol))?;

        match ticker
            .quote_volume
            .as_deref()
            .and_then(|v| v.parse::<f64>().ok())
        {
            Some(volume) => Ok(volume),
            None => {
                log::warn!("{}: 24hr ticker carried no usable quoteVolume", self.symbol);
                Ok(0.0)
            }
        }
    }
}

async fn fetch_window(market: &dyn MarketData, symbol: &str) -> Result<Vec<Candle>> {
    let interval = TimeUtils::interval_to_string(SCREENER.candle_interval_ms);
    let raw = market
        .klines(symbol, interval, SCREENER.candle_count())
        .await
        .with_context(|| format!("klines fetch failed for {}", symbol))?;
    Ok(raw.into_iter().map(Candle::from).collect())
}

/// Both wick extremes of every candle, tagged with the candle's open time and
/// sorted ascending by price. The sort is stable: equal prices keep candle
/// order, highs ahead of lows.
fn sorted_price_list(candles: &[Candle]) -> Vec<(i64, f64)> {
    let mut prices: Vec<(i64, f64)> = candles
        .iter()
        .map(|c| (c.open_time_ms, c.high_price))
        .chain(candles.iter().map(|c| (c.open_time_ms, c.low_price)))
        .collect();
    prices.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    prices
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (min_ts, min_price) = self.sorted_prices[0];
        let (max_ts, max_price) = self.sorted_prices[self.sorted_prices.len() - 1];
        write!(
            f,
            "-------{} ({:.2}K) {:.2}%-------\
             \nMin price({}) : {} - Max price({}) : {}\
             \n---------------------------------------------",
            self.symbol,
            self.volume / 1000.0,
            self.price_change,
            epoch_ms_to_human(min_ts),
            min_price,
            epoch_ms_to_human(max_ts),
            max_price,
        )
    }
}
