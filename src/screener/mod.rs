//! Coin universe construction and the multi-filter screening pass.

mod favorites;
mod filter;
mod report;

// Re-export commonly used types
pub use favorites::{FavoritesDiff, load_favorites, save_favorites, update_favorites};
pub use filter::{CoinFilter, Exclude, FilterEntry, FilterError, SortKey, SortOrder};
pub use report::write_report;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::SCREENER;
use crate::data::MarketData;
use crate::domain::Coin;

/// Owns the coin universe and an ordered list of filters. The universe is
/// fetched once, when the screener is built; every filter pass runs over that
/// same snapshot.
pub struct Screener {
    coins: Vec<Coin>,
    filters: Vec<CoinFilter>,
}

impl Screener {
    /// Build the coin universe: every USDT-quoted perpetual on the exchange
    /// whose 24h quote volume clears the configured floor. One metadata call,
    /// then one klines fetch and one ticker lookup per symbol, sequentially.
    pub async fn build(market: &dyn MarketData, filters: Vec<CoinFilter>) -> Result<Self> {
        let symbols: Vec<String> = market
            .exchange_info()
            .await
            .context("exchange metadata lookup failed")?
            .into_iter()
            .filter(|s| {
                s.quote_asset == SCREENER.quote_asset && s.contract_type == SCREENER.contract_type
            })
            .map(|s| s.symbol)
            .collect();
        info!("universe candidates: {} perpetual symbols", symbols.len());

        let mut coins = Vec::new();
        for symbol in symbols {
            let coin = Coin::fetch(market, &symbol).await?;
            let volume_24h = coin.volume_24h(market).await?;
            if volume_24h > SCREENER.min_volume_24h_usdt {
                coins.push(coin);
            } else {
                debug!("{}: 24h volume {:.0} below floor, dropped", symbol, volume_24h);
            }
        }
        info!("universe after volume gate: {} coins", coins.len());

        Ok(Screener { coins, filters })
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Run every filter in registration order over the universe snapshot and
    /// render the report text. The union of filtered symbols is deduplicated
    /// in first-seen order.
    pub fn screen(&mut self) -> Result<String> {
        let coins = &self.coins;
        let mut union: Vec<String> = Vec::new();
        let mut blocks: Vec<String> = Vec::new();

        for filter in self.filters.iter_mut() {
            filter.filter(coins);
            for entry in filter.filtered_coins()? {
                if !union.contains(&entry.symbol) {
                    union.push(entry.symbol.clone());
                }
            }
            blocks.push(filter.explanation()?);
        }

        Ok(report::render(&blocks, &union))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RawKline, SymbolInfo, Ticker24hr};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeExchange {
        symbols: Vec<SymbolInfo>,
        // per-symbol (high, low, quote volume) window, one candle each
        windows: HashMap<String, (f64, f64, f64)>,
        volumes_24h: HashMap<String, f64>,
    }

    impl FakeExchange {
        fn symbol(symbol: &str, quote: &str, contract: &str) -> SymbolInfo {
            SymbolInfo {
                symbol: symbol.to_string(),
                quote_asset: quote.to_string(),
                contract_type: contract.to_string(),
            }
        }
    }

    #[async_trait]
    impl MarketData for FakeExchange {
        async fn exchange_info(&self) -> anyhow::Result<Vec<SymbolInfo>> {
            Ok(self.symbols.clone())
        }

        async fn klines(
            &self,
            symbol: &str,
            _interval: &str,
            _limit: usize,
        ) -> anyhow::Result<Vec<RawKline>> {
            let (high, low, quote_volume) = self.windows[symbol];
            Ok(vec![RawKline {
                open_time_ms: 0,
                open: low,
                high,
                low,
                close: high,
                base_volume: 0.0,
                close_time_ms: 299_999,
                quote_volume,
            }])
        }

        async fn ticker_24hr(&self, symbol: &str) -> anyhow::Result<Ticker24hr> {
            Ok(Ticker24hr {
                quote_volume: Some(self.volumes_24h[symbol].to_string()),
            })
        }
    }

    fn fake_exchange() -> FakeExchange {
        FakeExchange {
            symbols: vec![
                FakeExchange::symbol("BTCUSDT", "USDT", "PERPETUAL"),
                FakeExchange::symbol("ETHUSDT", "USDT", "PERPETUAL"),
                FakeExchange::symbol("DUSTUSDT", "USDT", "PERPETUAL"),
                FakeExchange::symbol("BTCUSDC", "USDC", "PERPETUAL"),
                FakeExchange::symbol("BTCUSDT_240927", "USDT", "CURRENT_QUARTER"),
            ],
            windows: HashMap::from([
                ("BTCUSDT".to_string(), (110.0, 100.0, 9_000.0)),
                ("ETHUSDT".to_string(), (120.0, 100.0, 4_000.0)),
                ("DUSTUSDT".to_string(), (200.0, 100.0, 50.0)),
            ]),
            volumes_24h: HashMap::from([
                ("BTCUSDT".to_string(), 80_000_000.0),
                ("ETHUSDT".to_string(), 40_000_000.0),
                ("DUSTUSDT".to_string(), 10_000.0), // under the gate
            ]),
        }
    }

    #[tokio::test]
    async fn build_gates_on_quote_contract_and_volume() {
        let screener = Screener::build(&fake_exchange(), Vec::new()).await.unwrap();
        let symbols: Vec<&str> = screener.coins().iter().map(|c| c.symbol.as_str()).collect();

        // USDC quote and quarterly contract never fetched; dust dropped by the gate
        assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[tokio::test]
    async fn screen_unions_filter_output_into_one_report() {
        let filters = vec![
            CoinFilter::new("Volume", 1, SortKey::Volume, SortOrder::Descending),
            CoinFilter::new("Price Change", 1, SortKey::PriceChange, SortOrder::Descending),
        ];
        let mut screener = Screener::build(&fake_exchange(), filters).await.unwrap();

        let text = screener.screen().unwrap();
        assert!(text.contains("Volume\n"));
        assert!(text.contains("BTCUSDT : 9000.00\n"));
        assert!(text.contains("ETHUSDT : 20.00\n"));
        // Two filters, two distinct winners
        assert!(text.contains("Screened symbols: 2\n"));
    }

    #[tokio::test]
    async fn screen_deduplicates_across_filters() {
        // Same coin tops both rankings
        let mut exchange = fake_exchange();
        exchange.windows.insert("BTCUSDT".to_string(), (150.0, 100.0, 9_000.0));

        let filters = vec![
            CoinFilter::new("Volume", 1, SortKey::Volume, SortOrder::Descending),
            CoinFilter::new("Price Change", 1, SortKey::PriceChange, SortOrder::Descending),
        ];
        let mut screener = Screener::build(&exchange, filters).await.unwrap();

        let text = screener.screen().unwrap();
        assert!(text.contains("Screened symbols: 1\n"));
    }
}
