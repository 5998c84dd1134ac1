use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{BINANCE, BINANCE_API_KEY_ENV};
use crate::data::kline::{RawKline, convert_klines};

/// One symbol record from /fapi/v1/exchangeInfo. The endpoint carries far
/// more fields; only the ones the universe gate reads are kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub quote_asset: String,
    #[serde(default)]
    pub contract_type: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

/// 24hr ticker statistics. `quoteVolume` is optional: delisted or brand-new
/// contracts have been observed to omit it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hr {
    #[serde(default)]
    pub quote_volume: Option<String>,
}

/// Abstract interface for the exchange REST collaborator.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Full futures symbol directory.
    async fn exchange_info(&self) -> Result<Vec<SymbolInfo>>;

    /// Most recent `limit` candles for a symbol at `interval` (e.g. "5m").
    async fn klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<RawKline>>;

    /// Rolling 24h ticker statistics for one symbol.
    async fn ticker_24hr(&self, symbol: &str) -> Result<Ticker24hr>;
}

/// USDT-margined futures REST client. Constructed once at startup and passed
/// by reference to everything that needs market data.
pub struct BinanceUsdFutures {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceUsdFutures {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BINANCE.rest_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(BINANCE.client.timeout_ms));

        // All three endpoints are public GETs; the key, when present, only
        // buys the account's higher request-weight budget.
        if let Ok(key) = std::env::var(BINANCE_API_KEY_ENV) {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                "X-MBX-APIKEY",
                key.parse().context("BINANCE_API_KEY is not a valid header value")?,
            );
            builder = builder.default_headers(headers);
        }

        Ok(Self {
            http: builder.build().context("failed to build HTTP client")?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            bail!("GET {} returned HTTP {}: {}", path, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("GET {}: malformed response body", path))
    }
}

#[async_trait]
impl MarketData for BinanceUsdFutures {
    async fn exchange_info(&self) -> Result<Vec<SymbolInfo>> {
        let info: ExchangeInfo = self.get_json("/fapi/v1/exchangeInfo", &[]).await?;
        Ok(info.symbols)
    }

    async fn klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<RawKline>> {
        let limit = limit.min(BINANCE.limits.klines_limit);
        let rows: Vec<Vec<Value>> = self
            .get_json(
                "/fapi/v1/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        convert_klines(rows)
            .map_err(|e| anyhow::Error::new(e).context(format!("{}: kline decode failed", symbol)))
    }

    async fn ticker_24hr(&self, symbol: &str) -> Result<Ticker24hr> {
        self.get_json("/fapi/v1/ticker/24hr", &[("symbol", symbol.to_string())])
            .await
    }
}
