use {
    serde_json::Value,
    std::{error::Error, fmt},
};

use crate::domain::Candle;

/// One kline row exactly as the exchange returns it: a fixed-position array
/// `[openTime, open, high, low, close, volume, closeTime, quoteVolume, ...]`
/// with every price and volume encoded as a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKline {
    pub open_time_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub base_volume: f64,
    pub close_time_ms: i64,
    pub quote_volume: f64,
}

#[derive(Debug)]
pub enum KlineError {
    InvalidLength,
    InvalidType(String),
}

impl fmt::Display for KlineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            KlineError::InvalidLength => write!(f, "Invalid length"),
            KlineError::InvalidType(field) => write!(f, "Invalid type: {}", field),
        }
    }
}

impl Error for KlineError {}

fn float_field(value: Option<Value>, field: &str) -> Result<f64, KlineError> {
    match value {
        Some(Value::String(s)) => s
            .parse::<f64>()
            .map_err(|_| KlineError::InvalidType(field.to_string())),
        _ => Err(KlineError::InvalidType(field.to_string())),
    }
}

fn int_field(value: Option<Value>, field: &str) -> Result<i64, KlineError> {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| KlineError::InvalidType(field.to_string())),
        _ => Err(KlineError::InvalidType(field.to_string())),
    }
}

impl TryFrom<Vec<Value>> for RawKline {
    type Error = KlineError;

    fn try_from(row: Vec<Value>) -> Result<Self, Self::Error> {
        // 8 leading positions are consumed; trailing fields (trade count,
        // taker volumes, ignore) are part of the wire format but unused.
        if row.len() < 8 {
            return Err(KlineError::InvalidLength);
        }

        let mut items = row.into_iter();
        let open_time_ms = int_field(items.next(), "open_time")?;
        let open = float_field(items.next(), "open")?;
        let high = float_field(items.next(), "high")?;
        let low = float_field(items.next(), "low")?;
        let close = float_field(items.next(), "close")?;
        let base_volume = float_field(items.next(), "volume")?;
        let close_time_ms = int_field(items.next(), "close_time")?;
        let quote_volume = float_field(items.next(), "quote_volume")?;

        Ok(RawKline {
            open_time_ms,
            open,
            high,
            low,
            close,
            base_volume,
            close_time_ms,
            quote_volume,
        })
    }
}

pub fn convert_klines(rows: Vec<Vec<Value>>) -> Result<Vec<RawKline>, KlineError> {
    rows.into_iter().map(Vec::try_into).collect()
}

impl From<RawKline> for Candle {
    fn from(raw: RawKline) -> Self {
        Candle::new(
            raw.open_time_ms,
            raw.open,
            raw.high,
            raw.low,
            raw.close,
            raw.base_volume,
            raw.close_time_ms,
            raw.quote_volume,
        )
    }
}
