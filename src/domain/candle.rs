// Define the Candle struct with all its properties
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time_ms: i64,

    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,

    pub base_asset_volume: f64,
    pub close_time_ms: i64,
    pub quote_asset_volume: f64,
}

impl Candle {
    // A constructor for convenience
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        open_time_ms: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        base_vol: f64,
        close_time_ms: i64,
        quote_vol: f64,
    ) -> Self {
        Candle {
            open_time_ms,
            open_price: open,
            high_price: high,
            low_price: low,
            close_price: close,
            base_asset_volume: base_vol,
            close_time_ms,
            quote_asset_volume: quote_vol,
        }
    }
}
