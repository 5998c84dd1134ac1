use crate::utils::TimeUtils;

/// Screening window, ranking limits and output paths.
pub struct ScreenerConfig {
    /// Candle interval the window is sampled at
    pub candle_interval_ms: i64,
    /// Width of the screening window; must divide evenly by the interval
    pub window_ms: i64,
    /// Coins each filter keeps after ranking
    pub screen_limit: usize,
    /// Universe gate: minimum 24h quote volume, in USDT
    pub min_volume_24h_usdt: f64,
    /// Exclusion floor for window quote volume, in USDT
    pub min_window_volume_usdt: f64,
    pub quote_asset: &'static str,
    pub contract_type: &'static str,
    pub report_path: &'static str,
    pub favorites_path: &'static str,
}

impl ScreenerConfig {
    /// Candles per screening window.
    pub const fn candle_count(&self) -> usize {
        (self.window_ms / self.candle_interval_ms) as usize
    }
}

pub const SCREENER: ScreenerConfig = ScreenerConfig {
    candle_interval_ms: TimeUtils::MS_IN_5_MIN,
    window_ms: TimeUtils::MS_IN_4_H,
    screen_limit: 10,
    min_volume_24h_usdt: 5_000_000.0,
    min_window_volume_usdt: 100_000.0,
    quote_asset: "USDT",
    contract_type: "PERPETUAL",
    report_path: "summary.txt",
    favorites_path: "favorites.txt",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_divides_evenly_into_candles() {
        assert_eq!(SCREENER.window_ms % SCREENER.candle_interval_ms, 0);
        assert_eq!(SCREENER.candle_count(), 48);
    }
}
