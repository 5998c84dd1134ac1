/// REST constraints: 1000 klines per call and client defaults.
pub struct RestLimits {
    pub klines_limit: usize,
}

pub struct ClientDefaults {
    pub timeout_ms: u64,
}

pub struct BinanceConfig {
    pub rest_base_url: &'static str,
    pub limits: RestLimits,
    pub client: ClientDefaults,
}

pub const BINANCE: BinanceConfig = BinanceConfig {
    rest_base_url: "https://fapi.binance.com",
    limits: RestLimits { klines_limit: 1000 },
    client: ClientDefaults { timeout_ms: 5000 },
};

// Market data endpoints are public; a key only raises the request-weight budget.
pub const BINANCE_API_KEY_ENV: &str = "BINANCE_API_KEY";
