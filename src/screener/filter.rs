use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

use crate::domain::Coin;
use crate::screener::report::RULE;

/// Built-in sort keys a filter can rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Volume,
    PriceChange,
}

impl SortKey {
    pub fn value(&self, coin: &Coin) -> f64 {
        match self {
            SortKey::Volume => coin.volume(),
            SortKey::PriceChange => coin.price_change(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Exclusion rule applied before ranking.
pub enum Exclude {
    /// Keep everything (the default)
    Never,
    /// Drop coins the predicate returns true for
    Matching(Box<dyn Fn(&Coin) -> bool + Send + Sync>),
}

impl Exclude {
    fn matches(&self, coin: &Coin) -> bool {
        match self {
            Exclude::Never => false,
            Exclude::Matching(predicate) => predicate(coin),
        }
    }
}

/// Results were read off a filter that has never run - a caller bug, kept
/// separate from data and network errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    NotYetRun(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FilterError::NotYetRun(label) => {
                write!(f, "filter '{}' queried before any filter pass", label)
            }
        }
    }
}

impl Error for FilterError {}

/// One ranked entry of a filter pass: the symbol plus the key value it ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    pub symbol: String,
    pub key_value: f64,
}

/// A named ranking rule: drop exclusions, stable-sort the rest by a key, keep
/// the top `limit`. Configured once; each `filter` pass replaces the cached
/// result wholesale.
pub struct CoinFilter {
    label: String,
    limit: usize,
    key: SortKey,
    order: SortOrder,
    exclude: Exclude,
    filtered: Option<Vec<FilterEntry>>,
}

impl CoinFilter {
    pub fn new(label: impl Into<String>, limit: usize, key: SortKey, order: SortOrder) -> Self {
        CoinFilter {
            label: label.into(),
            limit,
            key,
            order,
            exclude: Exclude::Never,
            filtered: None,
        }
    }

    /// Builder-style exclusion predicate.
    pub fn exclude(mut self, exclude: Exclude) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Rank `coins` and cache the outcome. Ties keep input order: the sort is
    /// stable in both directions, so reports are reproducible.
    pub fn filter(&mut self, coins: &[Coin]) -> &[FilterEntry] {
        let mut entries: Vec<FilterEntry> = coins
            .iter()
            .filter(|coin| !self.exclude.matches(coin))
            .map(|coin| FilterEntry {
                symbol: coin.symbol.clone(),
                key_value: self.key.value(coin),
            })
            .collect();

        entries.sort_by(|a, b| {
            let ordering = a
                .key_value
                .partial_cmp(&b.key_value)
                .unwrap_or(Ordering::Equal);
            match self.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        entries.truncate(self.limit);

        self.filtered.insert(entries).as_slice()
    }

    /// The last cached pass.
    pub fn filtered_coins(&self) -> Result<&[FilterEntry], FilterError> {
        self.filtered
            .as_deref()
            .ok_or_else(|| FilterError::NotYetRun(self.label.clone()))
    }

    /// Report block: a dash-rule header naming the filter, then one line per
    /// coin with its sort-key value to two decimals.
    pub fn explanation(&self) -> Result<String, FilterError> {
        let entries = self.filtered_coins()?;
        let mut block = String::new();
        block.push_str(RULE);
        block.push_str(&self.label);
        block.push('\n');
        block.push_str(RULE);
        for entry in entries {
            block.push_str(&format!("{} : {:.2}\n", entry.symbol, entry.key_value));
        }
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;

    /// A coin whose window volume and price-change land exactly on the
    /// requested values.
    fn coin(symbol: &str, volume: f64, change_pct: f64) -> Coin {
        let candle = Candle::new(
            0,
            100.0,
            100.0 + change_pct,
            100.0,
            100.0 + change_pct,
            0.0,
            0,
            volume,
        );
        Coin::from_candles(symbol, vec![candle]).unwrap()
    }

    #[test]
    fn limit_truncates_after_ranking() {
        let coins = vec![coin("A", 100.0, 0.0), coin("B", 300.0, 0.0), coin("C", 200.0, 0.0)];
        let mut filter = CoinFilter::new("Volume", 2, SortKey::Volume, SortOrder::Descending);

        let symbols: Vec<&str> = filter.filter(&coins).iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "C"]);
    }

    #[test]
    fn ascending_order_reverses_the_ranking() {
        let coins = vec![coin("A", 0.0, 5.0), coin("B", 0.0, 1.0), coin("C", 0.0, 3.0)];
        let mut filter = CoinFilter::new("Drop", 3, SortKey::PriceChange, SortOrder::Ascending);

        let symbols: Vec<&str> = filter.filter(&coins).iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "C", "A"]);
    }

    #[test]
    fn excluded_coins_never_reach_the_output() {
        let coins = vec![coin("A", 100.0, 0.0), coin("B", 300.0, 0.0), coin("C", 200.0, 0.0)];
        let mut filter = CoinFilter::new("Volume", 10, SortKey::Volume, SortOrder::Descending)
            .exclude(Exclude::Matching(Box::new(|c: &Coin| c.volume() > 250.0)));

        let entries = filter.filter(&coins);
        assert!(entries.iter().all(|e| e.symbol != "B"));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let coins = vec![coin("A", 100.0, 0.0), coin("B", 100.0, 0.0), coin("C", 100.0, 0.0)];
        let mut filter = CoinFilter::new("Volume", 3, SortKey::Volume, SortOrder::Descending);

        let symbols: Vec<&str> = filter.filter(&coins).iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A", "B", "C"]);
    }

    #[test]
    fn querying_before_any_pass_is_a_precondition_error() {
        let filter = CoinFilter::new("Volume", 3, SortKey::Volume, SortOrder::Descending);
        assert_eq!(
            filter.filtered_coins().unwrap_err(),
            FilterError::NotYetRun("Volume".to_string())
        );
        assert!(filter.explanation().is_err());
    }

    #[test]
    fn repeat_passes_replace_the_cache() {
        let mut filter = CoinFilter::new("Volume", 5, SortKey::Volume, SortOrder::Descending);
        filter.filter(&[coin("A", 100.0, 0.0)]);
        filter.filter(&[coin("B", 200.0, 0.0)]);

        let entries = filter.filtered_coins().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].symbol, "B");
    }

    #[test]
    fn explanation_renders_the_report_block() {
        let mut filter = CoinFilter::new("Volume", 2, SortKey::Volume, SortOrder::Descending);
        filter.filter(&[coin("A", 100.0, 0.0), coin("B", 300.5, 0.0)]);

        assert_eq!(
            filter.explanation().unwrap(),
            "---------------------------------------------\n\
             Volume\n\
             ---------------------------------------------\n\
             B : 300.50\n\
             A : 100.00\n"
        );
    }
}
