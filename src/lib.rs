// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod screener;
pub mod utils;

// Re-export commonly used types
pub use data::{BinanceUsdFutures, MarketData};
pub use domain::{Candle, Coin};
pub use screener::{CoinFilter, Exclude, Screener, SortKey, SortOrder};

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use crate::config::SCREENER;
use crate::screener::{update_favorites, write_report};

// CLI argument parsing
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Also refresh the favorites list and report additions/removals
    #[arg(long, default_value_t = false)]
    pub favorites: bool,

    /// Report file to overwrite
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Favorites file to read and overwrite (with --favorites)
    #[arg(long)]
    pub favorites_file: Option<PathBuf>,
}

/// The registered screening rules. Hard-coded; edit here to change a run.
pub fn default_filters() -> Vec<CoinFilter> {
    vec![
        CoinFilter::new(
            "Volume",
            SCREENER.screen_limit,
            SortKey::Volume,
            SortOrder::Descending,
        ),
        CoinFilter::new(
            "Price Change",
            SCREENER.screen_limit,
            SortKey::PriceChange,
            SortOrder::Descending,
        ),
        // Biggest fallers, ignoring contracts too thin to act on
        CoinFilter::new(
            "Price Drop",
            SCREENER.screen_limit,
            SortKey::PriceChange,
            SortOrder::Ascending,
        )
        .exclude(Exclude::Matching(Box::new(|coin: &Coin| {
            coin.volume() < SCREENER.min_window_volume_usdt
        }))),
    ]
}

/// One full screening run - the binary's entry point after arg parsing.
pub async fn run(args: Cli) -> Result<()> {
    let market = BinanceUsdFutures::new()?;

    let mut screener = Screener::build(&market, default_filters()).await?;
    let mut report = screener.screen()?;

    if args.favorites {
        let favorites_path = args
            .favorites_file
            .unwrap_or_else(|| PathBuf::from(SCREENER.favorites_path));
        let diff = update_favorites(screener.coins(), &favorites_path)?;
        report.push_str(&diff.render());
    }

    let report_path = args
        .report
        .unwrap_or_else(|| PathBuf::from(SCREENER.report_path));
    write_report(&report_path, &report)?;
    info!("report saved to {}", report_path.display());

    Ok(())
}
