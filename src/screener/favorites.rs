use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::config::SCREENER;
use crate::domain::Coin;
use crate::screener::filter::{CoinFilter, SortKey, SortOrder};

/// Outcome of one favorites refresh: the new set and how it moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesDiff {
    pub favorites: BTreeSet<String>,
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl FavoritesDiff {
    /// Diff a fresh favorites set against the previously persisted one.
    pub fn compute(old: &BTreeSet<String>, new: BTreeSet<String>) -> Self {
        let added = new.difference(old).cloned().collect();
        let removed = old.difference(&new).cloned().collect();
        FavoritesDiff {
            favorites: new,
            added,
            removed,
        }
    }

    /// Report block appended after the filter sections.
    pub fn render(&self) -> String {
        format!(
            "Favorites added: {:?}\nFavorites removed: {:?}\n",
            self.added, self.removed
        )
    }
}

/// Refresh the favorites list: union of top-N-by-volume and
/// top-N-by-price-change, diffed against the persisted file, which is then
/// overwritten with the new set.
pub fn update_favorites(coins: &[Coin], path: impl AsRef<Path>) -> Result<FavoritesDiff> {
    let path = path.as_ref();
    let old = load_favorites(path)?;

    let mut by_volume = CoinFilter::new(
        "Volume",
        SCREENER.screen_limit,
        SortKey::Volume,
        SortOrder::Descending,
    );
    let mut by_change = CoinFilter::new(
        "Price Change",
        SCREENER.screen_limit,
        SortKey::PriceChange,
        SortOrder::Descending,
    );

    let mut new = BTreeSet::new();
    for entry in by_volume.filter(coins) {
        new.insert(entry.symbol.clone());
    }
    for entry in by_change.filter(coins) {
        new.insert(entry.symbol.clone());
    }

    let diff = FavoritesDiff::compute(&old, new);
    save_favorites(path, &diff.favorites)?;
    info!(
        "favorites updated: {} symbols (+{} / -{})",
        diff.favorites.len(),
        diff.added.len(),
        diff.removed.len()
    );
    Ok(diff)
}

/// The persisted favorites set. A missing file is an empty set, so the first
/// run reports everything as added.
pub fn load_favorites(path: &Path) -> Result<BTreeSet<String>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read favorites from {}", path.display()))?;
    Ok(parse_favorites(&text))
}

fn parse_favorites(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Overwrite the favorites file, one symbol per line.
pub fn save_favorites(path: &Path, favorites: &BTreeSet<String>) -> Result<()> {
    let mut text = favorites.iter().cloned().collect::<Vec<_>>().join("\n");
    text.push('\n');
    fs::write(path, text)
        .with_context(|| format!("failed to write favorites to {}", path.display()))
}
