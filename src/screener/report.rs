use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub(crate) const RULE: &str = "---------------------------------------------\n";

/// Assemble the report text: every filter's explanation block, then the
/// deduplicated union of screened symbols. Pure - writing is `write_report`.
pub(crate) fn render(filter_blocks: &[String], union: &[String]) -> String {
    let mut text = String::new();
    for block in filter_blocks {
        text.push_str(block);
        text.push('\n');
    }

    text.push_str(RULE);
    text.push_str(&format!("Screened symbols: {}\n", union.len()));
    text.push_str(RULE);
    for symbol in union {
        text.push_str(symbol);
        text.push('\n');
    }
    text
}

/// Overwrite the report file wholesale; each run fully replaces prior content.
pub fn write_report(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, text).with_context(|| format!("failed to write report to {}", path.display()))
}
