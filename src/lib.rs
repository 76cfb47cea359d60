//! Download an M3U playlist, keep the channels listed in a grouping table,
//! relabel them with their group, and write the result as a new playlist.

pub mod config;
pub mod error;
pub mod extinf;
pub mod fetch;
pub mod groups;
pub mod overrides;
pub mod playlist;
pub mod rewrite;
pub mod writer;

use std::path::Path;

pub use config::Config;
pub use error::{RegroupError, Result};

use crate::fetch::fetch_playlist;
use crate::groups::ChannelLookup;
use crate::playlist::parse_blocks;
use crate::rewrite::rewrite_blocks;
use crate::writer::write_playlist;

/// Counts reported after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub blocks: usize,
    pub written: usize,
}

/// Fetch, filter, rewrite and write. Nothing is written if the fetch fails.
pub async fn run(config: &Config, output: &Path) -> Result<RunSummary> {
    let lookup = ChannelLookup::build(&config.groups);
    tracing::debug!(
        "{} channels across {} groups, {} overrides",
        lookup.len(),
        config.groups.len(),
        config.overrides.len()
    );

    tracing::info!("Fetching playlist from: {}", config.source_url);
    let text = fetch_playlist(&config.source_url).await?;

    let blocks = parse_blocks(&text);
    tracing::info!("Parsed {} playlist entries", blocks.len());

    let entries = rewrite_blocks(&blocks, &lookup, &config.overrides);
    if entries.is_empty() {
        tracing::warn!("No matching channels found");
    } else {
        tracing::info!("Found {} categorized channels", entries.len());
    }

    write_playlist(output, &entries)?;
    tracing::info!("'{}' written successfully", output.display());

    Ok(RunSummary {
        blocks: blocks.len(),
        written: entries.len(),
    })
}
