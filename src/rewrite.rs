//! Whitelist filter and metadata rewrite for playlist blocks.

use crate::extinf::{ExtInf, GROUP_TITLE};
use crate::groups::ChannelLookup;
use crate::overrides::OverrideTable;
use crate::playlist::Block;

/// A block that survived filtering, with its rewritten metadata line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub extinf: String,
    pub url: String,
}

/// Rewrite one block, or drop it if its channel is not in the lookup.
pub fn rewrite_block(
    block: &Block<'_>,
    lookup: &ChannelLookup,
    overrides: &OverrideTable,
) -> Option<Entry> {
    let mut info = ExtInf::parse(block.extinf)?;
    let name = info.name();
    if name.is_empty() {
        return None;
    }

    let Some(group) = lookup.group_for(name) else {
        tracing::debug!("dropping \"{}\"", name);
        return None;
    };

    let extinf = match overrides.get(name) {
        Some(record) => {
            tracing::debug!("\"{}\" -> {} (override)", name, group);
            ExtInf::from_override(record, group, name).to_string()
        }
        None => {
            tracing::debug!("\"{}\" -> {}", name, group);
            info.set_attribute(GROUP_TITLE, group);
            info.to_string()
        }
    };

    Some(Entry {
        extinf,
        url: block.url.to_string(),
    })
}

/// Rewrite every block in order, dropping the ones not in the lookup.
pub fn rewrite_blocks(
    blocks: &[Block<'_>],
    lookup: &ChannelLookup,
    overrides: &OverrideTable,
) -> Vec<Entry> {
    blocks
        .iter()
        .filter_map(|block| rewrite_block(block, lookup, overrides))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::GroupingTable;
    use crate::playlist::parse_blocks;

    fn sports_lookup() -> ChannelLookup {
        ChannelLookup::build(&GroupingTable::from_json(r#"{"Sports": ["ESPN"]}"#).unwrap())
    }

    fn block<'a>(extinf: &'a str, url: &'a str) -> Block<'a> {
        Block { extinf, url }
    }

    #[test]
    fn test_inserts_group_title() {
        let entry = rewrite_block(
            &block("#EXTINF:-1,ESPN", "http://x/1"),
            &sports_lookup(),
            &OverrideTable::default(),
        )
        .unwrap();
        assert_eq!(entry.extinf, r#"#EXTINF:-1 group-title="Sports",ESPN"#);
        assert_eq!(entry.url, "http://x/1");
    }

    #[test]
    fn test_replaces_existing_group_title() {
        let entry = rewrite_block(
            &block(r#"#EXTINF:-1 tvg-id="1" group-title="Old",ESPN"#, "http://x/2"),
            &sports_lookup(),
            &OverrideTable::default(),
        )
        .unwrap();
        assert_eq!(entry.extinf, r#"#EXTINF:-1 tvg-id="1" group-title="Sports",ESPN"#);
        assert_eq!(entry.url, "http://x/2");
    }

    #[test]
    fn test_unknown_channel_is_dropped() {
        let entry = rewrite_block(
            &block("#EXTINF:-1,Fox", "http://x/9"),
            &sports_lookup(),
            &OverrideTable::default(),
        );
        assert!(entry.is_none());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let entry = rewrite_block(
            &block("#EXTINF:-1, espn ", "http://x/1"),
            &sports_lookup(),
            &OverrideTable::default(),
        )
        .unwrap();
        assert_eq!(entry.extinf, r#"#EXTINF:-1 group-title="Sports", espn "#);
    }

    #[test]
    fn test_override_rebuilds_line() {
        let overrides = OverrideTable::from_json(
            r#"{"espn": {"tvg-id": "e1", "tvg-name": "ESPN HD", "tvg-logo": "L", "display-name": "ESPN HD"}}"#,
        )
        .unwrap();
        let entry = rewrite_block(
            &block("#EXTINF:-1,ESPN", "http://x/3"),
            &sports_lookup(),
            &overrides,
        )
        .unwrap();
        assert_eq!(
            entry.extinf,
            r#"#EXTINF:-1 tvg-id="e1" tvg-name="ESPN HD" tvg-logo="L" tvg-chno="" group-title="Sports",ESPN HD"#
        );
        assert_eq!(entry.url, "http://x/3");
    }

    #[test]
    fn test_override_for_unlisted_channel_does_not_whitelist_it() {
        let overrides = OverrideTable::from_json(r#"{"fox": {"tvg-id": "f1"}}"#).unwrap();
        let entry = rewrite_block(
            &block("#EXTINF:-1,Fox", "http://x/4"),
            &sports_lookup(),
            &overrides,
        );
        assert!(entry.is_none());
    }

    #[test]
    fn test_rewrite_blocks_keeps_order_and_urls() {
        let lookup = ChannelLookup::build(
            &GroupingTable::from_json(r#"{"Sports": ["ESPN"], "News": ["CNN"]}"#).unwrap(),
        );
        let content = "#EXTM3U\n#EXTINF:-1,CNN\nhttp://x/cnn?token=a&b=c\n#EXTINF:-1,Fox\nhttp://x/fox\n#EXTINF:-1,ESPN\nhttp://x/espn\n";
        let blocks = parse_blocks(content);
        let entries = rewrite_blocks(&blocks, &lookup, &OverrideTable::default());

        let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["http://x/cnn?token=a&b=c", "http://x/espn"]);
        assert_eq!(entries[0].extinf, r#"#EXTINF:-1 group-title="News",CNN"#);
    }
}
