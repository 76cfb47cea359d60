//! Per-channel display overrides.
//!
//! A channel with an override has its metadata line rebuilt from scratch
//! instead of patched. The catalog is loaded from `CHANNEL_OVERRIDES` (JSON) or
//! a TOML file, keyed by channel name:
//!
//! ```toml
//! [espn]
//! tvg-id = "e1"
//! tvg-name = "ESPN HD"
//! tvg-logo = "https://example.com/espn.png"
//! tvg-chno = "206"
//! display-name = "ESPN HD"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RegroupError, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ChannelOverride {
    pub tvg_id: String,
    pub tvg_name: String,
    pub tvg_logo: String,
    pub tvg_chno: String,
    pub display_name: String,
}

/// Lowercased channel name -> override record.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    by_name: HashMap<String, ChannelOverride>,
}

impl OverrideTable {
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| RegroupError::InvalidOverrides(e.to_string()))?;
        let object = value.as_object().ok_or_else(|| {
            RegroupError::InvalidOverrides("expected an object of channel -> record".to_string())
        })?;

        let mut table = Self::default();
        for (name, record) in object {
            // Derived struct impls also accept sequences; only maps are records.
            if !record.is_object() {
                return Err(RegroupError::InvalidOverrides(not_a_record(name)));
            }
            let record = ChannelOverride::deserialize(record)
                .map_err(|e| RegroupError::InvalidOverrides(format!("\"{}\": {}", name, e)))?;
            table.insert(name, record)?;
        }
        Ok(table)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let invalid = |detail: String| {
            RegroupError::InvalidOverrides(format!("{}: {}", path.display(), detail))
        };

        let document: toml::Table = toml::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        let mut table = Self::default();
        for (name, record) in document {
            if !record.is_table() {
                return Err(invalid(not_a_record(&name)));
            }
            let record: ChannelOverride = record
                .try_into()
                .map_err(|e| invalid(format!("\"{}\": {}", name, e)))?;
            table.insert(&name, record)?;
        }
        Ok(table)
    }

    /// Names that differ only by case would shadow each other, so they are rejected.
    fn insert(&mut self, name: &str, record: ChannelOverride) -> Result<()> {
        let key = name.to_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(RegroupError::InvalidOverrides(format!(
                "channel \"{}\" is listed more than once (names are case-insensitive)",
                name
            )));
        }
        self.by_name.insert(key, record);
        Ok(())
    }

    pub fn get(&self, channel_name: &str) -> Option<&ChannelOverride> {
        self.by_name.get(&channel_name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn not_a_record(name: &str) -> String {
    format!("\"{}\" is not a table of attributes", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_json_lowercases_keys_and_defaults_fields() {
        let table = OverrideTable::from_json(
            r#"{"ESPN": {"tvg-id": "e1", "tvg-name": "ESPN HD", "tvg-logo": "L", "display-name": "ESPN HD"}}"#,
        )
        .unwrap();
        let record = table.get("espn").unwrap();
        assert_eq!(record.tvg_id, "e1");
        assert_eq!(record.tvg_chno, "");
        assert_eq!(record.display_name, "ESPN HD");
        assert!(table.get("Espn").is_some());
        assert!(table.get("fox").is_none());
    }

    #[test]
    fn test_from_json_rejects_malformed_records() {
        for raw in [
            r#"{"espn": ["e1"]}"#,
            r#"{"espn": ["e1", "ESPN HD"]}"#,
            r#"{"espn": "e1"}"#,
            r#"{"espn": {"tvg-id": 1}}"#,
            r#"["espn"]"#,
            "not json",
        ] {
            let err = OverrideTable::from_json(raw).unwrap_err();
            assert!(matches!(err, RegroupError::InvalidOverrides(_)), "{}", raw);
        }
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = OverrideTable::from_json(r#"{"espn": {"tvg_id": "e1"}}"#).unwrap_err();
        match err {
            RegroupError::InvalidOverrides(detail) => assert!(detail.contains("tvg_id"), "{}", detail),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_names_differing_only_by_case() {
        let err = OverrideTable::from_json(r#"{"ESPN": {"tvg-id": "a"}, "espn": {"tvg-id": "b"}}"#)
            .unwrap_err();
        assert!(matches!(err, RegroupError::InvalidOverrides(_)));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[\"Sky Sports\"]\ntvg-id = \"sky1\"\ntvg-chno = \"401\"\n\n[espn]\ndisplay-name = \"ESPN\""
        )
        .unwrap();

        let table = OverrideTable::from_toml_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("sky sports").unwrap().tvg_chno, "401");
        assert_eq!(table.get("ESPN").unwrap().display_name, "ESPN");
    }

    #[test]
    fn test_from_toml_file_rejects_array_and_unknown_key() {
        for content in [
            "espn = [\"e1\"]",
            "[espn]\ntvg_id = \"e1\"",
            "[ESPN]\ntvg-id = \"a\"\n[espn]\ntvg-id = \"b\"",
        ] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, "{}", content).unwrap();
            let err = OverrideTable::from_toml_file(file.path()).unwrap_err();
            assert!(matches!(err, RegroupError::InvalidOverrides(_)), "{}", content);
        }
    }

    #[test]
    fn test_from_toml_file_missing_is_io_error() {
        let err = OverrideTable::from_toml_file("/nonexistent/overrides.toml").unwrap_err();
        assert!(matches!(err, RegroupError::Io(_)));
    }
}
