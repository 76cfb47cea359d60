//! Grouping table and the case-insensitive channel lookup derived from it.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{RegroupError, Result};

/// Group label -> channel names, in the order they appear in the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingTable {
    groups: Vec<(String, Vec<String>)>,
}

impl GroupingTable {
    /// Parse a JSON object of `{"Group": ["Channel", ...], ...}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| RegroupError::InvalidGroups(e.to_string()))?;

        let object = value.as_object().ok_or_else(|| {
            RegroupError::InvalidGroups("expected an object of group -> channel list".to_string())
        })?;

        let mut groups = Vec::with_capacity(object.len());
        for (group, channels) in object {
            let list = channels.as_array().ok_or_else(|| {
                RegroupError::InvalidGroups(format!("group \"{}\" is not a list", group))
            })?;
            let names = list
                .iter()
                .map(|name| {
                    name.as_str().map(str::to_string).ok_or_else(|| {
                        RegroupError::InvalidGroups(format!(
                            "group \"{}\" contains a non-string entry: {}",
                            group, name
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            groups.push((group.clone(), names));
        }

        Ok(Self { groups })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(group, names)| (group.as_str(), names.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Lowercased channel name -> group label.
#[derive(Debug, Clone, Default)]
pub struct ChannelLookup {
    by_name: HashMap<String, String>,
}

impl ChannelLookup {
    /// Invert the grouping table. A name listed under several groups maps to
    /// the last one in table order.
    pub fn build(table: &GroupingTable) -> Self {
        let mut by_name = HashMap::new();
        for (group, names) in table.iter() {
            for name in names {
                if let Some(previous) = by_name.insert(name.to_lowercase(), group.to_string()) {
                    if previous != group {
                        tracing::debug!(
                            "channel \"{}\" listed under \"{}\" and \"{}\"; using \"{}\"",
                            name,
                            previous,
                            group,
                            group
                        );
                    }
                }
            }
        }
        Self { by_name }
    }

    pub fn group_for(&self, channel_name: &str) -> Option<&str> {
        self.by_name
            .get(&channel_name.to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
