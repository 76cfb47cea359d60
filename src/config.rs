//! Run configuration read from the environment.

use url::Url;

use crate::error::{RegroupError, Result};
use crate::groups::GroupingTable;
use crate::overrides::OverrideTable;

pub const SOURCE_URL: &str = "SOURCE_URL";
pub const CHANNEL_GROUPS: &str = "CHANNEL_GROUPS";
pub const CHANNEL_OVERRIDES: &str = "CHANNEL_OVERRIDES";

#[derive(Debug, Clone)]
pub struct Config {
    pub source_url: Url,
    pub groups: GroupingTable,
    pub overrides: OverrideTable,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());

        let source_url = get(SOURCE_URL).ok_or(RegroupError::MissingEnv(SOURCE_URL))?;
        let groups_raw = get(CHANNEL_GROUPS).ok_or(RegroupError::MissingEnv(CHANNEL_GROUPS))?;

        let source_url = Url::parse(source_url.trim())?;
        let groups = GroupingTable::from_json(&groups_raw)?;
        let overrides = match get(CHANNEL_OVERRIDES) {
            Some(raw) => OverrideTable::from_json(&raw)?,
            None => OverrideTable::default(),
        };

        Ok(Self {
            source_url,
            groups,
            overrides,
        })
    }

    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }
}
