//! List profiles loaded from TOML.
//!
//! ```toml
//! [config]
//! page_size = 20
//! url_write_mode = "replace"
//!
//! [[filters]]
//! key = "q"
//! highlight = true
//!
//! [[filters]]
//! key = "court"
//! kind = "select"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use lexlist_model::{FilterField, FilterPatch, FilterSchema, FilterValue, ListConfig};
use serde::Deserialize;

/// Configuration and filter schema for one list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListProfile {
    #[serde(default)]
    pub config: ListConfig,
    #[serde(default = "default_schema")]
    pub filters: FilterSchema,
}

impl Default for ListProfile {
    fn default() -> Self {
        Self {
            config: ListConfig::default(),
            filters: default_schema(),
        }
    }
}

/// Schema of a typical judgment search page.
pub fn default_schema() -> FilterSchema {
    FilterSchema::new(vec![
        FilterField::text("q").with_highlight(),
        FilterField::select("court"),
        FilterField::number("year"),
    ])
    .unwrap_or_default()
}

impl ListProfile {
    /// Parse and validate a profile from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let profile: Self = toml::from_str(text).context("parse list profile")?;
        profile
            .config
            .validate()
            .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
        Ok(profile)
    }

    /// Load a profile from disk, or the default profile when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("read profile {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("load profile {}", path.display()))
    }

    /// Build a patch from `key=value` command-line arguments.
    pub fn parse_filter_args(&self, args: &[String]) -> Result<FilterPatch> {
        let mut patch = FilterPatch::new();
        for arg in args {
            let Some((key, raw)) = arg.split_once('=') else {
                bail!("filter '{arg}' must look like key=value");
            };
            let Some(field) = self.filters.field(key) else {
                bail!("'{key}' is not a filter on this list");
            };
            let Some(value) = FilterValue::parse(field.kind, raw) else {
                bail!("'{raw}' is not a valid value for '{key}'");
            };
            patch = patch.with(key, value);
        }
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexlist_model::{FilterKind, UrlWriteMode};

    #[test]
    fn test_profile_from_toml() {
        let profile = ListProfile::from_toml(
            r#"
            [config]
            page_size = 2
            url_write_mode = "replace"

            [[filters]]
            key = "title"
            highlight = true

            [[filters]]
            key = "state"
            kind = "select"
            default = "central"
            "#,
        )
        .unwrap();
        assert_eq!(profile.config.page_size, 2);
        assert_eq!(profile.config.url_write_mode, UrlWriteMode::Replace);
        assert_eq!(profile.filters.field("state").unwrap().kind, FilterKind::Select);
    }

    #[test]
    fn test_empty_profile_uses_defaults() {
        let profile = ListProfile::from_toml("").unwrap();
        assert_eq!(profile, ListProfile::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = ListProfile::from_toml("[config]\npage_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("page_size"), "{err}");
    }

    #[test]
    fn test_parse_filter_args() {
        let profile = ListProfile::default();
        let patch = profile
            .parse_filter_args(&["court=SC".to_string(), "year=2019".to_string()])
            .unwrap();
        assert_eq!(
            patch,
            FilterPatch::new().with("court", "SC").with("year", 2019_i64)
        );
        assert!(profile.parse_filter_args(&["year=soon".to_string()]).is_err());
        assert!(profile.parse_filter_args(&["page=2".to_string()]).is_err());
        assert!(profile.parse_filter_args(&["court".to_string()]).is_err());
    }
}
