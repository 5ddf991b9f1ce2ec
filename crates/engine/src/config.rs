//! Engine configuration from the environment.

use std::path::PathBuf;

use crate::use_cases::{FeedConfig, Reader};

pub const SNAPSHOT_PATH_VAR: &str = "FABULA_SNAPSHOT_PATH";
pub const READER_VAR: &str = "FABULA_READER";
pub const FEED_MAX_ITEMS_VAR: &str = "FABULA_FEED_MAX_ITEMS";
pub const FEED_BASE_URL_VAR: &str = "FABULA_FEED_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub snapshot_path: PathBuf,
    pub reader: Reader,
    pub feed: FeedConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be set")]
    Missing { var: &'static str },
    #[error("Invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let snapshot_path = get(SNAPSHOT_PATH_VAR)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing {
                var: SNAPSHOT_PATH_VAR,
            })?;

        let reader = match get(READER_VAR) {
            Some(raw) => raw.parse::<Reader>().map_err(|e| ConfigError::Invalid {
                var: READER_VAR,
                message: e.to_string(),
            })?,
            None => Reader::Public,
        };

        let defaults = FeedConfig::default();
        let max_items = match get(FEED_MAX_ITEMS_VAR) {
            Some(raw) => raw.parse::<usize>().map_err(|e| ConfigError::Invalid {
                var: FEED_MAX_ITEMS_VAR,
                message: format!("{:?}: {}", raw, e),
            })?,
            None => defaults.max_items,
        };
        let base_url = get(FEED_BASE_URL_VAR).unwrap_or(defaults.base_url);

        Ok(Self {
            snapshot_path,
            reader,
            feed: FeedConfig {
                base_url,
                max_items,
            },
        })
    }
}

/// Load `.env.local` then `.env` from the repository root, if present.
///
/// Variables already set in the environment win.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load env file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use fabula_domain::CharacterId;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_snapshot_is_set() {
        let config =
            EngineConfig::from_lookup(lookup(&[(SNAPSHOT_PATH_VAR, "story.json")])).unwrap();

        assert_eq!(config.snapshot_path, PathBuf::from("story.json"));
        assert_eq!(config.reader, Reader::Public);
        assert_eq!(config.feed, FeedConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = EngineConfig::from_lookup(lookup(&[
            (SNAPSHOT_PATH_VAR, "/data/story.json"),
            (READER_VAR, "12"),
            (FEED_MAX_ITEMS_VAR, "5"),
            (FEED_BASE_URL_VAR, "https://stories.example"),
        ]))
        .unwrap();

        assert_eq!(config.reader, Reader::Character(CharacterId::new(12)));
        assert_eq!(config.feed.max_items, 5);
        assert_eq!(config.feed.base_url, "https://stories.example");
    }

    #[test]
    fn missing_snapshot_path_is_an_error() {
        let result = EngineConfig::from_lookup(lookup(&[(SNAPSHOT_PATH_VAR, "  ")]));
        assert!(matches!(
            result,
            Err(ConfigError::Missing {
                var: SNAPSHOT_PATH_VAR
            })
        ));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let result = EngineConfig::from_lookup(lookup(&[
            (SNAPSHOT_PATH_VAR, "story.json"),
            (FEED_MAX_ITEMS_VAR, "lots"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                var: FEED_MAX_ITEMS_VAR,
                ..
            })
        ));
    }
}
