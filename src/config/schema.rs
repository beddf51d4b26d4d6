use crate::error::ConfigError;
use crate::retention::{
    DEFAULT_CHECKPOINT_INTERVAL_DAYS, DEFAULT_DAILY_DAYS, DEFAULT_SPREAD_DAYS, RetentionPolicy,
};
use crate::snapshot::{DEFAULT_NAME_PREFIX, SnapshotNamer};
use crate::store::http_client::DEFAULT_REQUEST_TIMEOUT_SECS;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the Elasticsearch cluster
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Snapshot repository to thin
    #[serde(default = "default_repository_name")]
    pub repository_name: String,

    /// Snapshot names look like `<name_prefix>_<yymmdd>_<HHMM>`
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub retention: RetentionConfig,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9200/".into()
}

fn default_repository_name() -> String {
    "snapshots".into()
}

fn default_name_prefix() -> String {
    DEFAULT_NAME_PREFIX.into()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            repository_name: default_repository_name(),
            name_prefix: default_name_prefix(),
            request_timeout_secs: default_request_timeout_secs(),
            username: None,
            password: None,
            retention: RetentionConfig::default(),
        }
    }
}

// ── Retention ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    /// Keep every snapshot younger than this
    #[serde(default = "default_daily_days")]
    pub daily_days: u32,

    /// Thin snapshots between `daily_days` and this age to three
    #[serde(default = "default_spread_days")]
    pub spread_days: u32,

    /// Spacing of the sparse checkpoints kept beyond that
    #[serde(default = "default_checkpoint_interval_days")]
    pub checkpoint_interval_days: u32,
}

fn default_daily_days() -> u32 {
    DEFAULT_DAILY_DAYS
}

fn default_spread_days() -> u32 {
    DEFAULT_SPREAD_DAYS
}

fn default_checkpoint_interval_days() -> u32 {
    DEFAULT_CHECKPOINT_INTERVAL_DAYS
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            daily_days: default_daily_days(),
            spread_days: default_spread_days(),
            checkpoint_interval_days: default_checkpoint_interval_days(),
        }
    }
}

// ── Command-line overrides ────────────────────────────────────────

/// Values given on the command line take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub repository_name: Option<String>,
    pub name_prefix: Option<String>,
}

// ── Loading & validation ──────────────────────────────────────────

impl Config {
    /// `~/.snapthin/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
        Ok(home.join(".snapthin").join("config.toml"))
    }

    /// Load `path`, or the default location when `None`.
    ///
    /// An explicitly given path must exist. A missing file at the default
    /// location yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(repository_name) = overrides.repository_name {
            self.repository_name = repository_name;
        }
        if let Some(name_prefix) = overrides.name_prefix {
            self.name_prefix = name_prefix;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url()?;
        if self.repository_name.trim().is_empty() {
            return Err(ConfigError::Validation("repository_name must not be empty".into()));
        }
        if self.name_prefix.is_empty() {
            return Err(ConfigError::Validation("name_prefix must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be positive".into(),
            ));
        }
        if self.password.is_some() && self.username.is_none() {
            return Err(ConfigError::Validation("password is set without username".into()));
        }
        self.retention_policy()?;
        Ok(())
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::Validation(format!("endpoint {:?}: {e}", self.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ConfigError::Validation(format!(
                "endpoint {:?} must be an http(s) URL",
                self.endpoint
            )));
        }
        Ok(url)
    }

    pub fn retention_policy(&self) -> Result<RetentionPolicy, ConfigError> {
        RetentionPolicy::from_days(
            self.retention.daily_days,
            self.retention.spread_days,
            self.retention.checkpoint_interval_days,
        )
    }

    pub fn namer(&self) -> SnapshotNamer {
        SnapshotNamer::new(self.name_prefix.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.namer().prefix(), "snapshot");
        assert_eq!(config.retention_policy().unwrap(), RetentionPolicy::default());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_reads_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
endpoint = "https://es.internal:9200/"
repository_name = "ipfs_wasabi"

[retention]
daily_days = 3
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.endpoint, "https://es.internal:9200/");
        assert_eq!(config.repository_name, "ipfs_wasabi");
        assert_eq!(config.name_prefix, "snapshot");
        assert_eq!(config.retention.daily_days, 3);
        assert_eq!(config.retention.spread_days, 28);
    }

    #[test]
    fn load_from_missing_explicit_path_fails() {
        let tmp = TempDir::new().unwrap();
        let err = Config::load(Some(&tmp.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "repository = \"typo\"\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            endpoint: Some("http://es:9200".into()),
            repository_name: None,
            name_prefix: Some("nightly".into()),
        });

        assert_eq!(config.endpoint, "http://es:9200");
        assert_eq!(config.repository_name, "snapshots");
        assert_eq!(config.name_prefix, "nightly");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad_endpoint = Config {
            endpoint: "ftp://es".into(),
            ..Config::default()
        };
        assert!(bad_endpoint.validate().is_err());

        let no_repo = Config {
            repository_name: " ".into(),
            ..Config::default()
        };
        assert!(no_repo.validate().is_err());

        let no_prefix = Config {
            name_prefix: String::new(),
            ..Config::default()
        };
        assert!(no_prefix.validate().is_err());

        let orphan_password = Config {
            password: Some("secret".into()),
            ..Config::default()
        };
        assert!(orphan_password.validate().is_err());

        let inverted_windows = Config {
            retention: RetentionConfig {
                daily_days: 30,
                ..RetentionConfig::default()
            },
            ..Config::default()
        };
        assert!(inverted_windows.validate().is_err());
    }
}
