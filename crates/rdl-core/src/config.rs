//! Settings loaded once at startup from `~/.config/rdl/config.toml`.
//!
//! Every failure here is fatal: the pipeline never starts without a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::feed::ListingSort;

/// Fatal configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot locate XDG config directory: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("config I/O at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("created default config at {}; set the subreddit and account, then re-run", .path.display())]
    Created { path: PathBuf },
}

/// Reddit account for an authenticated (OAuth "script" app) session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub user: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
    /// Overrides the default User-Agent sent to reddit.
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// External downloader executable used for both probing and fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Executable name or path (looked up in PATH when bare).
    pub program: String,
    /// Arguments before the URL when asking for a duration.
    pub probe_args: Vec<String>,
    /// Arguments before `-o <template> <url>` when downloading.
    pub fetch_args: Vec<String>,
    /// Kill the probe after this many seconds (None = wait forever).
    #[serde(default)]
    pub probe_timeout_secs: Option<u64>,
    /// Kill the download after this many seconds (None = wait forever).
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            probe_args: vec!["--get-duration".to_string(), "--no-warnings".to_string()],
            fetch_args: vec!["--no-overwrites".to_string()],
            probe_timeout_secs: Some(120),
            fetch_timeout_secs: None,
        }
    }
}

impl ToolsConfig {
    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_secs.map(Duration::from_secs)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdlConfig {
    /// Subreddit to scan; None scans the front page.
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub sort: ListingSort,
    /// Number of submissions to request from the listing.
    pub entries: u32,
    /// Minimum duration in minutes for videos shorter than an hour.
    pub min_duration: u32,
    /// Maximum number of probe/fetch units running at once.
    pub max_concurrent: usize,
    /// A URL is a candidate when it contains any of these (case-insensitive).
    pub host_patterns: Vec<String>,
    /// Output template handed to the fetcher (`%(title)s` style placeholders).
    pub output_template: String,
    #[serde(default)]
    pub account: Option<AccountConfig>,
    #[serde(default)]
    pub tools: Option<ToolsConfig>,
}

impl Default for RdlConfig {
    fn default() -> Self {
        Self {
            subreddit: None,
            sort: ListingSort::New,
            entries: 25,
            min_duration: 10,
            max_concurrent: 4,
            host_patterns: vec!["youtube".to_string()],
            output_template: "%(title)s.%(ext)s".to_string(),
            account: None,
            tools: None,
        }
    }
}

impl RdlConfig {
    /// Tools section, or the built-in yt-dlp defaults.
    pub fn tools(&self) -> ToolsConfig {
        self.tools.clone().unwrap_or_default()
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.entries) {
            return Err(ConfigError::Invalid(format!(
                "entries must be between 1 and 100, got {}",
                self.entries
            )));
        }
        if self.host_patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "host_patterns must contain at least one pattern".to_string(),
            ));
        }
        if self.output_template.trim().is_empty() {
            return Err(ConfigError::Invalid("output_template is empty".to_string()));
        }
        if let Some(sub) = &self.subreddit {
            if sub.trim().is_empty() || sub.contains('/') {
                return Err(ConfigError::Invalid(format!("bad subreddit name {:?}", sub)));
            }
        }
        if let Some(tools) = &self.tools {
            if tools.program.trim().is_empty() {
                return Err(ConfigError::Invalid("tools.program is empty".to_string()));
            }
        }
        if let Some(acct) = &self.account {
            let fields = [
                ("user", &acct.user),
                ("password", &acct.password),
                ("client_id", &acct.client_id),
                ("client_secret", &acct.client_secret),
            ];
            for (name, value) in fields {
                if value.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!("account.{} is empty", name)));
                }
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rdl")?;
    xdg_dirs
        .place_config_file("config.toml")
        .map_err(|source| ConfigError::Io {
            path: xdg_dirs.get_config_home(),
            source,
        })
}

/// Load configuration from the default location, writing a default file if none exists.
pub fn load_or_init() -> Result<RdlConfig, ConfigError> {
    load_or_init_at(&config_path()?)
}

/// Load configuration from `path`. A missing file is created with defaults and
/// reported as [`ConfigError::Created`] so the user can fill it in first.
pub fn load_or_init_at(path: &Path) -> Result<RdlConfig, ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        let default_cfg = RdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, toml).map_err(io_err)?;
        tracing::info!("created default config at {}", path.display());
        return Err(ConfigError::Created {
            path: path.to_path_buf(),
        });
    }

    let data = fs::read_to_string(path).map_err(io_err)?;
    let cfg: RdlConfig = toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    cfg.validate()?;
    Ok(cfg)
}
