//! Configuration types for the DDNS updater
//!
//! These are deploy-time settings, fixed for the duration of a run and
//! passed into the updater at construction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default directory holding the last-known IP record and the run log
pub const DEFAULT_STATE_DIR: &str = "/tmp";

/// Default file name prefix for `<prefix>.lastip` and `<prefix>.log`
pub const DEFAULT_FILE_PREFIX: &str = "ddns_linode";

/// Default TTL applied to the updated record
pub const DEFAULT_RECORD_TTL_SECS: u32 = 300;

/// Linode v3 API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.linode.com/";

/// Connect timeout for every network call
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;

/// Overall timeout for every network call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Updater configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Writable directory for the last-known IP record and the run log
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// File name prefix for the persisted files
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Optional IP-echo service whose response body replaces the reported IP
    #[serde(default)]
    pub ip_echo_url: Option<String>,

    /// TTL set on the record when it is updated
    #[serde(default = "default_record_ttl_secs")]
    pub record_ttl_secs: u32,

    /// Base endpoint of the provider API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Overall request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Look up zone and record but skip the update call
    #[serde(default)]
    pub dry_run: bool,
}

impl UpdaterConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            state_dir: default_state_dir(),
            file_prefix: default_file_prefix(),
            ip_echo_url: None,
            record_ttl_secs: default_record_ttl_secs(),
            api_base: default_api_base(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            dry_run: false,
        }
    }

    /// Set the state directory
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    /// Set the IP-echo override URL
    pub fn with_ip_echo_url(mut self, url: impl Into<String>) -> Self {
        self.ip_echo_url = Some(url.into());
        self
    }

    /// Set the provider API base
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Path of the last-known IP record
    pub fn last_ip_path(&self) -> PathBuf {
        self.state_dir.join(format!("{}.lastip", self.file_prefix))
    }

    /// Path of the append-only run log
    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join(format!("{}.log", self.file_prefix))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.state_dir.as_os_str().is_empty() {
            return Err(crate::Error::config("State directory cannot be empty"));
        }

        if self.file_prefix.is_empty() || self.file_prefix.contains('/') {
            return Err(crate::Error::config(format!(
                "File prefix must be a non-empty file name. Got: '{}'",
                self.file_prefix
            )));
        }

        if self.record_ttl_secs == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }

        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(crate::Error::config("Network timeouts must be > 0"));
        }

        validate_http_url("API base", &self.api_base)?;

        if let Some(ref url) = self.ip_echo_url {
            validate_http_url("IP-echo URL", url)?;
        }

        Ok(())
    }
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_http_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", what)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_DIR)
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

fn default_record_ttl_secs() -> u32 {
    DEFAULT_RECORD_TTL_SECS
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
