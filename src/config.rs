//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Required Variables
//!
//! - `SOURCE_FILE` - CSV file holding the redirect mapping (`key,target[,active]`)
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `SOURCE_SKIP_HEADER` - First CSV row is a header (default: `true`)
//! - `SOURCE_CHECK_MODIFIED` - Skip refreshes while the file is unchanged (default: `true`)
//! - `SOURCE_TIMEOUT` - Seconds a single fetch may take (default: 30)
//! - `UPDATE_PERIOD` - Seconds between refreshes (default: 300, minimum: 15)
//! - `HTTP_CACHE_MAX_AGE` - `max-age` of redirect responses (default: 2 × update period)
//! - `FALLBACK_FILE` - Snapshot of the last good mapping (default: disabled)
//! - `IGNORE_CASE_IN_PATH` - Case-insensitive keys (default: `true`)
//! - `ALLOW_ROOT_REDIRECT` - Use the `__root` key for empty paths (default: `true`)
//! - `ENABLE_INFO_PAGES` - Serve `/<key>+` info pages (default: `true`)
//! - `SHOW_SERVER_HEADER` - Send `Server: short-link` (default: `true`)
//! - `ENABLE_ETAG` - Send ETags (default: `true`)
//! - `ENABLE_REDIRECT_BODY` - Send a small HTML body with redirects (default: `true`)
//! - `FAVICON` - Icon URL linked from HTML pages; a remote URL (`//` in it)
//!   also answers `/favicon.*` with a redirect (default: none)
//! - `STATUS_ENABLED` - Serve `/_status/health` (default: `true`)
//! - `ADMIN_API_ENABLED` - Serve `/_status/info` and `/_api/update-mapping` (default: `false`)
//! - `REQUEST_TIMEOUT` - Seconds before a request is aborted (default: 10)
//!
//! Boolean variables accept `1`/`t`/`true` and `0`/`f`/`false`; anything else
//! falls back to the default.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::services::resolver::ResolverOptions;
use crate::domain::keys::KeyOptions;
use crate::utils::flags::parse_bool;

pub const DEFAULT_UPDATE_PERIOD_SECS: u64 = 300;
pub const MINIMUM_UPDATE_PERIOD_SECS: u64 = 15;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,

    // ── Data source ─────────────────────────────────────────────────────────
    pub source_file: PathBuf,
    pub source_skip_header: bool,
    pub source_check_modified: bool,
    pub source_timeout_secs: u64,

    // ── Refresh ─────────────────────────────────────────────────────────────
    pub update_period_secs: u64,
    /// `None` disables the snapshot.
    pub fallback_file: Option<PathBuf>,

    // ── Responses ───────────────────────────────────────────────────────────
    pub http_cache_max_age: u64,
    pub ignore_case_in_path: bool,
    pub allow_root_redirect: bool,
    pub enable_info_pages: bool,
    pub show_server_header: bool,
    pub enable_etag: bool,
    pub enable_redirect_body: bool,
    /// Icon URL for HTML pages and `/favicon.*`.
    pub favicon: Option<String>,
    pub request_timeout_secs: u64,

    // ── Endpoints ───────────────────────────────────────────────────────────
    pub status_enabled: bool,
    /// Enables `/_status/info` and `/_api/update-mapping`. These endpoints
    /// carry no authentication and must be protected by the deployment.
    pub admin_api_enabled: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `SOURCE_FILE` is missing.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let source_file = env::var("SOURCE_FILE")
            .map(PathBuf::from)
            .context("SOURCE_FILE must be set")?;

        let update_period_secs = Self::load_update_period();
        let http_cache_max_age = env_number("HTTP_CACHE_MAX_AGE").unwrap_or(update_period_secs * 2);

        let fallback_file = env::var("FALLBACK_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            source_file,
            source_skip_header: env_flag("SOURCE_SKIP_HEADER", true),
            source_check_modified: env_flag("SOURCE_CHECK_MODIFIED", true),
            source_timeout_secs: env_number("SOURCE_TIMEOUT").unwrap_or(30),
            update_period_secs,
            fallback_file,
            http_cache_max_age,
            ignore_case_in_path: env_flag("IGNORE_CASE_IN_PATH", true),
            allow_root_redirect: env_flag("ALLOW_ROOT_REDIRECT", true),
            enable_info_pages: env_flag("ENABLE_INFO_PAGES", true),
            show_server_header: env_flag("SHOW_SERVER_HEADER", true),
            enable_etag: env_flag("ENABLE_ETAG", true),
            enable_redirect_body: env_flag("ENABLE_REDIRECT_BODY", true),
            favicon: env::var("FAVICON")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            request_timeout_secs: env_number("REQUEST_TIMEOUT").unwrap_or(10),
            status_enabled: env_flag("STATUS_ENABLED", true),
            admin_api_enabled: env_flag("ADMIN_API_ENABLED", false),
        })
    }

    /// Loads `UPDATE_PERIOD`, replacing values below the minimum with the
    /// default.
    fn load_update_period() -> u64 {
        let period = env_number("UPDATE_PERIOD").unwrap_or(DEFAULT_UPDATE_PERIOD_SECS);
        if period < MINIMUM_UPDATE_PERIOD_SECS {
            tracing::warn!(
                current = period,
                min = MINIMUM_UPDATE_PERIOD_SECS,
                default = DEFAULT_UPDATE_PERIOD_SECS,
                "UPDATE_PERIOD set to less than minimum, setting it to default"
            );
            return DEFAULT_UPDATE_PERIOD_SECS;
        }
        period
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `source_file` is empty
    /// - a timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.source_file.as_os_str().is_empty() {
            anyhow::bail!("SOURCE_FILE must not be empty");
        }

        if self.source_timeout_secs == 0 {
            anyhow::bail!("SOURCE_TIMEOUT must be greater than 0");
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT must be greater than 0");
        }

        if self.update_period_secs < MINIMUM_UPDATE_PERIOD_SECS {
            anyhow::bail!(
                "UPDATE_PERIOD must be at least {} seconds, got {}",
                MINIMUM_UPDATE_PERIOD_SECS,
                self.update_period_secs
            );
        }

        Ok(())
    }

    pub fn update_period(&self) -> Duration {
        Duration::from_secs(self.update_period_secs)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `Cache-Control` value sent with redirects and HTML pages.
    pub fn cache_control_header(&self) -> String {
        format!("public, max-age={}", self.http_cache_max_age)
    }

    pub fn key_options(&self) -> KeyOptions {
        KeyOptions {
            ignore_case: self.ignore_case_in_path,
            info_enabled: self.enable_info_pages,
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            keys: self.key_options(),
            allow_root_redirect: self.allow_root_redirect,
        }
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Source file: {}", self.source_file.display());
        tracing::info!("  Update period: {}s", self.update_period_secs);

        if let Some(ref path) = self.fallback_file {
            tracing::info!("  Fallback file: {} (enabled)", path.display());
        } else {
            tracing::info!("  Fallback file: disabled");
        }

        tracing::info!("  Cache-Control: {}", self.cache_control_header());
        if let Some(ref favicon) = self.favicon {
            tracing::info!("  Favicon: {}", favicon);
        }
        tracing::info!("  Status endpoint: {}", on_off(self.status_enabled));
        tracing::info!("  Admin API: {}", on_off(self.admin_api_enabled));
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

/// Reads a boolean variable; unset or unparsable values yield `default`.
fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| parse_bool(v.trim()))
        .unwrap_or(default)
}

fn env_number(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
