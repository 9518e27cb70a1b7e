//! Application configuration for cims.
//!
//! User config lives at `~/.cims/cims.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CimsError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "cims.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".cims";

/// Upstream AJAX endpoint serving catalog pages.
pub const DEFAULT_CATALOG_URL: &str = "https://www.feec.cat/wp-admin/admin-ajax.php";

/// Public page whose inline script carries the nonce.
pub const DEFAULT_BOOTSTRAP_URL: &str = "https://www.feec.cat/activitats/100-cims/";

/// Output document written at the end of a run.
pub const DEFAULT_OUTPUT_FILE: &str = "muntanyesRepte100CimsFEEC.json";

/// More than 15 simultaneous detail requests noticeably slows the upstream site.
pub const DEFAULT_CONCURRENCY: usize = 15;

// ---------------------------------------------------------------------------
// Config structs (matching cims.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Run defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Upstream site endpoints and HTTP settings.
    #[serde(default)]
    pub site: SiteConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum concurrent detail-page requests.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Output document path.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Pretty-print the output document.
    #[serde(default)]
    pub pretty: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            output_file: default_output_file(),
            pretty: false,
        }
    }
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}
fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.into()
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Page scanned for the anti-forgery nonce.
    #[serde(default = "default_bootstrap_url")]
    pub bootstrap_url: String,

    /// Endpoint receiving the paginated catalog POSTs.
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Per-request transport timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            bootstrap_url: default_bootstrap_url(),
            catalog_url: default_catalog_url(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_bootstrap_url() -> String {
    DEFAULT_BOOTSTRAP_URL.into()
}
fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.into()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("cims/", env!("CARGO_PKG_VERSION")).into()
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime configuration for a single scrape run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Admission cap for detail-page requests.
    pub concurrency: usize,
    /// Where the enriched collection is written.
    pub output_path: PathBuf,
    /// Pretty-print the output document.
    pub pretty: bool,
    /// Endpoints and HTTP settings.
    pub site: SiteConfig,
}

impl From<&AppConfig> for RunConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            concurrency: config.defaults.concurrency,
            output_path: PathBuf::from(&config.defaults.output_file),
            pretty: config.defaults.pretty,
            site: config.site.clone(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.cims/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CimsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.cims/cims.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CimsError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| CimsError::config(format!("failed to parse {}: {e}", path.display())))?;

    validate(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CimsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CimsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CimsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject values no run could use.
pub fn validate(config: &AppConfig) -> Result<()> {
    if config.defaults.concurrency == 0 {
        return Err(CimsError::config("defaults.concurrency must be at least 1"));
    }
    if config.defaults.output_file.trim().is_empty() {
        return Err(CimsError::config("defaults.output_file must not be empty"));
    }
    check_http_url("site.bootstrap_url", &config.site.bootstrap_url)?;
    check_http_url("site.catalog_url", &config.site.catalog_url)?;
    if config.site.request_timeout_secs == 0 {
        return Err(CimsError::config("site.request_timeout_secs must be at least 1"));
    }
    Ok(())
}

fn check_http_url(key: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value)
        .map_err(|e| CimsError::config(format!("{key} is not a valid URL ({value:?}): {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(CimsError::config(format!(
            "{key} must use http or https, got {other:?}"
        ))),
    }
}
