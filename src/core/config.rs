//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.regnav/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! The resolved value is built once at startup and never mutated.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::state::TimeView;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RegnavConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    /// Per-remote settings, keyed by host (`[remotes."buf.build"]`).
    #[serde(default)]
    pub remotes: BTreeMap<String, RemoteConfig>,
    /// Key binding overrides, command name → key list.
    #[serde(default)]
    pub keys: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub remote: Option<String>,
    pub fullscreen: Option<bool>,
    pub time_view: Option<TimeView>,
    pub fetch_timeout_secs: Option<u64>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub username: Option<String>,
    pub token: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_REMOTE: &str = "buf.build";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ============================================================================
// Credentials
// ============================================================================

/// Authentication for one remote. With a username the transport sends
/// HTTP Basic, otherwise the token is sent as a bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Where credentials for a remote come from. Consulted once at startup.
pub trait CredentialSource {
    fn resolve(&self, remote: &str) -> Result<Option<Credentials>, ConfigError>;
}

/// Credentials from CLI flags, then environment, then `[remotes."<host>"]`.
/// A username and token always come from the same layer.
pub struct LayeredCredentials<'a> {
    pub cli_username: Option<&'a str>,
    pub cli_token: Option<&'a str>,
    pub env: &'a EnvOverrides,
    pub config: &'a RegnavConfig,
}

impl CredentialSource for LayeredCredentials<'_> {
    fn resolve(&self, remote: &str) -> Result<Option<Credentials>, ConfigError> {
        let from_config = self.config.remotes.get(remote);
        let layers = [
            ("flags", self.cli_username, self.cli_token),
            (
                "environment",
                self.env.username.as_deref(),
                self.env.token.as_deref(),
            ),
            (
                "config file",
                from_config.and_then(|r| r.username.as_deref()),
                from_config.and_then(|r| r.token.as_deref()),
            ),
        ];

        for (layer, username, token) in layers {
            match (username, token) {
                (None, None) => continue,
                (Some(_), None) => {
                    return Err(ConfigError::Credentials(format!(
                        "username set in {layer} without a token for remote {remote}"
                    )));
                }
                (username, Some(token)) => {
                    debug!("Using credentials for {remote} from {layer}");
                    return Ok(Some(Credentials {
                        username: username.map(str::to_string),
                        token: token.to_string(),
                    }));
                }
            }
        }
        Ok(None)
    }
}

// ============================================================================
// Overrides from outside the config file
// ============================================================================

/// Environment variables that override the config file.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub remote: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
}

impl EnvOverrides {
    /// Reads `REGNAV_REMOTE`, `REGNAV_USERNAME`, and `REGNAV_TOKEN`
    /// (falling back to `BUF_TOKEN`).
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            remote: var("REGNAV_REMOTE"),
            username: var("REGNAV_USERNAME"),
            token: var("REGNAV_TOKEN").or_else(|| var("BUF_TOKEN")),
        }
    }
}

/// Values supplied on the command line. `None` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub remote: Option<String>,
    /// Remote named inside the `--reference` locator, if any.
    pub reference_remote: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub fullscreen: bool,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub remote: String,
    pub base_url: Option<String>,
    pub credentials: Option<Credentials>,
    pub fullscreen: bool,
    pub time_view: TimeView,
    pub fetch_timeout: Duration,
    pub page_size: u32,
    pub keys: BTreeMap<String, Vec<String>>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            base_url: None,
            credentials: None,
            fullscreen: false,
            time_view: TimeView::default(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            keys: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    ConflictingRemote { flag: String, reference: String },
    EmptyRemote,
    Credentials(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::ConflictingRemote { flag, reference } => write!(
                f,
                "cannot provide conflicting `--remote` flag ({flag}) and reference remote ({reference})"
            ),
            ConfigError::EmptyRemote => write!(f, "remote cannot be empty"),
            ConfigError::Credentials(msg) => write!(f, "credentials error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.regnav/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".regnav").join("config.toml"))
}

/// Load config from `~/.regnav/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RegnavConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RegnavConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RegnavConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(RegnavConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: RegnavConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# regnav configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# remote = "buf.build"
# fullscreen = false
# time_view = "absolute"             # "absolute" or "relative"
# fetch_timeout_secs = 10
# page_size = 100

# [remotes."buf.build"]
# username = "me"                    # Or set REGNAV_USERNAME
# token = "..."                      # Or set REGNAV_TOKEN / BUF_TOKEN
# base_url = "https://buf.build"

# [keys]
# quit = ["q", "esc", "ctrl+c"]
# back = ["left", "h"]
# advance = ["right", "l", "enter"]
# navigate = ["s"]
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(
    config: &RegnavConfig,
    env: &EnvOverrides,
    cli: &CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    if let (Some(flag), Some(reference)) = (&cli.remote, &cli.reference_remote)
        && flag != reference
    {
        return Err(ConfigError::ConflictingRemote {
            flag: flag.clone(),
            reference: reference.clone(),
        });
    }

    // Remote: CLI flag → reference → env → config → default
    let remote = cli
        .remote
        .clone()
        .or_else(|| cli.reference_remote.clone())
        .or_else(|| env.remote.clone())
        .or_else(|| config.general.remote.clone())
        .unwrap_or_else(|| DEFAULT_REMOTE.to_string());
    if remote.is_empty() {
        return Err(ConfigError::EmptyRemote);
    }

    let credentials = LayeredCredentials {
        cli_username: cli.username.as_deref(),
        cli_token: cli.token.as_deref(),
        env,
        config,
    }
    .resolve(&remote)?;

    // Base URL: CLI → config for this remote
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| config.remotes.get(&remote).and_then(|r| r.base_url.clone()));

    let resolved = ResolvedConfig {
        remote,
        base_url,
        credentials,
        fullscreen: cli.fullscreen || config.general.fullscreen.unwrap_or(false),
        time_view: config.general.time_view.unwrap_or_default(),
        fetch_timeout: Duration::from_secs(
            config
                .general
                .fetch_timeout_secs
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
        ),
        page_size: config.general.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        keys: config.keys.clone(),
    };
    debug!("Resolved config: {:?}", resolved);
    Ok(resolved)
}
