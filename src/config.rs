//! Configuration file and resolved settings for fizzy-cli
//!
//! The config file is a small JSON document holding persisted defaults and
//! credentials. [`Settings`] is built once per invocation by merging, in
//! order of priority, command-line flags, environment variables, the config
//! file and built-in defaults.

use crate::auth::AuthScheme;
use crate::cmd_args::GlobalArgs;
use crate::error::{CliError, Result};
use crate::output::OutputMode;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://app.fizzy.do";

/// Environment variable name for overriding the config file path
pub const CONFIG_PATH_ENV_VAR: &str = "FIZZY_CONFIG";
pub const BASE_URL_ENV_VAR: &str = "FIZZY_BASE_URL";
pub const TOKEN_ENV_VAR: &str = "FIZZY_TOKEN";
pub const ACCOUNT_ENV_VAR: &str = "FIZZY_ACCOUNT";

/// Fallback when the platform has no user config directory
pub const FALLBACK_CONFIG_PATH: &str = "~/.config/fizzy/config.json";

/// Persisted defaults and credentials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub session_token: String,
    #[serde(default)]
    pub account: String,
}

/// Platform config directory + `fizzy/config.json`
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("fizzy").join("config.json"),
        None => expand_path(FALLBACK_CONFIG_PATH),
    }
}

/// Get the config file path: the `--config` flag (or `FIZZY_CONFIG`) first,
/// then the platform default. A leading `~` is expanded.
pub fn get_config_path(explicit: Option<&str>) -> PathBuf {
    match explicit.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => expand_path(path),
        None => default_config_path(),
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

impl Config {
    /// Read the config file; a missing file yields an empty config
    pub fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}", path.display());
                return Ok(Config::default());
            }
            Err(err) => return Err(config_error(path, err)),
        };
        serde_json::from_slice(&data).map_err(|err| {
            config_error(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, err),
            )
        })
    }

    /// Write the config atomically (temp file + rename) with owner-only permissions
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        create_private_dir(&dir).map_err(|err| config_error(&dir, err))?;

        let mut data = serde_json::to_vec_pretty(self)?;
        data.push(b'\n');

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|err| config_error(path, err))?;
        tmp.write_all(&data).map_err(|err| config_error(path, err))?;
        restrict_permissions(tmp.path()).map_err(|err| config_error(path, err))?;
        tmp.persist(path)
            .map_err(|err| config_error(path, err.error))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

fn config_error(path: &Path, source: std::io::Error) -> CliError {
    CliError::Config {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// First value that is not blank, trimmed
pub fn first_non_empty<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(String::from)
}

/// Account slugs may be given with or without surrounding slashes
pub fn normalize_account(value: &str) -> String {
    value.trim().trim_matches('/').to_string()
}

/// Immutable per-invocation settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Config file as read from disk, used as the base for updates
    pub config: Config,
    pub config_path: PathBuf,
    pub base_url: String,
    pub token: Option<String>,
    pub session_token: Option<String>,
    pub account: Option<String>,
    pub output: OutputMode,
}

impl Settings {
    /// Merge flags (clap has already folded in environment variables),
    /// the config file and defaults
    pub fn resolve(globals: &GlobalArgs, config: Config, config_path: PathBuf) -> Self {
        let base_url = first_non_empty([
            globals.base_url.as_deref(),
            Some(config.base_url.as_str()),
        ])
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token = first_non_empty([globals.token.as_deref(), Some(config.token.as_str())]);
        let session_token = first_non_empty([Some(config.session_token.as_str())]);
        let account = first_non_empty([globals.account.as_deref(), Some(config.account.as_str())])
            .map(|a| normalize_account(&a))
            .filter(|a| !a.is_empty());

        let output = OutputMode {
            json: globals.json,
            plain: globals.plain,
            color: !globals.no_color && std::env::var_os("NO_COLOR").is_none(),
        };

        Self {
            config,
            config_path,
            base_url,
            token,
            session_token,
            account,
            output,
        }
    }

    pub fn auth(&self) -> AuthScheme {
        AuthScheme::resolve(self.token.as_deref(), self.session_token.as_deref())
    }

    pub fn require_account(&self) -> Result<&str> {
        self.account.as_deref().ok_or_else(|| {
            CliError::usage(format!(
                "missing account slug; set --account or {ACCOUNT_ENV_VAR}, or run 'fizzy-cli account set'"
            ))
        })
    }

    /// `suffix` under the selected account, e.g. `/897362094/boards`
    pub fn account_path(&self, suffix: &str) -> Result<String> {
        Ok(format!("/{}{}", self.require_account()?, suffix))
    }

    /// Base URL shown by `config show`: the persisted one if set
    pub fn display_base_url(&self) -> String {
        first_non_empty([Some(self.config.base_url.as_str()), Some(self.base_url.as_str())])
            .unwrap_or_default()
    }
}
