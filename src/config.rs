//! Settings resolution.
//!
//! Admin address: `--kong-addr` > `KONG_ADMIN_ADDR` > config file >
//! `http://localhost:8001`.
//!
//! Headers: `--headers` (or the file's `headers`) as a single `key:value`,
//! then `X_ADMIN_TOKEN` as `x-admin-token`. Both apply; the token wins on
//! a clash.
//!
//! ## Config file
//! `--config <path>`, else `$KONG_META_CONFIG`, else
//! `~/.kong-meta/config.toml` if it exists.
//!
//! ```toml
//! kong_addr = "https://kong-admin.internal:8444"
//! headers   = "Kong-Admin-Token: s3cr3t"
//! sort      = "count"
//! meta      = "all"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::report::{MetaView, SortOrder};
use crate::Cli;

pub const DEFAULT_KONG_ADDR: &str = "http://localhost:8001";
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub const ENV_KONG_ADDR: &str = "KONG_ADMIN_ADDR";
pub const ENV_ADMIN_TOKEN: &str = "X_ADMIN_TOKEN";
pub const ENV_CONFIG: &str = "KONG_META_CONFIG";

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub kong_addr: Option<String>,
    pub headers:   Option<String>,
    pub sort:      Option<SortOrder>,
    pub meta:      Option<MetaView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub kong_addr: String,
    pub headers:   Vec<(String, String)>,
    pub meta:      MetaView,
    pub sort:      SortOrder,
}

/// Resolve settings from flags, the process environment and the config file.
pub fn resolve(cli: &Cli) -> Result<Settings> {
    resolve_with(cli, |key| std::env::var(key).ok(), default_config_path())
}

/// As [`resolve`], with the environment lookup and default config location
/// supplied by the caller.
pub fn resolve_with<F>(cli: &Cli, env: F, default_config: Option<PathBuf>) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    // Empty variables count as unset.
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let file = match cli.config.clone().or_else(|| env(ENV_CONFIG).map(PathBuf::from)) {
        Some(path) => load_file(&path)?,
        None => match default_config {
            Some(path) if path.exists() => load_file(&path)?,
            _ => FileConfig::default(),
        },
    };

    let kong_addr = cli
        .kong_addr
        .clone()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| env(ENV_KONG_ADDR))
        .or(file.kong_addr)
        .unwrap_or_else(|| DEFAULT_KONG_ADDR.to_string());
    let kong_addr = kong_addr.trim().trim_end_matches('/').to_string();

    let mut headers = Vec::new();
    if let Some(raw) = cli.headers.clone().or(file.headers) {
        if !raw.trim().is_empty() {
            match parse_header(&raw) {
                Some((key, value)) => set_header(&mut headers, key, value),
                None => warn!(header = %raw, "ignoring malformed header, expected 'key:value'"),
            }
        }
    }
    if let Some(token) = env(ENV_ADMIN_TOKEN) {
        set_header(&mut headers, ADMIN_TOKEN_HEADER.to_string(), token.trim().to_string());
    }

    let settings = Settings {
        kong_addr,
        headers,
        meta: cli.meta.or(file.meta).unwrap_or_default(),
        sort: cli.sort.or(file.sort).unwrap_or_default(),
    };
    debug!(
        kong_addr = %settings.kong_addr,
        headers = settings.headers.len(),
        meta = ?settings.meta,
        sort = ?settings.sort,
        "resolved settings"
    );
    Ok(settings)
}

/// Split `key:value` on the first colon, trimming both sides.
///
/// Values may contain further colons (`Authorization: Basic a:b`). Returns
/// `None` when there is no colon or the key is empty.
pub fn parse_header(raw: &str) -> Option<(String, String)> {
    let (key, value) = raw.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// Insert or replace a header; names compare case-insensitively.
fn set_header(headers: &mut Vec<(String, String)>, key: String, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
        Some(slot) => *slot = (key, value),
        None => headers.push((key, value)),
    }
}

/// `~/.kong-meta/config.toml`, if a home directory can be resolved.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kong-meta").join("config.toml"))
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let parsed: FileConfig = toml::from_str(&raw)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(parsed)
}
