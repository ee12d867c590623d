//! Static root discovery and runtime defaults.

use anyhow::{Result, bail};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Where bundled maps are served from, relative to the static root.
pub const DEFAULT_ASSET_PREFIX: &str = "plugins/visualization-maps/maps";
pub const DEFAULT_LOCALE: &str = "en";

const ENV_STATIC_ROOT: &str = "MAPVIZ_STATIC_ROOT";
const ENV_LOCALE: &str = "MAPVIZ_LOCALE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory that asset paths are relative to.
    pub static_root: PathBuf,
    /// Directory scanned for bundled maps.
    pub bundled_maps_dir: PathBuf,
    /// Prefix bundled maps are registered under.
    pub asset_prefix: String,
    /// Locale the published schema is built for.
    pub locale: String,
}

impl Config {
    /// Defaults for a known static root.
    pub fn for_root(static_root: impl Into<PathBuf>) -> Self {
        let static_root = static_root.into();
        Self {
            bundled_maps_dir: static_root.join(DEFAULT_ASSET_PREFIX),
            static_root,
            asset_prefix: DEFAULT_ASSET_PREFIX.to_string(),
            locale: env_non_empty(ENV_LOCALE).unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        }
    }

    /// Locate the static root and apply defaults.
    pub fn discover() -> Result<Self> {
        Ok(Self::for_root(find_static_root()?))
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

fn is_static_root(candidate: &Path) -> bool {
    candidate.join(DEFAULT_ASSET_PREFIX).is_dir()
}

fn static_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.is_dir() {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_static_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Find the static asset root.
///
/// Checks `MAPVIZ_STATIC_ROOT`, then walks up from the current directory
/// looking for the bundled maps directory, then the build-time hint.
pub fn find_static_root() -> Result<PathBuf> {
    if let Some(env_root) = env_non_empty(ENV_STATIC_ROOT) {
        if let Some(root) = static_root_from_hint(&env_root) {
            return Ok(root);
        }
        log::warn!("{ENV_STATIC_ROOT}={env_root} is not a directory; searching instead");
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    if let Some(hint) = option_env!("MAPVIZ_STATIC_ROOT_HINT") {
        if let Some(root) = static_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate the static asset root. Set {ENV_STATIC_ROOT} or pass --root."
    );
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upward_search_finds_root_with_bundled_maps() {
        let temp = tempfile::TempDir::new().unwrap();
        let bundled = temp.path().join(DEFAULT_ASSET_PREFIX).join("europe");
        fs::create_dir_all(&bundled).unwrap();

        let found = search_upwards(&bundled).unwrap();
        assert_eq!(found, fs::canonicalize(temp.path()).unwrap());
    }

    #[test]
    fn for_root_derives_bundled_dir() {
        let config = Config::for_root("/srv/static").with_locale("fr-FR");
        assert_eq!(
            config.bundled_maps_dir,
            PathBuf::from("/srv/static/plugins/visualization-maps/maps")
        );
        assert_eq!(config.asset_prefix, DEFAULT_ASSET_PREFIX);
        assert_eq!(config.locale, "fr-FR");
    }
}
