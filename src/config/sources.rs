//! Config-file source discovery.
//!
//! Source order: explicit path > local `./donutbot.toml` > global file under
//! the config root. Finding nothing is an error; there is no built-in
//! fallback because the API key and host have no sensible default.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ConfigSource {
    /// Config loaded from explicit `--config` path.
    Explicit(PathBuf),
    /// Config loaded from `./donutbot.toml`.
    Local,
    /// Config loaded from `<config root>/donutbot/donutbot.toml`.
    Global(PathBuf),
}

/// Read config text from the highest-precedence available source.
pub(super) fn read_config_text_with_sources<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, ConfigSource::Explicit(path)));
    }

    let mut searched = vec![format!("./{CONFIG_FILE_NAME}")];
    if let Ok(text) = read_file(Path::new(CONFIG_FILE_NAME)) {
        return Ok((text, ConfigSource::Local));
    }

    if let Some(dir) = config_root() {
        let global = global_config_path_in(&dir);
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
        searched.push(global.display().to_string());
    }

    Err(ConfigError::Missing(searched))
}

/// Global config path under a given config root.
pub(super) fn global_config_path_in(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}
