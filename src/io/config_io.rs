use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

pub const CONFIG_FILE: &str = "config.toml";
pub const STORE_DIR: &str = "store";

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Pick the data directory. First match wins: explicit flag, then
/// `$SMARTDO_HOME`, then `$XDG_DATA_HOME/smartdo`, then
/// `~/.local/share/smartdo`.
pub fn resolve_data_dir(flag: Option<&Path>) -> PathBuf {
    data_dir_from(
        flag,
        std::env::var_os("SMARTDO_HOME").map(PathBuf::from),
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn data_dir_from(
    flag: Option<&Path>,
    smartdo_home: Option<PathBuf>,
    xdg_data_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    if let Some(dir) = smartdo_home.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }
    if let Some(dir) = xdg_data_home.filter(|d| !d.as_os_str().is_empty()) {
        return dir.join("smartdo");
    }
    home.unwrap_or_else(|| PathBuf::from("/"))
        .join(".local")
        .join("share")
        .join("smartdo")
}

/// Directory the file-backed store keeps its documents in
pub fn store_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_DIR)
}

/// Read config.toml; a missing file means all defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    match fs::read_to_string(&config_path) {
        Ok(text) => Ok(toml::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(ConfigError::ReadError {
            path: config_path,
            source: e,
        }),
    }
}

/// Read config.toml as a toml_edit document for round-trip-safe editing.
/// A missing file yields an empty document.
pub fn read_config_doc(data_dir: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: config_path,
                source: e,
            });
        }
    };
    Ok(text.parse()?)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    fs::create_dir_all(data_dir)?;
    let config_path = data_dir.join(CONFIG_FILE);
    fs::write(&config_path, doc.to_string()).map_err(|e| ConfigError::ReadError {
        path: config_path,
        source: e,
    })?;
    Ok(())
}

/// Look up a dotted key (`log.level`, `ui.colors.background`)
pub fn get_value(doc: &toml_edit::DocumentMut, key: &str) -> Option<String> {
    let mut item = doc.as_item();
    for part in key.split('.') {
        item = item.get(part)?;
    }
    match item {
        toml_edit::Item::Value(toml_edit::Value::String(s)) => Some(s.value().clone()),
        toml_edit::Item::Value(v) => Some(v.to_string().trim().to_string()),
        toml_edit::Item::Table(t) => Some(t.to_string().trim_end().to_string()),
        _ => None,
    }
}

/// Set a dotted key, creating intermediate tables. The value is stored as
/// a boolean or integer when it parses as one, otherwise as a string. The
/// edited document must still load as a valid config.
pub fn set_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    raw: &str,
) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    if !is_known_key(&parts) {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let value = if let Ok(b) = raw.parse::<bool>() {
        toml_edit::value(b)
    } else if let Ok(n) = raw.parse::<i64>() {
        toml_edit::value(n)
    } else {
        toml_edit::value(raw)
    };

    let (last, tables) = parts
        .split_last()
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let mut table = doc.as_table_mut();
    for part in tables {
        if !table.contains_key(part) {
            table.insert(part, toml_edit::Item::Table(toml_edit::Table::new()));
        }
        table = table[*part]
            .as_table_mut()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: format!("'{}' is not a table", part),
            })?;
    }
    table[*last] = value;

    toml::from_str::<Config>(&doc.to_string()).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.message().to_string(),
    })?;
    Ok(())
}

fn is_known_key(parts: &[&str]) -> bool {
    matches!(
        parts,
        ["log", "level"]
            | ["log", "file"]
            | ["store", "lock_timeout_ms"]
            | ["ui", "show_key_hints"]
            | ["ui", "colors", _]
            | ["ui", "tag_colors", _]
    )
}
