//! Persistent CLI configuration file.

use std::path::{Path, PathBuf};

use billfile_core::SheetConfig;

const CONFIG_FILE_NAME: &str = "config.json";

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| panic!("Failed to resolve CLI config directory"))
        .join("billfile")
        .join(CONFIG_FILE_NAME)
}

/// Load the sheet config, `None` when no file exists yet.
pub fn load_from_path(path: &Path) -> Result<Option<SheetConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
    let config = serde_json::from_str::<SheetConfig>(&raw)
        .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
    let config = config
        .validated()
        .map_err(|error| format!("Invalid config at {}: {}", path.display(), error))?;
    Ok(Some(config))
}

pub fn save_to_path(config: &SheetConfig, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|error| {
            format!(
                "Failed to create config directory {}: {}",
                parent.display(),
                error
            )
        })?;
    }

    let serialized = serde_json::to_string_pretty(config)
        .map_err(|error| format!("Failed to serialize config: {error}"))?;
    std::fs::write(path, serialized)
        .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
}
