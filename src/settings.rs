//! Optional user settings read from `settings.json` in the config directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Difficulty, GridSize, WallPolicy};

const APP_DIR_NAME: &str = "power-snake";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent preferences; every field is optional so partial files work.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub difficulty: Option<Difficulty>,
    pub wall_policy: Option<WallPolicy>,
    pub grid: Option<GridSize>,
    pub sound: Option<bool>,
}

impl Settings {
    /// Loads settings from the default location, falling back to defaults.
    #[must_use]
    pub fn load_or_default() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        match Self::load_from_path(&path) {
            Ok(settings) => settings,
            Err(error) => {
                log::warn!("using default settings: {error}");
                Self::default()
            }
        }
    }

    /// Reads `path`; a missing file yields default settings.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the platform-correct settings file path, if a config dir exists.
#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(SETTINGS_FILE_NAME);
    Some(base)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{Settings, SettingsError};
    use crate::config::{Difficulty, GridSize, WallPolicy};

    #[test]
    fn partial_settings_parse() {
        let path = unique_test_path("partial");
        write(&path, r#"{ "difficulty": "hard", "grid": { "width": 30, "height": 20 } }"#);

        let settings = Settings::load_from_path(&path).expect("settings should parse");

        assert_eq!(settings.difficulty, Some(Difficulty::Hard));
        assert_eq!(
            settings.grid,
            Some(GridSize {
                width: 30,
                height: 20
            })
        );
        assert_eq!(settings.wall_policy, None);
        cleanup_test_path(&path);
    }

    #[test]
    fn wall_policy_and_sound_parse() {
        let path = unique_test_path("walls");
        write(&path, r#"{ "wall_policy": "clamp", "sound": false }"#);

        let settings = Settings::load_from_path(&path).expect("settings should parse");

        assert_eq!(settings.wall_policy, Some(WallPolicy::Clamp));
        assert_eq!(settings.sound, Some(false));
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = unique_test_path("missing");
        assert_eq!(
            Settings::load_from_path(&path).expect("missing file is fine"),
            Settings::default()
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = unique_test_path("malformed");
        write(&path, "{ difficulty: ");

        assert!(matches!(
            Settings::load_from_path(&path),
            Err(SettingsError::Parse { .. })
        ));
        cleanup_test_path(&path);
    }

    fn write(path: &PathBuf, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("power-snake-settings-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
