use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use crate::{
    foundation::error::{GeostoryError, GeostoryResult},
    settings::speed::{DEFAULT_SPEED_LEVEL, speed_level},
};

/// Storage key of the camera speed level.
pub const KEY_CAMERA_SPEED_LEVEL: &str = "cameraSpeedLevel";
/// Storage key of the camera follow toggle.
pub const KEY_CAMERA_FOLLOW: &str = "cameraFollowEnabled";

/// String key-value storage for user preferences.
pub trait PreferenceStore {
    /// Stored value of `key`, if any.
    fn get(&self, key: &str) -> GeostoryResult<Option<String>>;
    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: &str) -> GeostoryResult<()>;
}

/// In-process store. Optionally unavailable, to model storage that refuses access.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    /// Empty, available store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every access fails.
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            unavailable: true,
        }
    }

    /// Builder: seed `key` with `value`.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> GeostoryResult<Option<String>> {
        if self.unavailable {
            return Err(GeostoryError::storage("preference storage unavailable"));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> GeostoryResult<()> {
        if self.unavailable {
            return Err(GeostoryError::storage("preference storage unavailable"));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat JSON object of strings. Every `set` rewrites the file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> GeostoryResult<BTreeMap<String, String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(GeostoryError::storage(format!(
                    "read '{}': {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&text).map_err(|e| {
            GeostoryError::storage(format!("parse '{}': {e}", self.path.display()))
        })
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> GeostoryResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> GeostoryResult<()> {
        let mut all = match self.read_all() {
            Ok(all) => all,
            Err(e) => {
                tracing::warn!(error = %e, key, "preferences file unreadable, starting it over");
                BTreeMap::new()
            }
        };
        all.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&all)
            .map_err(|e| GeostoryError::serde(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                GeostoryError::storage(format!("create '{}': {e}", parent.display()))
            })?;
        }
        std::fs::write(&self.path, text)
            .map_err(|e| GeostoryError::storage(format!("write '{}': {e}", self.path.display())))
    }
}

/// Persisted user choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Index into [`crate::SPEED_LEVELS`].
    pub camera_speed_level: usize,
    /// Camera follows each move.
    pub camera_follow: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            camera_speed_level: DEFAULT_SPEED_LEVEL,
            camera_follow: true,
        }
    }
}

impl Preferences {
    /// Read preferences, falling back to defaults for anything missing or invalid.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let mut prefs = Self::default();

        match store.get(KEY_CAMERA_SPEED_LEVEL) {
            Ok(Some(raw)) => match raw.trim().parse::<usize>() {
                Ok(level) if speed_level(level).is_some() => prefs.camera_speed_level = level,
                _ => tracing::warn!(value = %raw, "ignoring invalid stored camera speed level"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "cannot read camera speed level"),
        }

        match store.get(KEY_CAMERA_FOLLOW) {
            Ok(Some(raw)) => prefs.camera_follow = raw == "true",
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "cannot read camera follow setting"),
        }

        prefs
    }

    /// Persist the camera speed level. Failures are logged.
    pub fn save_speed_level(store: &mut dyn PreferenceStore, level: usize) {
        if let Err(e) = store.set(KEY_CAMERA_SPEED_LEVEL, &level.to_string()) {
            tracing::warn!(error = %e, "cannot save camera speed level");
        }
    }

    /// Persist the camera follow toggle. Failures are logged.
    pub fn save_camera_follow(store: &mut dyn PreferenceStore, enabled: bool) {
        if let Err(e) = store.set(KEY_CAMERA_FOLLOW, if enabled { "true" } else { "false" }) {
            tracing::warn!(error = %e, "cannot save camera follow setting");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/prefs.rs"]
mod tests;
