//! Persisted user settings.
//!
//! Settings are serialized to JSON, wrapped in a passphrase envelope (see
//! [`cipher`]) and stored under [`STORAGE_KEY`] in a flat JSON key/value
//! file. The passphrase is compiled in, so the envelope only keeps the API
//! key out of casual view; it does not protect it from anyone with the
//! binary.

pub mod cipher;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Key under which settings are stored.
pub const STORAGE_KEY: &str = "studio_settings";

const PASSPHRASE: &str = "studio_secret_key_2024";

/// Default editor font family.
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

/// Default editor font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// User settings.
///
/// Fields missing from a stored blob take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Assistant API key
    #[serde(rename = "cerebrasApiKey")]
    pub api_key: String,

    /// Whether the key passed validation
    #[serde(rename = "cerebrasApiKeyValidated")]
    pub api_key_validated: bool,

    /// Editor font family
    pub font_family: String,

    /// Editor font size
    pub font_size: u32,
}

impl Settings {
    /// Check whether a validated API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key_validated && !self.api_key.trim().is_empty()
    }

    /// Store a new API key.
    ///
    /// The key stays unvalidated until [`Settings::mark_api_key_validated`]
    /// is called after a successful test request.
    pub fn set_api_key(&mut self, key: &str) -> Result<()> {
        validate_api_key(key)?;
        self.api_key = key.trim().to_string();
        self.api_key_validated = false;
        Ok(())
    }

    /// Record that the stored key was accepted by the API.
    pub fn mark_api_key_validated(&mut self) {
        self.api_key_validated = !self.api_key.trim().is_empty();
    }

    /// Remove the API key.
    pub fn clear_api_key(&mut self) {
        self.api_key.clear();
        self.api_key_validated = false;
    }

    /// API key with all but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.is_empty() {
            return String::new();
        }
        let visible = chars.len().min(4);
        let hidden = chars.len() - visible;
        let tail: String = chars[hidden..].iter().collect();
        format!("{}{}", "*".repeat(hidden), tail)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_key_validated: false,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Reject a blank API key before any request is made with it.
pub fn validate_api_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::InvalidApiKey);
    }
    Ok(())
}

/// File-backed key/value store holding the encrypted settings.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by the JSON file at `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when nothing is stored or
    /// the stored value cannot be read.
    pub fn load(&self) -> Settings {
        match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                log::error!("Failed to load settings: {}", e);
                Settings::default()
            }
        }
    }

    /// Load settings, reporting failures.
    ///
    /// Returns `Ok(None)` when no settings have been stored.
    pub fn try_load(&self) -> Result<Option<Settings>> {
        let entries = self.read_entries()?;
        let Some(blob) = entries.get(STORAGE_KEY) else {
            return Ok(None);
        };

        let json = cipher::decrypt(blob, PASSPHRASE)?;
        let settings = serde_json::from_str(&json)?;
        Ok(Some(settings))
    }

    /// Encrypt and store `settings`, keeping other keys in the file.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Replacing unreadable settings file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
        };

        let json = serde_json::to_string(settings)?;
        entries.insert(STORAGE_KEY.to_string(), cipher::encrypt(&json, PASSPHRASE)?);
        self.write_entries(&entries)?;

        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Remove stored settings.
    pub fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(STORAGE_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| Error::Settings(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));
        (dir, store)
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.font_family, "Inter");
        assert_eq!(settings.font_size, 16);
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let (_dir, store) = store();
        assert!(store.try_load().unwrap().is_none());
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = store();
        let mut settings = Settings::default();
        settings.set_api_key("  csk-1234567890  ").unwrap();
        assert!(!settings.has_api_key());
        settings.mark_api_key_validated();
        settings.font_size = 18;
        store.save(&settings).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.api_key, "csk-1234567890");
        assert!(loaded.has_api_key());
    }

    #[test]
    fn test_stored_value_is_obfuscated() {
        let (_dir, store) = store();
        let mut settings = Settings::default();
        settings.set_api_key("csk-visible").unwrap();
        store.save(&settings).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(STORAGE_KEY));
        assert!(!raw.contains("csk-visible"));
    }

    #[test]
    fn test_partial_blob_merges_over_defaults() {
        let (_dir, store) = store();
        let blob = cipher::encrypt(r#"{"fontFamily":"Lora"}"#, PASSPHRASE).unwrap();
        let file = BTreeMap::from([(STORAGE_KEY.to_string(), blob)]);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), serde_json::to_string(&file).unwrap()).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.font_family, "Lora");
        assert_eq!(loaded.font_size, 16);
        assert!(loaded.api_key.is_empty());
    }

    #[test]
    fn test_corrupt_blob_falls_back() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"studio_settings":"U2FsdGVkX1garbage"}"#).unwrap();

        assert!(store.try_load().is_err());
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_save_keeps_other_keys() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"other":"value"}"#).unwrap();

        store.save(&Settings::default()).unwrap();
        let raw: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["other"], "value");
        assert!(raw.contains_key(STORAGE_KEY));
    }

    #[test]
    fn test_clear() {
        let (_dir, store) = store();
        store.save(&Settings::default()).unwrap();
        store.clear().unwrap();
        assert!(store.try_load().unwrap().is_none());
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("csk-abc").is_ok());
        assert!(matches!(validate_api_key(""), Err(Error::InvalidApiKey)));
        assert!(matches!(validate_api_key("   "), Err(Error::InvalidApiKey)));

        let mut settings = Settings::default();
        assert!(settings.set_api_key(" ").is_err());
        settings.mark_api_key_validated();
        assert!(!settings.api_key_validated);

        settings.set_api_key("csk-old").unwrap();
        settings.mark_api_key_validated();
        settings.set_api_key("csk-new").unwrap();
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_masked_api_key() {
        let mut settings = Settings::default();
        assert_eq!(settings.masked_api_key(), "");
        settings.api_key = "csk-123456".to_string();
        assert_eq!(settings.masked_api_key(), "******3456");
        settings.api_key = "abc".to_string();
        assert_eq!(settings.masked_api_key(), "abc");
    }
}
