//! # Settings Store
//!
//! Persists the Nekoweb credential and connection overrides between
//! invocations of the CLI.
//!
//! ## Location
//!
//! The settings file is resolved in this order:
//!
//! 1. the `--settings <path>` flag (or the `NEKOWEB_SETTINGS` variable, which
//!    the flag reads through clap),
//! 2. `<config dir>/nekoweb/settings.json`, where `<config dir>` comes from
//!    [`dirs::config_dir`].
//!
//! ## Format
//!
//! Pretty-printed JSON. Every field is optional; a missing file behaves like
//! an empty one.
//!
//! ```json
//! {
//!   "token": "…",
//!   "username": "alice",
//!   "api_base_url": "https://nekoweb.org/api",
//!   "connect_timeout_sec": 10
//! }
//! ```
//!
//! ## Security
//!
//! The token is stored in plain text. On Unix the file is written with mode
//! `0600`.

use nekoweb_api::{Credential, CredentialStore, NekowebConfig, NekowebError, NekowebResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Everything persisted in the settings file.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Raw API key sent in the `Authorization` header.
    pub token: String,
    /// Username derived from site info when the token was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Overrides [`NekowebConfig::api_base_url`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// Overrides [`NekowebConfig::site_url_pattern`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url_pattern: Option<String>,
    /// Overrides [`NekowebConfig::connect_timeout_sec`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_sec: Option<u64>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("token", &self.credential().masked_token())
            .field("username", &self.username)
            .field("api_base_url", &self.api_base_url)
            .field("site_url_pattern", &self.site_url_pattern)
            .field("connect_timeout_sec", &self.connect_timeout_sec)
            .finish()
    }
}

impl Settings {
    /// Connection config with this file's overrides applied on top of the
    /// defaults.
    pub fn config(&self) -> NekowebConfig {
        let mut config = NekowebConfig::default();
        if let Some(ref base) = self.api_base_url {
            config.api_base_url = base.clone();
        }
        if let Some(ref pattern) = self.site_url_pattern {
            config.site_url_pattern = pattern.clone();
        }
        if self.connect_timeout_sec.is_some() {
            config.connect_timeout_sec = self.connect_timeout_sec;
        }
        config
    }

    pub fn credential(&self) -> Credential {
        Credential {
            token: self.token.clone(),
            username: self.username.clone(),
        }
    }
}

/// Default location of the settings file, if the platform has a config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nekoweb").join("settings.json"))
}

/// Pick the explicit path if given, otherwise the platform default.
///
/// # Errors
///
/// Returns an `IoError` when no path was given and the platform exposes no
/// configuration directory.
pub fn resolve_settings_path(explicit: Option<PathBuf>) -> NekowebResult<PathBuf> {
    explicit.or_else(default_settings_path).ok_or_else(|| {
        NekowebError::io("Could not determine a configuration directory; pass --settings")
    })
}

/// JSON-file backed [`CredentialStore`].
///
/// Saving a credential rewrites only `token` and `username`; connection
/// overrides already in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store over `path`. Nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole settings file.
    ///
    /// # Returns
    ///
    /// `Settings::default()` when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// - `IoError` if the file exists but cannot be read
    /// - `SerializationError` if it is not valid settings JSON
    pub fn load_settings(&self) -> NekowebResult<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            NekowebError::io(format!("Cannot read {}: {}", self.path.display(), e))
        })?;
        if raw.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_json::from_str(&raw).map_err(|e| {
            NekowebError::serialization(format!(
                "Invalid settings file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Writes the whole settings file, creating parent directories.
    ///
    /// # Errors
    ///
    /// `IoError` if the directory or file cannot be written.
    pub fn save_settings(&self, settings: &Settings) -> NekowebResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    NekowebError::io(format!("Cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(settings)?;
        let write_err =
            |e: std::io::Error| NekowebError::io(format!("Cannot write {}: {}", self.path.display(), e));

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            // Mode only applies when the file is created.
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Tighten a file that predates this store.
            if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
                log::warn!("could not restrict {} to 0600: {}", self.path.display(), e);
            }
        }

        file.write_all(json.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        log::debug!("settings written to {}", self.path.display());
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> NekowebResult<Credential> {
        Ok(self.load_settings()?.credential())
    }

    fn save(&self, credential: &Credential) -> NekowebResult<()> {
        let mut settings = self.load_settings()?;
        settings.token = credential.token.clone();
        settings.username = credential.username.clone();
        self.save_settings(&settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_credential() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), Credential::default());
    }

    #[test]
    fn empty_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(FileCredentialStore::new(path).load_settings().unwrap(), Settings::default());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("settings.json");
        let store = FileCredentialStore::new(&path);
        store.save(&Credential::new("tok").with_username("alice")).unwrap();
        assert!(path.exists());
        assert_eq!(store.load().unwrap(), Credential::new("tok").with_username("alice"));
    }

    #[test]
    fn save_preserves_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"api_base_url":"http://localhost:1/api","connect_timeout_sec":5}"#).unwrap();

        let store = FileCredentialStore::new(&path);
        store.save(&Credential::new("tok")).unwrap();

        let settings = store.load_settings().unwrap();
        assert_eq!(settings.token, "tok");
        assert_eq!(settings.api_base_url.as_deref(), Some("http://localhost:1/api"));
        assert_eq!(settings.config().connect_timeout_sec, Some(5));
    }

    #[test]
    fn invalid_json_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        let err = FileCredentialStore::new(path).load().unwrap_err();
        assert_eq!(err.code, nekoweb_api::NekowebErrorCode::SerializationError);
    }

    #[test]
    fn config_defaults_without_overrides() {
        assert_eq!(Settings::default().config(), NekowebConfig::default());
    }

    #[test]
    fn explicit_path_wins() {
        let p = resolve_settings_path(Some(PathBuf::from("/tmp/x.json"))).unwrap();
        assert_eq!(p, PathBuf::from("/tmp/x.json"));
    }

    #[cfg(unix)]
    #[test]
    fn settings_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        FileCredentialStore::new(&path).save(&Credential::new("tok")).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn existing_world_readable_file_is_tightened() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileCredentialStore::new(&path);
        store.save(&Credential::new("tok")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().token, "tok");
    }

    #[test]
    fn shorter_save_truncates_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = FileCredentialStore::new(&path);
        store.save(&Credential::new("a-rather-long-token").with_username("someone")).unwrap();
        store.save(&Credential::new("t")).unwrap();
        assert_eq!(store.load().unwrap(), Credential::new("t"));
    }
}
