//! Settings file on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, info, warn};

use super::settings::{Reconfigure, Settings};
use crate::core::ConfigError;

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "./Settings.json";

/// JSON settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by `path`. Nothing is read until asked.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Read the file, writing defaults back if it is missing or unreadable.
    pub fn load_or_create(&self) -> Result<Settings, ConfigError> {
        match self.load() {
            Ok(settings) => {
                debug!("loaded settings from {}", self.path.display());
                Ok(settings)
            }
            Err(e) => {
                if !matches!(&e, ConfigError::Io(err) if err.kind() == io::ErrorKind::NotFound) {
                    warn!("{} is unreadable ({e}), replacing with defaults", self.path.display());
                }
                let settings = Settings::default();
                self.save(&settings)?;
                info!("wrote default settings to {}", self.path.display());
                Ok(settings)
            }
        }
    }

    /// Write settings as pretty JSON.
    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Last modification time, if the file exists.
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

/// Turns external edits of the settings file into [`Reconfigure`] changes.
///
/// Polls the file's modification time; call [`SettingsWatcher::poll`] at
/// whatever rate suits the host.
#[derive(Debug)]
pub struct SettingsWatcher {
    store: SettingsStore,
    last_modified: Option<SystemTime>,
    current: Settings,
}

impl SettingsWatcher {
    /// Watch `store`, treating `current` as what is already applied.
    pub fn new(store: SettingsStore, current: Settings) -> Self {
        let last_modified = store.modified();
        Self {
            store,
            last_modified,
            current,
        }
    }

    /// The settings as last seen on disk.
    pub fn current(&self) -> &Settings {
        &self.current
    }

    /// Check the file and return what changed since the last poll.
    ///
    /// An unparsable file is reported once per modification and otherwise
    /// ignored; the last good settings stay current.
    pub fn poll(&mut self) -> Result<Vec<Reconfigure>, ConfigError> {
        let modified = self.store.modified();
        if modified == self.last_modified {
            return Ok(Vec::new());
        }
        self.last_modified = modified;

        let settings = self.store.load()?;
        let changes = settings.changes_from(&self.current);
        if !changes.is_empty() {
            info!("settings file changed: {}", join(&changes));
        }
        self.current = settings;
        Ok(changes)
    }
}

fn join(changes: &[Reconfigure]) -> String {
    changes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn temp_path(tag: &str) -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "vmc-mop-bridge-{tag}-{}-{n}.json",
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let path = temp_path("missing");
        let store = SettingsStore::new(&path);

        let settings = store.load_or_create().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(store.load().unwrap(), Settings::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_invalid_file_replaced() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::new(&path);

        assert!(matches!(store.load(), Err(ConfigError::Json(_))));
        assert_eq!(store.load_or_create().unwrap(), Settings::default());
        assert_eq!(store.load().unwrap(), Settings::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let store = SettingsStore::new(&path);
        let settings = Settings {
            receive_port: 1000,
            send_host: "example.local".into(),
            send_port: 2000,
        };
        store.save(&settings).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"SendIP\": \"example.local\""));
        assert_eq!(store.load_or_create().unwrap(), settings);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_watcher_reports_external_edit() {
        let path = temp_path("watch");
        let store = SettingsStore::new(&path);
        let initial = store.load_or_create().unwrap();
        let mut watcher = SettingsWatcher::new(store.clone(), initial.clone());
        assert!(watcher.poll().unwrap().is_empty());

        let mut edited = initial;
        edited.send_port = 41000;
        // Some filesystems only keep whole-second mtimes.
        std::thread::sleep(Duration::from_millis(1100));
        store.save(&edited).unwrap();

        assert_eq!(watcher.poll().unwrap(), vec![Reconfigure::SendPort(41000)]);
        assert_eq!(watcher.current(), &edited);
        assert!(watcher.poll().unwrap().is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_watcher_reports_bad_json() {
        let path = temp_path("watch-bad");
        let store = SettingsStore::new(&path);
        let initial = store.load_or_create().unwrap();
        let mut watcher = SettingsWatcher::new(store, initial.clone());

        std::thread::sleep(Duration::from_millis(1100));
        fs::write(&path, "][").unwrap();
        assert!(watcher.poll().is_err());
        assert!(watcher.poll().unwrap().is_empty());
        assert_eq!(watcher.current(), &initial);

        let _ = fs::remove_file(path);
    }
}
