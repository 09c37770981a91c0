//! On-disk bridge settings.
//!
//! The file is always written whole to a sibling `.tmp` and renamed into
//! place. [`ConfigManager::update_section`] edits one table with
//! `toml_edit`, leaving the rest of the file (comments included) as it was.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table};

use super::settings::{ConfigSection, Settings};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot access bridge settings: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid bridge settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize bridge settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Settings file is not valid TOML: {0}")]
    Document(#[from] toml_edit::TomlError),

    #[error("No settings file at {0}")]
    NotFound(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

const HEADER: &str = "# File acquisition bridge settings\n\
# Rewritten when keys are missing; edits to a single section keep comments.\n";

/// Owns the settings file and the settings loaded from it.
pub struct ConfigManager {
    path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Manager for `path` holding default settings until loaded.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// In-memory only until [`save`](Self::save) or
    /// [`update_section`](Self::update_section).
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Directory for rolling log files.
    pub fn logs_folder(&self) -> PathBuf {
        PathBuf::from(&self.settings.logging.logs_folder)
    }

    /// Read the file; fails with `NotFound` if it is absent.
    pub fn load(&mut self) -> ConfigResult<()> {
        let content = self
            .read_existing()?
            .ok_or_else(|| ConfigError::NotFound(self.path.clone()))?;
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Read the file, writing defaults first if it is absent.
    ///
    /// A file with unknown tables or missing keys is normalized and
    /// written back.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        let Some(content) = self.read_existing()? else {
            tracing::info!("Writing default bridge settings to {}", self.path.display());
            self.settings = Settings::default();
            return self.save();
        };

        self.settings = toml::from_str(&content)?;
        if self.needs_rewrite(&content.parse()?)? {
            tracing::debug!("Normalizing bridge settings at {}", self.path.display());
            self.save()?;
        }
        Ok(())
    }

    /// Write every section, replacing the file.
    pub fn save(&self) -> ConfigResult<()> {
        let mut output = String::from(HEADER);
        for section in ConfigSection::ALL {
            output.push('\n');
            output.push_str(section.comment());
            output.push('\n');
            output.push_str(&format!("[{}]\n", section.table_name()));
            output.push_str(&self.section_toml(section)?);
        }
        self.write_atomically(&output)?;
        Ok(())
    }

    /// Write only `section` from memory into the file on disk.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let mut doc = match self.read_existing()? {
            Some(content) => content.parse::<DocumentMut>()?,
            None => DocumentMut::new(),
        };
        doc[section.table_name()] = Item::Table(self.section_table(section)?);
        self.write_atomically(&doc.to_string())?;
        Ok(())
    }

    fn read_existing(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn needs_rewrite(&self, doc: &DocumentMut) -> ConfigResult<bool> {
        let known = |key: &str| ConfigSection::ALL.iter().any(|s| s.table_name() == key);
        if let Some((key, _)) = doc.iter().find(|(key, _)| !known(key)) {
            tracing::warn!("Dropping unknown settings table [{}]", key);
            return Ok(true);
        }

        for section in ConfigSection::ALL {
            let Some(on_disk) = doc.get(section.table_name()).and_then(Item::as_table) else {
                return Ok(true);
            };
            let expected = self.section_table(section)?;
            if expected.iter().any(|(key, _)| !on_disk.contains_key(key)) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn section_toml(&self, section: ConfigSection) -> ConfigResult<String> {
        let body = match section {
            ConfigSection::Bridge => toml::to_string_pretty(&self.settings.bridge)?,
            ConfigSection::Dialog => toml::to_string_pretty(&self.settings.dialog)?,
            ConfigSection::Logging => toml::to_string_pretty(&self.settings.logging)?,
        };
        Ok(body)
    }

    fn section_table(&self, section: ConfigSection) -> ConfigResult<Table> {
        let doc: DocumentMut = self.section_toml(section)?.parse()?;
        Ok(doc.as_table().clone())
    }

    fn write_atomically(&self, content: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let staging = self.path.with_extension("toml.tmp");
        let mut file = fs::File::create(&staging)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&staging, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecodeStrategy, DeliveryMode};
    use tempfile::tempdir;

    fn manager_in(dir: &Path) -> ConfigManager {
        ConfigManager::new(dir.join("bridge").join("settings.toml"))
    }

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempdir().unwrap();
        let mut manager = manager_in(dir.path());
        manager.load_or_create().unwrap();

        let written = fs::read_to_string(manager.path()).unwrap();
        for table in ["[bridge]", "[dialog]", "[logging]"] {
            assert!(written.contains(table), "missing {table}");
        }

        let mut reread = ConfigManager::new(manager.path());
        reread.load().unwrap();
        assert_eq!(reread.settings().bridge.entry_point, "open_file_js");
        assert!(reread.settings().dialog.settle_on_cancel);
    }

    #[test]
    fn plain_load_requires_a_file() {
        let dir = tempdir().unwrap();
        let mut manager = manager_in(dir.path());
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn partial_file_keeps_values_and_gains_missing_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[bridge]\ndelivery = \"callback\"\ndecode = \"utf8_strict\"\n").unwrap();

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();
        assert_eq!(manager.settings().bridge.delivery, DeliveryMode::Callback);
        assert_eq!(manager.settings().bridge.decode, DecodeStrategy::Utf8Strict);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("delivery = \"callback\""));
        assert!(written.contains("response_export"));
        assert!(written.contains("[dialog]"));
    }

    #[test]
    fn complete_file_is_left_untouched() {
        let dir = tempdir().unwrap();
        let mut manager = manager_in(dir.path());
        manager.load_or_create().unwrap();

        let mut edited = fs::read_to_string(manager.path()).unwrap();
        edited.push_str("# my note\n");
        fs::write(manager.path(), &edited).unwrap();

        manager.load_or_create().unwrap();
        assert_eq!(fs::read_to_string(manager.path()).unwrap(), edited);
    }

    #[test]
    fn unknown_tables_are_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[window]\nwidth = 800\n").unwrap();

        let mut manager = ConfigManager::new(&path);
        manager.load_or_create().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("[window]"));
        assert!(written.contains("[bridge]"));
    }

    #[test]
    fn section_update_leaves_other_tables_alone() {
        let dir = tempdir().unwrap();
        let mut manager = manager_in(dir.path());
        manager.load_or_create().unwrap();

        manager.settings_mut().dialog.focus_grace_ms = 750;
        manager.settings_mut().bridge.delivery = DeliveryMode::Callback;
        manager.update_section(ConfigSection::Dialog).unwrap();

        let written = fs::read_to_string(manager.path()).unwrap();
        assert!(written.contains("focus_grace_ms = 750"));
        assert!(written.contains("delivery = \"return_value\""));
        assert!(written.starts_with("# File acquisition bridge settings"));
        assert!(!manager.path().with_extension("toml.tmp").exists());
    }
}
