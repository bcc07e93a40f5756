//! Configuration service boundary
//!
//! The bootstrap sequence reads the persisted settings snapshot through
//! [`ConfigService`] and pushes the reconciled snapshot back through it.

use super::{GlobalSettings, ShellSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Source of truth for the persisted settings snapshot
#[async_trait]
pub trait ConfigService: Send + Sync {
    /// Read the current settings snapshot
    async fn get_config(&self) -> Result<GlobalSettings>;

    /// Persist a complete settings snapshot
    ///
    /// Either the whole snapshot is stored or nothing is.
    async fn update_config(&self, settings: &GlobalSettings) -> Result<()>;

    /// Restore defaults, keeping nothing from the previous snapshot
    async fn reset_to_default(&self) -> Result<GlobalSettings>;

    /// Human readable location of the backing store
    fn location(&self) -> String;
}

/// On-disk layout of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub settings: GlobalSettings,
    #[serde(default)]
    pub shell: ShellSettings,
}

impl ConfigFile {
    /// Get the default path of the configuration file
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("nav-shell")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".nav-shell")
        };

        Ok(config_dir.join("config.toml"))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// TOML file backed configuration service
pub struct FileConfigService {
    path: PathBuf,
    shell: ShellSettings,
    settings: Mutex<GlobalSettings>,
}

impl FileConfigService {
    /// Open the configuration file, creating it with defaults if it doesn't exist
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let file = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            log::debug!("Loading config from: {:?}", path);
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            ConfigFile::parse(&content).with_context(|| format!("Invalid config file: {:?}", path))?
        } else {
            log::info!("Config file doesn't exist, creating default config at {:?}", path);
            let file = ConfigFile::default();
            write_atomic(&path, &file.to_toml()?).await?;
            file
        };

        Ok(Self {
            path,
            shell: file.shell,
            settings: Mutex::new(file.settings),
        })
    }

    /// Open the configuration file at its default location
    pub async fn open_default() -> Result<Self> {
        Self::open(ConfigFile::default_path()?).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn shell_settings(&self) -> &ShellSettings {
        &self.shell
    }

    async fn persist(&self, settings: GlobalSettings) -> Result<()> {
        let mut current = self.settings.lock().await;

        let file = ConfigFile {
            settings: settings.clone(),
            shell: self.shell.clone(),
        };
        write_atomic(&self.path, &file.to_toml()?).await?;

        *current = settings;
        log::info!("Configuration saved to file: {:?}", self.path);
        Ok(())
    }
}

#[async_trait]
impl ConfigService for FileConfigService {
    async fn get_config(&self) -> Result<GlobalSettings> {
        Ok(self.settings.lock().await.clone())
    }

    async fn update_config(&self, settings: &GlobalSettings) -> Result<()> {
        self.persist(settings.clone()).await
    }

    async fn reset_to_default(&self) -> Result<GlobalSettings> {
        let defaults = GlobalSettings::default();
        self.persist(defaults.clone()).await?;
        log::info!("Configuration reset to default values");
        Ok(defaults)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write a file through a temporary sibling and rename it into place
async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
        }
    }

    let tmp = path.with_extension("toml.tmp");
    tokio::fs::write(&tmp, content)
        .await
        .with_context(|| format!("Failed to write config file: {:?}", tmp))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace config file: {:?}", path))?;
    Ok(())
}

/// In-memory configuration service
///
/// Used for tests and for runs that must not touch the user's config file.
/// Reads and writes can be made to fail to exercise error paths.
#[derive(Default)]
pub struct MemoryConfigService {
    settings: Mutex<GlobalSettings>,
    fail_get: Option<String>,
    fail_update: Option<String>,
    updates: AtomicUsize,
}

impl MemoryConfigService {
    pub fn new(settings: GlobalSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
            ..Default::default()
        }
    }

    /// Make every `get_config` call fail with this message
    pub fn fail_get(mut self, message: impl Into<String>) -> Self {
        self.fail_get = Some(message.into());
        self
    }

    /// Make every `update_config` call fail with this message
    pub fn fail_update(mut self, message: impl Into<String>) -> Self {
        self.fail_update = Some(message.into());
        self
    }

    /// Number of successful `update_config` calls
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> GlobalSettings {
        self.settings.lock().await.clone()
    }
}

#[async_trait]
impl ConfigService for MemoryConfigService {
    async fn get_config(&self) -> Result<GlobalSettings> {
        if let Some(message) = &self.fail_get {
            anyhow::bail!("{}", message);
        }
        Ok(self.settings.lock().await.clone())
    }

    async fn update_config(&self, settings: &GlobalSettings) -> Result<()> {
        if let Some(message) = &self.fail_update {
            anyhow::bail!("{}", message);
        }
        *self.settings.lock().await = settings.clone();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn reset_to_default(&self) -> Result<GlobalSettings> {
        let defaults = GlobalSettings::default();
        self.update_config(&defaults).await?;
        Ok(defaults)
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Language, SettingsPatch, Theme};

    #[tokio::test]
    async fn test_open_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let service = FileConfigService::open(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(service.get_config().await.unwrap(), GlobalSettings::default());
        assert_eq!(service.shell_settings(), &ShellSettings::default());
    }

    #[tokio::test]
    async fn test_update_persists_and_keeps_shell_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[settings]\ntheme = \"Light\"\nlanguage = \"en\"\n\n[shell]\nlocalization_timeout_ms = 1500\n",
        )
        .unwrap();

        let service = FileConfigService::open(&path).await.unwrap();
        let current = service.get_config().await.unwrap();
        assert_eq!(current.theme, Theme::Light);
        assert_eq!(service.shell_settings().localization_timeout_ms, 1500);

        let next = current.merged(&SettingsPatch::default().language(Language::Chinese));
        service.update_config(&next).await.unwrap();

        let reopened = FileConfigService::open(&path).await.unwrap();
        assert_eq!(reopened.get_config().await.unwrap().language, Language::Chinese);
        assert_eq!(reopened.shell_settings().localization_timeout_ms, 1500);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings]\ntheme = \"Purple\"\n").unwrap();

        assert!(FileConfigService::open(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_reset_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let service = FileConfigService::open(dir.path().join("config.toml")).await.unwrap();
        let custom = GlobalSettings::default().merged(&SettingsPatch::default().theme(Theme::Light));
        service.update_config(&custom).await.unwrap();

        let reset = service.reset_to_default().await.unwrap();
        assert_eq!(reset, GlobalSettings::default());
        assert_eq!(service.get_config().await.unwrap(), GlobalSettings::default());
    }

    #[tokio::test]
    async fn test_memory_service_failures_leave_state_untouched() {
        let service = MemoryConfigService::new(GlobalSettings::default()).fail_update("disk full");
        let next = GlobalSettings::default().merged(&SettingsPatch::default().theme(Theme::Light));

        let err = service.update_config(&next).await.unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(service.snapshot().await, GlobalSettings::default());
        assert_eq!(service.update_count(), 0);
    }
}
