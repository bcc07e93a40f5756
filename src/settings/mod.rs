//! Application settings snapshot
//!
//! This module provides:
//! - The persisted settings snapshot (`GlobalSettings`) and partial updates
//! - The live, atomically swapped copy shared across the app (`SharedSettings`)
//! - The configuration service boundary and its file/in-memory backends
//! - Shell tuning options read from the same file (`ShellSettings`)

pub mod service;
pub mod shell;

pub use service::{ConfigFile, ConfigService, FileConfigService, MemoryConfigService};
pub use shell::ShellSettings;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Name understood by the theme switcher
    pub fn css_name(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => anyhow::bail!("Unknown theme '{}' (expected dark or light)", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[serde(rename = "zh")]
    #[default]
    Chinese,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh" => Ok(Language::Chinese),
            "en" => Ok(Language::English),
            _ => anyhow::bail!("Unknown language '{}' (expected zh or en)", s),
        }
    }
}

/// User-facing settings persisted by the configuration service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GlobalSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_bundle_id: Option<String>,
    /// Extension fields owned by other parts of the app
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl GlobalSettings {
    /// Return a copy with the patch applied; fields absent from the patch are kept
    pub fn merged(&self, patch: &SettingsPatch) -> GlobalSettings {
        let mut next = self.clone();
        if let Some(theme) = patch.theme {
            next.theme = theme;
        }
        if let Some(language) = patch.language {
            next.language = language;
        }
        if let Some(bundle) = &patch.enabled_bundle_id {
            next.enabled_bundle_id = bundle.clone();
        }
        for (key, value) in &patch.extra {
            next.extra.insert(key.clone(), value.clone());
        }
        next
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
    /// `Some(None)` clears the enabled bundle
    pub enabled_bundle_id: Option<Option<String>>,
    pub extra: BTreeMap<String, toml::Value>,
}

impl SettingsPatch {
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn enabled_bundle(mut self, bundle_id: Option<String>) -> Self {
        self.enabled_bundle_id = Some(bundle_id);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.language.is_none()
            && self.enabled_bundle_id.is_none()
            && self.extra.is_empty()
    }
}

/// Live settings snapshot shared across the app
///
/// Readers always observe a complete snapshot; updates replace it with a single
/// atomic swap.
#[derive(Clone)]
pub struct SharedSettings {
    inner: Arc<ArcSwap<GlobalSettings>>,
}

impl SharedSettings {
    pub fn new(settings: GlobalSettings) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    /// Get a clone of the current snapshot Arc
    pub fn load(&self) -> Arc<GlobalSettings> {
        self.inner.load_full()
    }

    /// Replace the whole snapshot
    pub fn store(&self, settings: GlobalSettings) {
        self.inner.store(Arc::new(settings));
    }
}

impl Default for SharedSettings {
    fn default() -> Self {
        Self::new(GlobalSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_first_run() {
        let settings = GlobalSettings::default();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.language, Language::Chinese);
        assert!(settings.enabled_bundle_id.is_none());
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let base = GlobalSettings {
            theme: Theme::Light,
            language: Language::English,
            enabled_bundle_id: Some("tranquility".to_string()),
            extra: BTreeMap::new(),
        };

        let merged = base.merged(&SettingsPatch::default().theme(Theme::Dark));
        assert_eq!(merged.theme, Theme::Dark);
        assert_eq!(merged.language, Language::English);
        assert_eq!(merged.enabled_bundle_id.as_deref(), Some("tranquility"));

        let cleared = base.merged(&SettingsPatch::default().enabled_bundle(None));
        assert!(cleared.enabled_bundle_id.is_none());
    }

    #[test]
    fn test_extension_fields_round_trip_through_toml() {
        let settings = GlobalSettings::default().merged(&SettingsPatch::default().extra("font_size", 14i64));
        let text = toml::to_string(&settings).unwrap();
        assert!(text.contains("font_size = 14"));

        let parsed: GlobalSettings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_language_serde_codes() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            language: Language,
        }
        let text = toml::to_string(&Wrapper { language: Language::English }).unwrap();
        assert_eq!(text.trim(), r#"language = "en""#);
        assert_eq!("zh".parse::<Language>().unwrap(), Language::Chinese);
    }

    #[test]
    fn test_shared_settings_swap() {
        let shared = SharedSettings::default();
        let before = shared.load();

        let next = before.merged(&SettingsPatch::default().language(Language::English));
        shared.store(next);
        assert_eq!(shared.load().language, Language::English);
        // Earlier readers keep their complete snapshot
        assert_eq!(before.language, Language::Chinese);
    }
}
