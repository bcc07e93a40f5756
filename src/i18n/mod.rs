//! Localization boundary
//!
//! The navigation core never embeds display text: every label is a key resolved
//! through a [`Localizer`]. Literal text is only used as a fallback while
//! localization is not ready yet.

use crate::settings::Language;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::watch;

const EN_TABLE: &str = include_str!("locales/en.toml");
const ZH_TABLE: &str = include_str!("locales/zh.toml");

/// Resolves localization keys to display strings
#[async_trait]
pub trait Localizer: Send + Sync {
    /// Resolve a key in the active language; unknown keys resolve to themselves
    fn resolve(&self, key: &str) -> String;

    fn is_ready(&self) -> bool;

    /// One-shot style readiness notification (flips to `true` once)
    fn ready_signal(&self) -> watch::Receiver<bool>;

    fn language(&self) -> Language;

    async fn change_language(&self, language: Language) -> Result<()>;

    /// Resolve a key, or use a literal fallback while not ready
    fn resolve_or(&self, key: &str, fallback: &str) -> String {
        if self.is_ready() {
            self.resolve(key)
        } else {
            fallback.to_string()
        }
    }

    /// Resolve a key and substitute `{{name}}` placeholders
    fn resolve_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.resolve(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{{{}}}}}", name), value);
        }
        text
    }
}

/// String tables per language, backed by the embedded locale files
pub struct Catalog {
    tables: HashMap<Language, HashMap<String, String>>,
    language: RwLock<Language>,
    ready: watch::Sender<bool>,
}

impl Catalog {
    /// Catalog with the built-in tables that still has to be marked ready
    pub fn pending(language: Language) -> Result<Self> {
        let mut tables = HashMap::new();
        tables.insert(Language::English, parse_table(EN_TABLE).context("Invalid English locale table")?);
        tables.insert(Language::Chinese, parse_table(ZH_TABLE).context("Invalid Chinese locale table")?);
        Ok(Self::from_tables(tables, language))
    }

    /// Catalog with the built-in tables, ready for use
    pub fn builtin(language: Language) -> Result<Self> {
        let catalog = Self::pending(language)?;
        catalog.mark_ready();
        Ok(catalog)
    }

    /// Catalog over caller supplied tables (not ready until marked)
    pub fn from_tables(tables: HashMap<Language, HashMap<String, String>>, language: Language) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            tables,
            language: RwLock::new(language),
            ready,
        }
    }

    pub fn mark_ready(&self) {
        if !self.ready.send_replace(true) {
            log::debug!("Localization ready ({})", self.language());
        }
    }

    pub fn has_language(&self, language: Language) -> bool {
        self.tables.contains_key(&language)
    }
}

fn parse_table(source: &str) -> Result<HashMap<String, String>> {
    Ok(toml::from_str(source)?)
}

#[async_trait]
impl Localizer for Catalog {
    fn resolve(&self, key: &str) -> String {
        let language = self.language();
        let found = self
            .tables
            .get(&language)
            .and_then(|table| table.get(key))
            .or_else(|| self.tables.get(&Language::English).and_then(|table| table.get(key)));

        match found {
            Some(text) => text.clone(),
            None => {
                log::debug!("Missing localization key '{}' for {}", key, language);
                key.to_string()
            }
        }
    }

    fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    fn ready_signal(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    fn language(&self) -> Language {
        *self.language.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn change_language(&self, language: Language) -> Result<()> {
        if !self.has_language(language) {
            anyhow::bail!("No string table for language '{}'", language);
        }

        let mut current = self.language.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *current != language {
            log::info!("Language changed to: {}", language);
            *current = language;
        }
        Ok(())
    }
}
