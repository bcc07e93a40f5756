//! Bootstrap error taxonomy
//!
//! Navigation and the loader registry never fail. Every failure the shell can
//! report comes from the bootstrap sequence and is fatal for that run.

use std::time::Duration;

/// A fatal bootstrap failure
///
/// Collaborator errors are flattened to their display chain so the failure
/// can be cloned into observable state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    /// Reading the configuration snapshot failed
    #[error("configuration load failed: {0}")]
    Config(String),

    /// Localization did not become ready in time
    #[error("localization not ready after {}ms", waited.as_millis())]
    LocalizationTimeout { waited: Duration },

    /// The localization collaborator went away or rejected a language
    #[error("localization failed: {0}")]
    Localization(String),

    /// Applying or persisting the settings snapshot failed
    #[error("settings sync failed: {0}")]
    SettingsSync(String),

    /// The run was torn down before it finished
    #[error("initialization aborted")]
    Aborted,
}

impl InitError {
    pub fn config(err: anyhow::Error) -> Self {
        Self::Config(format!("{:#}", err))
    }

    pub fn localization(err: anyhow::Error) -> Self {
        Self::Localization(format!("{:#}", err))
    }

    pub fn settings_sync(err: anyhow::Error) -> Self {
        Self::SettingsSync(format!("{:#}", err))
    }
}
