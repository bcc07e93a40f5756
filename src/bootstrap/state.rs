use crate::error::InitError;
use crate::i18n::Localizer;
use serde::Serialize;
use std::fmt;

/// A non-terminal step of the bootstrap chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InitStage {
    ConfiguringGlobalConfig,
    LoadingLocalization,
    SyncingSettings,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitStage::ConfiguringGlobalConfig => write!(f, "configuring global config"),
            InitStage::LoadingLocalization => write!(f, "loading localization"),
            InitStage::SyncingSettings => write!(f, "syncing settings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitState {
    Idle,
    ConfiguringGlobalConfig,
    LoadingLocalization,
    SyncingSettings,
    Ready,
    Failed(FailureReport),
}

impl InitState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InitState::Ready | InitState::Failed(_))
    }

    pub fn stage(&self) -> Option<InitStage> {
        match self {
            InitState::ConfiguringGlobalConfig => Some(InitStage::ConfiguringGlobalConfig),
            InitState::LoadingLocalization => Some(InitStage::LoadingLocalization),
            InitState::SyncingSettings => Some(InitStage::SyncingSettings),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReport> {
        match self {
            InitState::Failed(report) => Some(report),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InitState::Idle => "idle",
            InitState::ConfiguringGlobalConfig => "configuring-global-config",
            InitState::LoadingLocalization => "loading-localization",
            InitState::SyncingSettings => "syncing-settings",
            InitState::Ready => "ready",
            InitState::Failed(_) => "failed",
        }
    }
}

impl From<InitStage> for InitState {
    fn from(stage: InitStage) -> Self {
        match stage {
            InitStage::ConfiguringGlobalConfig => InitState::ConfiguringGlobalConfig,
            InitStage::LoadingLocalization => InitState::LoadingLocalization,
            InitStage::SyncingSettings => InitState::SyncingSettings,
        }
    }
}

/// Completion flags of the bootstrap chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InitFlags {
    pub configured: bool,
    pub localized: bool,
    pub synced: bool,
}

impl InitFlags {
    pub fn all_done(&self) -> bool {
        self.configured && self.localized && self.synced
    }
}

/// What the error screen shows after a failed run
///
/// The only recovery is a full reload; no single stage is retried.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureReport {
    pub stage: InitStage,
    pub error: InitError,
}

impl FailureReport {
    pub fn message(&self, i18n: &dyn Localizer) -> String {
        let error = self.error.to_string();
        if i18n.is_ready() {
            i18n.resolve_with("common.error_loading_config", &[("error", &error)])
        } else {
            format!("Error loading config: {}", error)
        }
    }

    pub fn reload_label(&self, i18n: &dyn Localizer) -> String {
        i18n.resolve_or("common.reload", "Reload")
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} while {}", self.error, self.stage)
    }
}
