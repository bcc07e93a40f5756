use crate::navigation::HistoryLimits;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning options for the navigation shell, stored in the `[shell]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellSettings {
    /// How long bootstrap waits for localization before failing
    #[serde(default = "default_localization_timeout_ms")]
    pub localization_timeout_ms: u64,

    /// Loading must stay active this long before the overlay shows
    #[serde(default = "default_loading_show_delay_ms")]
    pub loading_show_delay_ms: u64,

    /// Grace period before the overlay hides once idle
    #[serde(default = "default_loading_hide_delay_ms")]
    pub loading_hide_delay_ms: u64,

    #[serde(default)]
    pub history: HistoryLimits,
}

fn default_localization_timeout_ms() -> u64 {
    10_000
}

fn default_loading_show_delay_ms() -> u64 {
    500
}

fn default_loading_hide_delay_ms() -> u64 {
    100
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            localization_timeout_ms: default_localization_timeout_ms(),
            loading_show_delay_ms: default_loading_show_delay_ms(),
            loading_hide_delay_ms: default_loading_hide_delay_ms(),
            history: HistoryLimits::default(),
        }
    }
}

impl ShellSettings {
    pub fn localization_timeout(&self) -> Duration {
        Duration::from_millis(self.localization_timeout_ms)
    }

    pub fn loading_show_delay(&self) -> Duration {
        Duration::from_millis(self.loading_show_delay_ms)
    }

    pub fn loading_hide_delay(&self) -> Duration {
        Duration::from_millis(self.loading_hide_delay_ms)
    }
}
