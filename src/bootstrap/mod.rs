//! Application bootstrap sequence
//!
//! A strict chain: configuration, then localization, then settings sync. Each
//! stage registers a named loader while it runs. The first error ends the run
//! in a terminal failed state, clears every loader and is never retried.

pub mod state;

pub use state::{FailureReport, InitFlags, InitStage, InitState};

use crate::error::InitError;
use crate::i18n::Localizer;
use crate::loading::LoadingCoordinator;
use crate::settings::{ConfigService, GlobalSettings, SettingsPatch, SharedSettings, Theme};
use anyhow::Result;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

pub const GLOBAL_CONFIG_LOADER: &str = "global-config";
pub const I18N_LOADER: &str = "i18n";
pub const APP_INITIALIZER_LOADER: &str = "app-initializer";

/// Receives the theme chosen by the settings snapshot
pub trait ThemeSink: Send + Sync {
    fn apply_theme(&self, theme: Theme) -> Result<()>;
}

impl<F> ThemeSink for F
where
    F: Fn(Theme) -> Result<()> + Send + Sync,
{
    fn apply_theme(&self, theme: Theme) -> Result<()> {
        self(theme)
    }
}

pub struct Sequencer {
    config: Arc<dyn ConfigService>,
    i18n: Arc<dyn Localizer>,
    theme: Arc<dyn ThemeSink>,
    overrides: SettingsPatch,
    loading: LoadingCoordinator,
    settings: SharedSettings,
    localization_timeout: Duration,
    state: watch::Sender<InitState>,
    flags: Mutex<InitFlags>,
}

impl Sequencer {
    pub fn new(
        config: Arc<dyn ConfigService>,
        i18n: Arc<dyn Localizer>,
        loading: LoadingCoordinator,
        settings: SharedSettings,
    ) -> Self {
        let (state, _) = watch::channel(InitState::Idle);
        Self {
            config,
            i18n,
            theme: Arc::new(|theme: Theme| -> Result<()> {
                log::debug!("No theme sink, ignoring theme {}", theme.css_name());
                Ok(())
            }),
            overrides: SettingsPatch::default(),
            loading,
            settings,
            localization_timeout: Duration::from_secs(10),
            state,
            flags: Mutex::new(InitFlags::default()),
        }
    }

    pub fn with_theme_sink(mut self, theme: Arc<dyn ThemeSink>) -> Self {
        self.theme = theme;
        self
    }

    /// Changes applied on top of the stored snapshot during settings sync
    pub fn with_overrides(mut self, overrides: SettingsPatch) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_localization_timeout(mut self, timeout: Duration) -> Self {
        self.localization_timeout = timeout;
        self
    }

    pub fn state(&self) -> InitState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InitState> {
        self.state.subscribe()
    }

    pub fn flags(&self) -> InitFlags {
        *self.flags.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The application body renders only after every stage succeeded
    pub fn can_render(&self) -> bool {
        self.flags().all_done() && matches!(*self.state.borrow(), InitState::Ready)
    }

    pub fn failure(&self) -> Option<FailureReport> {
        self.state.borrow().failure().cloned()
    }

    /// Run the whole chain
    pub async fn run(&self) -> InitState {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run the whole chain, aborting if `shutdown` completes first
    ///
    /// A sequencer that already reached a terminal state returns it as is. A
    /// second caller while a run is in flight waits for that run's outcome.
    /// Dropping the future of the claiming call fails the run as aborted.
    pub async fn run_until<F>(&self, shutdown: F) -> InitState
    where
        F: Future<Output = ()>,
    {
        if !self.begin() {
            let mut state = self.subscribe();
            return match state.wait_for(InitState::is_terminal).await {
                Ok(terminal) => terminal.clone(),
                Err(_) => self.state(),
            };
        }
        let _claim = ClaimedRun(self);

        let outcome = tokio::select! {
            result = self.stages() => result,
            _ = shutdown => Err(InitError::Aborted),
        };

        match outcome {
            Ok(()) => {
                log::info!("Initialization complete");
                self.state.send_replace(InitState::Ready);
            }
            Err(error) => self.fail(error),
        }
        self.state()
    }

    /// Claim the run; false if it already started or finished
    fn begin(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == InitState::Idle {
                *state = InitState::ConfiguringGlobalConfig;
                true
            } else {
                false
            }
        })
    }

    fn enter(&self, stage: InitStage) {
        log::debug!("Initialization stage: {}", stage);
        self.state.send_replace(stage.into());
    }

    fn mark(&self, update: impl FnOnce(&mut InitFlags)) {
        let mut flags = self.flags.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        update(&mut flags);
    }

    fn fail(&self, error: InitError) {
        let stage = self
            .state
            .borrow()
            .stage()
            .unwrap_or(InitStage::ConfiguringGlobalConfig);

        // No spinner may outlive a failed run
        self.loading.clear_all();

        log::error!("Initialization failed while {}: {}", stage, error);
        self.state.send_replace(InitState::Failed(FailureReport { stage, error }));
    }

    async fn stages(&self) -> Result<(), InitError> {
        let snapshot = self.load_config().await?;

        self.enter(InitStage::LoadingLocalization);
        self.wait_for_localization().await?;

        self.enter(InitStage::SyncingSettings);
        self.sync_settings(snapshot).await
    }

    async fn load_config(&self) -> Result<GlobalSettings, InitError> {
        let guard = self
            .loading
            .begin(GLOBAL_CONFIG_LOADER, "Initializing global configuration...");

        let snapshot = self.config.get_config().await.map_err(InitError::config)?;
        log::info!("Global configuration loaded from {}", self.config.location());

        guard.finish();
        self.mark(|flags| flags.configured = true);
        Ok(snapshot)
    }

    async fn wait_for_localization(&self) -> Result<(), InitError> {
        let message = self
            .i18n
            .resolve_or("common.loading_language", "Loading language settings...");
        let guard = self.loading.begin(I18N_LOADER, &message);

        let mut ready = self.i18n.ready_signal();
        let outcome = tokio::time::timeout(self.localization_timeout, ready.wait_for(|ready| *ready))
            .await
            .map(|result| result.map(|_| ()));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                return Err(InitError::Localization(
                    "provider closed before becoming ready".to_string(),
                ));
            }
            Err(_) => {
                return Err(InitError::LocalizationTimeout {
                    waited: self.localization_timeout,
                });
            }
        }

        log::info!("Localization ready ({})", self.i18n.language());
        guard.finish();
        self.mark(|flags| flags.localized = true);
        Ok(())
    }

    async fn sync_settings(&self, snapshot: GlobalSettings) -> Result<(), InitError> {
        let message = self
            .i18n
            .resolve_or("common.loading_app_config", "Loading app configuration...");
        let guard = self.loading.begin(APP_INITIALIZER_LOADER, &message);

        let next = snapshot.merged(&self.overrides);

        guard.progress(50.0);
        self.theme
            .apply_theme(next.theme)
            .map_err(InitError::settings_sync)?;
        guard.progress(80.0);

        self.config
            .update_config(&next)
            .await
            .map_err(InitError::settings_sync)?;

        // Published in one swap, only once the store accepted it
        let language = next.language;
        self.settings.store(next);

        if self.i18n.language() != language {
            self.i18n
                .change_language(language)
                .await
                .map_err(InitError::localization)?;
        }

        guard.progress(100.0);
        log::info!("Settings synchronized with global config");
        guard.finish();
        self.mark(|flags| flags.synced = true);
        Ok(())
    }
}

/// Settles a claimed run that was dropped before reaching a terminal state
struct ClaimedRun<'a>(&'a Sequencer);

impl Drop for ClaimedRun<'_> {
    fn drop(&mut self) {
        let settled = self.0.state.borrow().is_terminal();
        if !settled {
            log::warn!("Initialization run dropped before finishing");
            self.0.fail(InitError::Aborted);
        }
    }
}
