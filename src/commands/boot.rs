use crate::bootstrap::{InitState, Sequencer};
use crate::i18n::{Catalog, Localizer};
use crate::loading::{LoadingCoordinator, LoadingIndicator};
use crate::settings::{
    ConfigService, FileConfigService, GlobalSettings, Language, MemoryConfigService, SettingsPatch, SharedSettings,
    ShellSettings, Theme,
};
use anyhow::Result;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct BootOptions {
    /// Keep settings in memory instead of the config file
    pub in_memory: bool,
    /// Config file to use instead of the default location
    pub config: Option<PathBuf>,
    /// Make the settings sync stage fail
    pub fail_sync: bool,
    /// Theme applied over the stored one
    pub theme: Option<Theme>,
    /// Language of the messages shown before the stored one is applied
    pub language: Language,
}

/// Terminal state of a boot run and the lines printed for it
#[derive(Debug, Clone)]
pub struct BootReport {
    pub state: InitState,
    pub lines: Vec<String>,
}

/// Run the bootstrap sequence once and print its outcome
///
/// # Returns
/// * `Ok(report)` - The terminal state of the run (ready or failed)
/// * `Err(anyhow::Error)` - The config file could not be opened at all
pub async fn boot_command(options: BootOptions) -> Result<BootReport> {
    let (config, shell): (Arc<dyn ConfigService>, ShellSettings) = if options.in_memory {
        (Arc::new(MemoryConfigService::default()), ShellSettings::default())
    } else {
        let service = match &options.config {
            Some(path) => FileConfigService::open(path).await?,
            None => FileConfigService::open_default().await?,
        };
        let shell = service.shell_settings().clone();
        (Arc::new(service), shell)
    };
    info!("Booting with config at {}", config.location());

    let catalog = Arc::new(Catalog::pending(options.language)?);
    let ready = catalog.clone();
    tokio::spawn(async move {
        // String tables are embedded, so readiness only waits for the runtime
        tokio::task::yield_now().await;
        ready.mark_ready();
    });

    let loading = LoadingCoordinator::new();
    let (mut overlay, indicator) =
        LoadingIndicator::new(shell.loading_show_delay(), shell.loading_hide_delay()).spawn(&loading);
    let overlay_loading = loading.clone();
    tokio::spawn(async move {
        while overlay.changed().await.is_ok() {
            let visible = *overlay.borrow_and_update();
            match overlay_loading.current() {
                Some(entry) if visible => info!("Loading overlay: {} {:?}", entry.message, entry.percent()),
                _ => info!("Loading overlay visible: {}", visible),
            }
        }
    });

    let fail_sync = options.fail_sync;
    let mut overrides = SettingsPatch::default();
    if let Some(theme) = options.theme {
        overrides = overrides.theme(theme);
    }

    let settings = SharedSettings::default();
    let sequencer = Sequencer::new(config, catalog.clone(), loading, settings.clone())
        .with_localization_timeout(shell.localization_timeout())
        .with_overrides(overrides)
        .with_theme_sink(Arc::new(move |theme: Theme| -> Result<()> {
            if fail_sync {
                anyhow::bail!("theme '{}' could not be applied", theme.css_name());
            }
            info!("Applied theme: {}", theme.css_name());
            Ok(())
        }));

    let state = sequencer
        .run_until(async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await;
    indicator.abort();

    let lines = outcome_lines(&state, &settings.load(), catalog.as_ref());
    if let InitState::Failed(report) = &state {
        warn!("Bootstrap failed: {}", report);
    }
    for line in &lines {
        println!("{}", line);
    }

    Ok(BootReport { state, lines })
}

fn outcome_lines(state: &InitState, settings: &GlobalSettings, i18n: &dyn Localizer) -> Vec<String> {
    match state {
        InitState::Ready => {
            let mut lines = vec![
                "ready".to_string(),
                format!("theme: {}", settings.theme.css_name()),
                format!("language: {}", settings.language),
            ];
            if let Some(bundle) = &settings.enabled_bundle_id {
                lines.push(format!("bundle: {}", bundle));
            }
            lines
        }
        InitState::Failed(report) => vec![
            report.message(i18n),
            format!("[{}]", report.reload_label(i18n)),
        ],
        other => vec![other.name().to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_boot_in_memory() {
        let report = boot_command(BootOptions {
            in_memory: true,
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(report.state, InitState::Ready);
    }

    #[tokio::test]
    async fn test_boot_with_failing_sync() {
        let report = boot_command(BootOptions {
            in_memory: true,
            fail_sync: true,
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(report.state.name(), "failed");
    }

    #[tokio::test]
    async fn test_boot_creates_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let report = boot_command(BootOptions {
            config: Some(path.clone()),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(report.state, InitState::Ready);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[settings]"));
    }

    #[tokio::test]
    async fn test_boot_theme_override_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let report = boot_command(BootOptions {
            config: Some(path.clone()),
            theme: Some(Theme::Light),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(report.state, InitState::Ready);
        let reopened = FileConfigService::open(&path).await.unwrap();
        assert_eq!(reopened.get_config().await.unwrap().theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_failure_is_reported_in_chosen_language() {
        let english = boot_command(BootOptions {
            in_memory: true,
            fail_sync: true,
            language: Language::English,
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(english.lines.last().map(String::as_str), Some("[Reload]"));
        assert!(english.lines[0].starts_with("Error loading config: "));

        let chinese = boot_command(BootOptions {
            in_memory: true,
            fail_sync: true,
            language: Language::Chinese,
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(chinese.lines.last().map(String::as_str), Some("[重新加载]"));
        assert!(chinese.lines[0].starts_with("加载配置出错："));
    }
}
