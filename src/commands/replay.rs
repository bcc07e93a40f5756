//! Replay a sequence of navigation steps against a fresh store

use crate::i18n::{Catalog, Localizer};
use crate::navigation::{Chrome, HistoryLimits, NavigationSnapshot, NavigationStore};
use crate::routes::{DetailKind, EntityId};
use crate::settings::Language;
use anyhow::{Context, Result};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

/// One replay step: `/path`, `back`, `forward` or `<kind>:<id>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Visit(String),
    Back,
    Forward,
    Detail(DetailKind, EntityId),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "back" => return Ok(Step::Back),
            "forward" => return Ok(Step::Forward),
            _ => {}
        }

        if s.starts_with('/') {
            return Ok(Step::Visit(s.to_string()));
        }

        let (kind, id) = s
            .split_once(':')
            .with_context(|| format!("Invalid step '{}' (expected /path, back, forward or kind:id)", s))?;
        let kind: DetailKind = kind.parse()?;
        let id: EntityId = id
            .parse()
            .with_context(|| format!("Invalid entity id in step '{}'", s))?;
        Ok(Step::Detail(kind, id))
    }
}

impl Step {
    pub fn apply(&self, store: &mut NavigationStore) {
        match self {
            Step::Visit(path) => {
                store.navigate(path, None);
            }
            Step::Back => {
                if store.back().is_none() {
                    log::debug!("Replay: back ignored at start of history");
                }
            }
            Step::Forward => {
                if store.forward().is_none() {
                    log::debug!("Replay: forward ignored at end of history");
                }
            }
            Step::Detail(kind, id) => {
                store.navigate_to_detail(*kind, *id, None);
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutput {
    pub store: NavigationSnapshot,
    pub chrome: Chrome,
    pub breadcrumbs: Vec<String>,
}

/// Apply `steps` to a fresh store and derive the resulting chrome
pub fn replay(steps: &[Step], i18n: Arc<dyn Localizer>, limits: HistoryLimits) -> ReplayOutput {
    let mut store = NavigationStore::new(i18n.clone(), limits);
    for step in steps {
        step.apply(&mut store);
    }

    let chrome = Chrome::derive(&store, store.routes());
    let breadcrumbs = chrome
        .resolved_breadcrumbs(i18n.as_ref())
        .into_iter()
        .map(|(label, _)| label)
        .collect();

    ReplayOutput {
        store: store.snapshot(),
        chrome,
        breadcrumbs,
    }
}

pub fn replay_command(language: Language, steps: &[String]) -> Result<()> {
    let steps = steps
        .iter()
        .map(|step| step.parse())
        .collect::<Result<Vec<Step>>>()?;

    let i18n = Arc::new(Catalog::builtin(language)?);
    let output = replay(&steps, i18n, HistoryLimits::default());
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!("/about".parse::<Step>().unwrap(), Step::Visit("/about".to_string()));
        assert_eq!("back".parse::<Step>().unwrap(), Step::Back);
        assert_eq!("type:587".parse::<Step>().unwrap(), Step::Detail(DetailKind::Type, 587));
        assert_eq!(
            "npc-station:60003760".parse::<Step>().unwrap(),
            Step::Detail(DetailKind::NpcStation, 60003760)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("sideways".parse::<Step>().is_err());
        assert!("galaxy:1".parse::<Step>().is_err());
        assert!("type:abc".parse::<Step>().is_err());
    }

    #[test]
    fn test_replay_output() {
        let i18n = Arc::new(Catalog::builtin(Language::English).unwrap());
        let steps = vec![
            Step::Visit("/market".to_string()),
            Step::Detail(DetailKind::System, 30000142),
            Step::Back,
        ];

        let output = replay(&steps, i18n, HistoryLimits::default());
        assert_eq!(output.store.current_path, "/market");
        assert!(output.chrome.can_go_forward);
        assert_eq!(output.breadcrumbs, vec!["Home", "Market"]);
        assert_eq!(output.store.detail_history[&DetailKind::System][0].id, 30000142);
    }
}
