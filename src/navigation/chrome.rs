//! View state derived from the navigation store after each transition

use super::NavigationStore;
use crate::i18n::Localizer;
use crate::routes::{Breadcrumb, FlatRoutes};
use serde::Serialize;

/// Everything the shell chrome shows around the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chrome {
    pub path: String,
    pub title_key: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// No route has this exact path
    pub not_found: bool,
    /// The route exists but renders nothing (grouping or disabled node)
    pub empty: bool,
}

impl Chrome {
    pub fn derive(store: &NavigationStore, routes: &FlatRoutes<'_>) -> Self {
        let path = store.current_path();
        let route = routes.find_by_path(path);

        Self {
            path: path.to_string(),
            title_key: routes.title_key(path).to_string(),
            breadcrumbs: routes.breadcrumbs(path),
            can_go_back: store.can_go_back(),
            can_go_forward: store.can_go_forward(),
            not_found: route.is_none(),
            empty: route.is_some_and(|r| !r.is_navigable()),
        }
    }

    /// Breadcrumbs as `(label, path)` pairs in the active language
    pub fn resolved_breadcrumbs(&self, i18n: &dyn Localizer) -> Vec<(String, String)> {
        self.breadcrumbs
            .iter()
            .map(|crumb| (i18n.resolve(&crumb.label_key), crumb.path.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;
    use crate::navigation::HistoryLimits;
    use crate::settings::Language;
    use std::sync::Arc;

    fn setup() -> (NavigationStore, Arc<Catalog>) {
        let i18n = Arc::new(Catalog::builtin(Language::English).unwrap());
        (NavigationStore::new(i18n.clone(), HistoryLimits::default()), i18n)
    }

    #[test]
    fn test_home_chrome() {
        let (store, _) = setup();
        let chrome = Chrome::derive(&store, store.routes());

        assert_eq!(chrome.title_key, "nav.home");
        assert_eq!(chrome.breadcrumbs.len(), 1);
        assert!(!chrome.can_go_back);
        assert!(!chrome.not_found);
    }

    #[test]
    fn test_detail_page_chrome() {
        let (mut store, i18n) = setup();
        store.navigate_to_type(587, None);
        let chrome = Chrome::derive(&store, store.routes());

        assert!(chrome.can_go_back);
        assert!(!chrome.empty);
        let labels: Vec<_> = chrome
            .resolved_breadcrumbs(i18n.as_ref())
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["Home", "Explore", "Types", "Type Detail"]);
    }

    #[test]
    fn test_not_found_and_grouping_chrome() {
        let (mut store, _) = setup();
        store.navigate("/nowhere", None);
        let chrome = Chrome::derive(&store, store.routes());
        assert!(chrome.not_found);
        assert_eq!(chrome.title_key, "nav.unknown");

        store.navigate("/character", None);
        let chrome = Chrome::derive(&store, store.routes());
        assert!(!chrome.not_found);
        assert!(chrome.empty);
        assert_eq!(chrome.breadcrumbs.last().unwrap().path, "/character");
    }
}
