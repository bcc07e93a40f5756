//! Navigation state machine
//!
//! This module provides:
//! - The current location with a bounded back/forward history
//! - Last-seen parameters per parameterized route
//! - The general visit log (excluding home) and per-kind detail trails
//! - Typed `navigate_to_*` helpers for every detail kind
//!
//! Every operation is a total state transition. Nothing here validates paths
//! against the route table; an unknown path renders as "not found" downstream.
//! Derived view state (breadcrumbs, back/forward buttons) is computed by
//! [`Chrome::derive`] after a transition instead of as a side effect of it.

pub mod chrome;
pub mod history;

pub use chrome::Chrome;
pub use history::BoundedHistory;

use crate::i18n::Localizer;
use crate::routes::{DetailKind, EntityId, FlatRoutes, HOME_PATH, RouteKey, RouteParams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

/// Length limits of the navigation trails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLimits {
    /// Back/forward entries
    #[serde(default = "default_navigation_limit")]
    pub navigation: usize,
    /// General visit log entries
    #[serde(default = "default_general_limit")]
    pub general: usize,
    /// Per-kind cap for type and faction trails
    #[serde(default = "default_explore_detail_limit")]
    pub explore_detail: usize,
    /// Per-kind cap for the other detail trails
    #[serde(default = "default_specialized_detail_limit")]
    pub specialized_detail: usize,
}

fn default_navigation_limit() -> usize {
    100
}

fn default_general_limit() -> usize {
    20
}

fn default_explore_detail_limit() -> usize {
    10
}

fn default_specialized_detail_limit() -> usize {
    20
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            navigation: default_navigation_limit(),
            general: default_general_limit(),
            explore_detail: default_explore_detail_limit(),
            specialized_detail: default_specialized_detail_limit(),
        }
    }
}

impl HistoryLimits {
    pub fn detail_cap(&self, kind: DetailKind) -> usize {
        if kind.is_explore_kind() {
            self.explore_detail
        } else {
            self.specialized_detail
        }
    }
}

/// One back/forward stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Entry of the general visit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralHistoryEntry {
    pub path: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RouteParams>,
}

/// Entry of a per-kind "recently viewed" trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailHistoryEntry {
    pub kind: DetailKind,
    pub id: EntityId,
    pub title: String,
    pub path: String,
    pub params: RouteParams,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a location change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub from: String,
    pub to: String,
    /// Whether a new back/forward entry was created
    pub pushed: bool,
}

/// Serializable view of the whole store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSnapshot {
    pub current_path: String,
    pub history: Vec<HistoryEntry>,
    pub cursor: usize,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub route_params: BTreeMap<String, RouteParams>,
    pub general_history: Vec<GeneralHistoryEntry>,
    pub detail_history: BTreeMap<DetailKind, Vec<DetailHistoryEntry>>,
}

pub struct NavigationStore {
    routes: &'static FlatRoutes<'static>,
    i18n: Arc<dyn Localizer>,
    limits: HistoryLimits,
    current_path: String,
    history: VecDeque<HistoryEntry>,
    cursor: usize,
    route_params: HashMap<RouteKey, RouteParams>,
    general: BoundedHistory<String, GeneralHistoryEntry>,
    detail: BTreeMap<DetailKind, BoundedHistory<EntityId, DetailHistoryEntry>>,
}

impl NavigationStore {
    /// Create a store over the built-in route table, positioned at home
    pub fn new(i18n: Arc<dyn Localizer>, limits: HistoryLimits) -> Self {
        Self::with_routes(FlatRoutes::global(), i18n, limits)
    }

    pub fn with_routes(routes: &'static FlatRoutes<'static>, i18n: Arc<dyn Localizer>, limits: HistoryLimits) -> Self {
        let mut history = VecDeque::with_capacity(limits.navigation.max(1));
        history.push_back(HistoryEntry {
            path: HOME_PATH.to_string(),
            timestamp: Utc::now(),
        });

        Self {
            routes,
            i18n,
            limits,
            current_path: HOME_PATH.to_string(),
            history,
            cursor: 0,
            route_params: HashMap::new(),
            general: BoundedHistory::new(limits.general),
            detail: BTreeMap::new(),
        }
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn routes(&self) -> &'static FlatRoutes<'static> {
        self.routes
    }

    pub fn limits(&self) -> &HistoryLimits {
        &self.limits
    }

    /// Move to `path`
    ///
    /// Navigating to the current path refreshes it without a new back/forward
    /// entry. Navigating from the middle of the history drops the forward
    /// entries. Every path but home is logged in the general history.
    pub fn navigate(&mut self, path: &str, title: Option<&str>) -> Navigation {
        let from = self.current_path.clone();
        let pushed = path != from;

        if pushed {
            self.history.truncate(self.cursor + 1);
            self.history.push_back(HistoryEntry {
                path: path.to_string(),
                timestamp: Utc::now(),
            });
            if self.history.len() > self.limits.navigation.max(1) {
                self.history.pop_front();
            }
            self.cursor = self.history.len() - 1;
            self.current_path = path.to_string();
        }

        let title = self.title_for(path, title);
        let params = self.route_params_at(path).copied();
        self.log_visit(path, title, params);

        log::debug!("Navigated {} -> {} (pushed: {})", from, path, pushed);
        Navigation {
            from,
            to: path.to_string(),
            pushed,
        }
    }

    /// Record `params` for their route and navigate to it
    pub fn navigate_with_params(&mut self, params: RouteParams, title: Option<&str>) -> Navigation {
        self.set_route_params(params);
        let path = self.path_for(params.route_key());
        self.navigate(&path, title)
    }

    /// Last parameters recorded for a route
    pub fn route_params(&self, key: RouteKey) -> Option<&RouteParams> {
        self.route_params.get(&key)
    }

    /// Last parameters recorded for the route at `path`
    pub fn route_params_at(&self, path: &str) -> Option<&RouteParams> {
        let route = self.routes.find_by_path(path)?;
        self.route_params.get(&route.key)
    }

    /// Record parameters for their route without navigating
    pub fn set_route_params(&mut self, params: RouteParams) {
        if let Some(previous) = self.route_params.insert(params.route_key(), params) {
            if previous != params {
                log::debug!("Replaced params for {}: {:?} -> {:?}", params.route_key(), previous, params);
            }
        }
    }

    /// Overwrite the entry at the cursor without growing the history
    pub fn replace(&mut self, path: &str) -> Navigation {
        let from = std::mem::replace(&mut self.current_path, path.to_string());
        let entry = HistoryEntry {
            path: path.to_string(),
            timestamp: Utc::now(),
        };
        match self.history.get_mut(self.cursor) {
            Some(slot) => *slot = entry,
            None => {
                self.history.push_back(entry);
                self.cursor = self.history.len() - 1;
            }
        }

        log::debug!("Replaced {} with {}", from, path);
        Navigation {
            from,
            to: path.to_string(),
            pushed: false,
        }
    }

    pub fn replace_with_params(&mut self, params: RouteParams) -> Navigation {
        self.set_route_params(params);
        let path = self.path_for(params.route_key());
        self.replace(&path)
    }

    /// Step back; a no-op at the start of history
    pub fn back(&mut self) -> Option<Navigation> {
        if !self.can_go_back() {
            return None;
        }
        Some(self.move_cursor(self.cursor - 1))
    }

    /// Step forward; a no-op at the end of history
    pub fn forward(&mut self) -> Option<Navigation> {
        if !self.can_go_forward() {
            return None;
        }
        Some(self.move_cursor(self.cursor + 1))
    }

    fn move_cursor(&mut self, cursor: usize) -> Navigation {
        self.cursor = cursor;
        let to = self.history[cursor].path.clone();
        let from = std::mem::replace(&mut self.current_path, to.clone());
        log::debug!("History cursor {} -> {}", from, to);
        Navigation { from, to, pushed: false }
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    /// Log a visit without changing the location; home is never logged
    pub fn add_general_history(&mut self, path: &str, title: &str) {
        let params = self.route_params_at(path).copied();
        self.log_visit(path, title.to_string(), params);
    }

    fn log_visit(&mut self, path: &str, title: String, params: Option<RouteParams>) {
        if path == HOME_PATH {
            return;
        }
        self.general.touch(
            path.to_string(),
            GeneralHistoryEntry {
                path: path.to_string(),
                title,
                timestamp: Utc::now(),
                params,
            },
        );
    }

    /// Most recent first
    pub fn general_history(&self) -> impl Iterator<Item = &GeneralHistoryEntry> + '_ {
        self.general.iter()
    }

    /// Record a viewed entity without changing the location
    pub fn add_detail_history(&mut self, entry: DetailHistoryEntry) {
        let cap = self.limits.detail_cap(entry.kind);
        let trail = self
            .detail
            .entry(entry.kind)
            .or_insert_with(|| BoundedHistory::new(cap));

        if let Some((id, _)) = trail.touch(entry.id, entry) {
            log::debug!("Evicted {} from detail history", id);
        }
    }

    /// Most recent first
    pub fn detail_history(&self, kind: DetailKind) -> impl Iterator<Item = &DetailHistoryEntry> + '_ {
        self.detail.get(&kind).into_iter().flat_map(|trail| trail.iter())
    }

    pub fn detail_ids(&self, kind: DetailKind) -> Vec<EntityId> {
        self.detail_history(kind).map(|entry| entry.id).collect()
    }

    pub fn detail_history_entry(&self, kind: DetailKind, id: EntityId) -> Option<&DetailHistoryEntry> {
        self.detail.get(&kind)?.get(&id)
    }

    /// Drop one entity from its trail, leaving the order of the rest
    pub fn remove_detail_history(&mut self, kind: DetailKind, id: EntityId) -> Option<DetailHistoryEntry> {
        self.detail.get_mut(&kind)?.remove(&id)
    }

    pub fn clear_detail_history(&mut self, kind: DetailKind) {
        if let Some(trail) = self.detail.get_mut(&kind) {
            trail.clear();
        }
    }

    /// Re-open an entry from a detail trail
    pub fn navigate_to_detail_history_item(&mut self, entry: &DetailHistoryEntry) -> Navigation {
        let refreshed = DetailHistoryEntry {
            timestamp: Utc::now(),
            ..entry.clone()
        };
        self.add_detail_history(refreshed);
        self.navigate_with_params(entry.params, Some(&entry.title))
    }

    /// Shared body of the `navigate_to_*` helpers
    pub fn navigate_to_detail(&mut self, kind: DetailKind, id: EntityId, title: Option<&str>) -> Navigation {
        let title = match title {
            Some(title) => title.to_string(),
            None => self.i18n.resolve_or(kind.title_key(), kind.fallback_title()),
        };
        let params = kind.params(id);
        let path = self.path_for(kind.route_key());

        self.add_detail_history(DetailHistoryEntry {
            kind,
            id,
            title: title.clone(),
            path,
            params,
            timestamp: Utc::now(),
        });
        self.navigate_with_params(params, Some(&title))
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            current_path: self.current_path.clone(),
            history: self.history.iter().cloned().collect(),
            cursor: self.cursor,
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
            route_params: self
                .route_params
                .iter()
                .map(|(key, params)| (key.as_str().to_string(), *params))
                .collect(),
            general_history: self.general.iter().cloned().collect(),
            detail_history: self
                .detail
                .iter()
                .filter(|(_, trail)| !trail.is_empty())
                .map(|(kind, trail)| (*kind, trail.iter().cloned().collect()))
                .collect(),
        }
    }

    fn path_for(&self, key: RouteKey) -> String {
        match self.routes.path_of(key) {
            Some(path) => path.to_string(),
            None => {
                log::warn!("Route '{}' is not in the route table", key);
                format!("/{}", key)
            }
        }
    }

    fn title_for(&self, path: &str, title: Option<&str>) -> String {
        match title {
            Some(title) => title.to_string(),
            None => self.i18n.resolve_or(self.routes.title_key(path), path),
        }
    }
}

macro_rules! detail_navigators {
    ($($(#[$meta:meta])* $name:ident => $kind:ident),* $(,)?) => {
        impl NavigationStore {
            $(
                $(#[$meta])*
                pub fn $name(&mut self, id: EntityId, title: Option<&str>) -> Navigation {
                    self.navigate_to_detail(DetailKind::$kind, id, title)
                }
            )*
        }
    };
}

detail_navigators! {
    /// Open the detail page of an item type
    navigate_to_type => Type,
    /// Open the detail page of a faction
    navigate_to_faction => Faction,
    navigate_to_npc_corporation => NpcCorporation,
    navigate_to_region => Region,
    navigate_to_constellation => Constellation,
    /// Open a solar system
    navigate_to_system => System,
    navigate_to_planet => Planet,
    navigate_to_moon => Moon,
    navigate_to_npc_station => NpcStation,
}
