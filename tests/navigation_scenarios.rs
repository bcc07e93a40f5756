//! Integration tests for routing and navigation
//!
//! Drives the route resolver, the navigation store and chrome derivation
//! together through the public API.

use nav_shell::i18n::Catalog;
use nav_shell::navigation::{Chrome, DetailHistoryEntry, HistoryLimits, NavigationStore};
use nav_shell::routes::{Breadcrumb, DetailKind, FlatRoutes, RouteKey, RouteParams, TypeDetailParams};
use nav_shell::settings::Language;
use std::sync::Arc;

fn store() -> NavigationStore {
    let i18n = Arc::new(Catalog::builtin(Language::English).unwrap());
    NavigationStore::new(i18n, HistoryLimits::default())
}

fn detail_entry(kind: DetailKind, id: u64) -> DetailHistoryEntry {
    DetailHistoryEntry {
        kind,
        id,
        title: format!("{} {}", kind, id),
        path: FlatRoutes::global().path_of(kind.route_key()).unwrap().to_string(),
        params: kind.params(id),
        timestamp: chrono::Utc::now(),
    }
}

/// Every flattened path resolves to its own route
#[test]
fn test_every_route_is_found_by_its_path() {
    let flat = FlatRoutes::flatten(nav_shell::routes::table()).unwrap();
    for route in flat.iter() {
        let found = flat.find_by_path(route.path).unwrap();
        assert_eq!(found.key, route.key);
        assert_eq!(flat.iter().filter(|r| r.path == route.path).count(), 1);
    }
}

/// Home breadcrumbs are exactly the home entry
#[test]
fn test_home_breadcrumbs() {
    assert_eq!(
        FlatRoutes::global().breadcrumbs("/"),
        vec![Breadcrumb {
            label_key: "nav.home".to_string(),
            path: "/".to_string(),
        }]
    );
}

/// Explore breadcrumbs follow path prefixes
#[test]
fn test_explore_breadcrumbs() {
    let crumbs = FlatRoutes::global().breadcrumbs("/explore/type");
    let keys: Vec<_> = crumbs.iter().map(|c| c.label_key.as_str()).collect();
    assert_eq!(keys, vec!["nav.home", "nav.explore", "nav.explore.type"]);
}

/// The same id twice leaves one entry at the front
#[test]
fn test_detail_history_dedup() {
    let mut store = store();
    store.add_detail_history(detail_entry(DetailKind::Type, 5));
    store.add_detail_history(detail_entry(DetailKind::Type, 5));

    assert_eq!(store.detail_ids(DetailKind::Type), vec![5]);
    assert_eq!(store.current_path(), "/");
}

/// A full trail evicts the least recently touched id
#[test]
fn test_detail_history_cap() {
    let mut store = store();
    let cap = store.limits().detail_cap(DetailKind::Faction);
    for id in 0..=cap as u64 {
        store.add_detail_history(detail_entry(DetailKind::Faction, id));
    }

    let ids = store.detail_ids(DetailKind::Faction);
    assert_eq!(ids.len(), cap);
    assert!(!ids.contains(&0));
    assert_eq!(ids[0], cap as u64);
}

/// Home is never logged in the general history
#[test]
fn test_general_history_excludes_home() {
    let mut store = store();
    store.add_general_history("/", "Home");
    store.add_general_history("/about", "About");

    let paths: Vec<_> = store.general_history().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/about"]);
}

/// Back at the start and forward at the end change nothing
#[test]
fn test_back_forward_at_the_ends() {
    let mut store = store();
    assert!(store.back().is_none());
    assert_eq!(store.current_path(), "/");

    store.navigate("/settings", None);
    assert!(store.forward().is_none());
    assert_eq!(store.current_path(), "/settings");
}

/// Opening a type detail page from home
#[test]
fn test_type_detail_end_to_end() {
    let mut store = store();
    store.navigate_with_params(TypeDetailParams { type_id: 587 }.into(), None);

    assert_eq!(store.current_path(), "/explore/type/detail");
    assert_eq!(
        store.route_params_at("/explore/type/detail"),
        Some(&RouteParams::TypeDetail(TypeDetailParams { type_id: 587 }))
    );
    assert!(store.general_history().any(|e| e.path == "/explore/type/detail"));
    assert!(store.can_go_back());

    let chrome = Chrome::derive(&store, store.routes());
    assert_eq!(chrome.title_key, "nav.explore.type.detail");
    assert_eq!(chrome.breadcrumbs.len(), 4);
}

/// Browsing the universe keeps separate trails per kind
#[test]
fn test_universe_browsing_session() {
    let mut store = store();
    store.navigate_to_region(10000002, Some("The Forge"));
    store.navigate_to_constellation(20000020, Some("Kimotoro"));
    store.navigate_to_system(30000142, Some("Jita"));
    store.navigate_to_npc_station(60003760, Some("Jita IV - Moon 4"));
    store.navigate_to_system(30000144, Some("Perimeter"));
    store.navigate_to_system(30000142, None);

    assert_eq!(store.detail_ids(DetailKind::System), vec![30000142, 30000144]);
    assert_eq!(store.detail_ids(DetailKind::Region), vec![10000002]);
    assert_eq!(store.route_params(RouteKey::UniverseSystem).unwrap().entity_id(), 30000142);

    // Default titles come from the catalog when none is given
    let latest = store.detail_history(DetailKind::System).next().unwrap();
    assert_eq!(latest.title, "Solar System");

    // Revisiting the current system was a refresh, so one step back is the station
    store.back();
    assert_eq!(store.current_path(), "/explore/universe/npc-station");
    store.navigate("/market", None);
    assert!(!store.can_go_forward());
}

/// The snapshot carries every trail as JSON
#[test]
fn test_snapshot_json() {
    let mut store = store();
    store.navigate_to_type(587, Some("Rifter"));
    store.navigate("/about", None);

    let json = serde_json::to_value(store.snapshot()).unwrap();
    assert_eq!(json["currentPath"], "/about");
    assert_eq!(json["generalHistory"][0]["path"], "/about");
    assert_eq!(json["generalHistory"][1]["title"], "Rifter");
    assert_eq!(json["generalHistory"][1]["params"]["params"]["typeId"], 587);
    assert_eq!(json["detailHistory"]["type"][0]["id"], 587);
}
