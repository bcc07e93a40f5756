//! Flattened route lookup and breadcrumb derivation

use super::{Route, RouteKey};
use anyhow::Result;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

pub const HOME_PATH: &str = "/";
pub const HOME_LABEL_KEY: &str = "nav.home";
pub const UNKNOWN_LABEL_KEY: &str = "nav.unknown";

static GLOBAL: Lazy<FlatRoutes<'static>> = Lazy::new(|| {
    FlatRoutes::flatten(super::table()).expect("built-in route table has unique keys and paths")
});

/// One step of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub label_key: String,
    pub path: String,
}

/// Depth-first flattening of a route tree, parents before children
#[derive(Debug)]
pub struct FlatRoutes<'a> {
    routes: Vec<&'a Route>,
    by_path: HashMap<&'a str, usize>,
    by_key: HashMap<RouteKey, usize>,
}

impl<'a> FlatRoutes<'a> {
    /// Flatten a route tree
    ///
    /// Returns an error if two routes share a key or a path.
    pub fn flatten(table: &'a [Route]) -> Result<Self> {
        let mut flat = Self {
            routes: Vec::new(),
            by_path: HashMap::new(),
            by_key: HashMap::new(),
        };

        for route in table {
            flat.add(route)?;
        }

        log::debug!("Flattened route table into {} routes", flat.routes.len());
        Ok(flat)
    }

    fn add(&mut self, route: &'a Route) -> Result<()> {
        let index = self.routes.len();

        if self.by_path.insert(route.path, index).is_some() {
            anyhow::bail!("Route path '{}' is declared more than once", route.path);
        }
        if self.by_key.insert(route.key, index).is_some() {
            anyhow::bail!("Route key '{}' is declared more than once", route.key);
        }

        self.routes.push(route);
        for child in &route.children {
            self.add(child)?;
        }
        Ok(())
    }

    /// Look up a route by exact path string
    pub fn find_by_path(&self, path: &str) -> Option<&'a Route> {
        self.by_path.get(path).map(|&index| self.routes[index])
    }

    /// Look up a route by key
    pub fn get(&self, key: RouteKey) -> Option<&'a Route> {
        self.by_key.get(&key).map(|&index| self.routes[index])
    }

    pub fn path_of(&self, key: RouteKey) -> Option<&'a str> {
        self.get(key).map(|route| route.path)
    }

    /// Label key for a path, or `nav.unknown` when no route matches
    pub fn title_key(&self, path: &str) -> &'a str {
        self.find_by_path(path)
            .map(|route| route.label_key)
            .unwrap_or(UNKNOWN_LABEL_KEY)
    }

    /// Derive the breadcrumb trail for a path
    ///
    /// Starts with home, then adds every cumulative `/segment` prefix that is a
    /// known route. Unknown prefixes are skipped without breaking the chain.
    pub fn breadcrumbs(&self, path: &str) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            label_key: HOME_LABEL_KEY.to_string(),
            path: HOME_PATH.to_string(),
        }];

        let mut prefix = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            prefix.push('/');
            prefix.push_str(segment);

            if let Some(route) = self.find_by_path(&prefix) {
                crumbs.push(Breadcrumb {
                    label_key: route.label_key.to_string(),
                    path: prefix.clone(),
                });
            }
        }

        crumbs
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Route> + '_ {
        self.routes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FlatRoutes<'static> {
    /// The flattened built-in route table, computed on first use
    pub fn global() -> &'static FlatRoutes<'static> {
        &GLOBAL
    }
}
