//! Static route table
//!
//! Routes are compiled-in data: a tree of nodes, each with a unique key and a
//! unique absolute path. The tree only groups routes for navigation menus;
//! lookups and breadcrumbs work on the flattened list (see [`resolver`]).

pub mod params;
pub mod resolver;

pub use params::{
    DetailKind, EntityId, FactionDetailParams, NpcCorporationDetailParams, ParamSchema,
    RouteParams, TypeDetailParams, UniverseObjectParams,
};
pub use resolver::{Breadcrumb, FlatRoutes, HOME_LABEL_KEY, HOME_PATH, UNKNOWN_LABEL_KEY};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for each route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKey {
    Home,
    Market,
    MarketAnalysis,
    MarketOrders,
    MarketHistory,
    MarketCalculator,
    MarketPredictor,
    Industry,
    IndustryManufacturing,
    IndustryMining,
    IndustryResearch,
    Character,
    CharacterSkills,
    CharacterAssets,
    CharacterWallet,
    Database,
    Explore,
    ExploreType,
    ExploreTypeDetail,
    ExploreFaction,
    ExploreFactionDetail,
    ExploreNpcCorporation,
    ExploreNpcCorporationDetail,
    ExploreUniverse,
    UniverseRegion,
    UniverseConstellation,
    UniverseSystem,
    UniversePlanet,
    UniverseMoon,
    UniverseNpcStation,
    ExploreLocalization,
    Bundle,
    Settings,
    About,
}

impl RouteKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKey::Home => "home",
            RouteKey::Market => "market",
            RouteKey::MarketAnalysis => "market-analysis",
            RouteKey::MarketOrders => "market-orders",
            RouteKey::MarketHistory => "market-history",
            RouteKey::MarketCalculator => "market-calculator",
            RouteKey::MarketPredictor => "market-predictor",
            RouteKey::Industry => "industry",
            RouteKey::IndustryManufacturing => "industry-manufacturing",
            RouteKey::IndustryMining => "industry-mining",
            RouteKey::IndustryResearch => "industry-research",
            RouteKey::Character => "character",
            RouteKey::CharacterSkills => "character-skills",
            RouteKey::CharacterAssets => "character-assets",
            RouteKey::CharacterWallet => "character-wallet",
            RouteKey::Database => "database",
            RouteKey::Explore => "explore",
            RouteKey::ExploreType => "explore-type",
            RouteKey::ExploreTypeDetail => "explore-type-detail",
            RouteKey::ExploreFaction => "explore-faction",
            RouteKey::ExploreFactionDetail => "explore-faction-detail",
            RouteKey::ExploreNpcCorporation => "explore-npc-corporation",
            RouteKey::ExploreNpcCorporationDetail => "explore-npc-corporation-detail",
            RouteKey::ExploreUniverse => "explore-universe",
            RouteKey::UniverseRegion => "universe-region",
            RouteKey::UniverseConstellation => "universe-constellation",
            RouteKey::UniverseSystem => "universe-system",
            RouteKey::UniversePlanet => "universe-planet",
            RouteKey::UniverseMoon => "universe-moon",
            RouteKey::UniverseNpcStation => "universe-npc-station",
            RouteKey::ExploreLocalization => "explore-localization",
            RouteKey::Bundle => "bundle",
            RouteKey::Settings => "settings",
            RouteKey::About => "about",
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the route tree
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub key: RouteKey,
    pub path: &'static str,
    /// Localization key, never a display string
    pub label_key: &'static str,
    /// Page rendered for this route; `None` marks a pure grouping node
    pub component: Option<&'static str>,
    pub icon: Option<&'static str>,
    pub param_schema: Option<ParamSchema>,
    pub disabled: bool,
    pub children: Vec<Route>,
}

impl Route {
    /// A route that renders a page
    pub fn page(key: RouteKey, path: &'static str, label_key: &'static str, component: &'static str) -> Self {
        Self {
            key,
            path,
            label_key,
            component: Some(component),
            icon: None,
            param_schema: None,
            disabled: false,
            children: Vec::new(),
        }
    }

    /// A grouping node with no content of its own
    pub fn group(key: RouteKey, path: &'static str, label_key: &'static str) -> Self {
        Self {
            component: None,
            ..Self::page(key, path, label_key, "")
        }
    }

    pub fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Declare the entity parameter this route accepts
    pub fn params(mut self, kind: DetailKind) -> Self {
        self.param_schema = Some(ParamSchema::entity(kind, kind.param_field()));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }

    /// Whether navigating here renders content (grouping and disabled nodes don't)
    pub fn is_navigable(&self) -> bool {
        self.component.is_some() && !self.disabled
    }
}

static ROUTES: Lazy<Vec<Route>> = Lazy::new(build_routes);

/// The application's route tree
pub fn table() -> &'static [Route] {
    &ROUTES
}

fn build_routes() -> Vec<Route> {
    use RouteKey::*;

    vec![
        Route::page(Home, "/", "nav.home", "HomePage").icon("home"),
        Route::page(Market, "/market", "nav.market", "MarketAnalysisPage")
            .icon("trending")
            .children(vec![
                Route::page(MarketAnalysis, "/market/analysis", "nav.market.analysis", "MarketAnalysisPage"),
                Route::page(MarketOrders, "/market/orders", "nav.market.orders", "MarketOrdersPage"),
                Route::page(MarketHistory, "/market/history", "nav.market.history", "MarketHistoryPage"),
                Route::page(
                    MarketCalculator,
                    "/market/tools/calculator",
                    "nav.market.tools.calculator",
                    "MarketCalculatorPage",
                ),
                Route::page(
                    MarketPredictor,
                    "/market/tools/predictor",
                    "nav.market.tools.predictor",
                    "MarketPredictorPage",
                ),
            ]),
        Route::page(Industry, "/industry", "nav.industry", "IndustryManufacturingPage")
            .icon("factory")
            .children(vec![
                Route::page(
                    IndustryManufacturing,
                    "/industry/manufacturing",
                    "nav.industry.manufacturing",
                    "IndustryManufacturingPage",
                ),
                Route::page(IndustryMining, "/industry/mining", "nav.industry.mining", "IndustryMiningPage"),
                Route::page(IndustryResearch, "/industry/research", "nav.industry.research", "IndustryResearchPage"),
            ]),
        Route::group(Character, "/character", "nav.character")
            .icon("users")
            .children(vec![
                Route::page(CharacterSkills, "/character/skills", "nav.character.skills", "CharacterSkillsPage"),
                Route::page(CharacterAssets, "/character/assets", "nav.character.assets", "CharacterAssetsPage"),
                Route::page(CharacterWallet, "/character/wallet", "nav.character.wallet", "CharacterWalletPage"),
            ]),
        Route::page(Database, "/database", "nav.database", "DatabasePage").icon("database"),
        Route::page(Explore, "/explore", "nav.explore", "ExplorePage")
            .icon("compass")
            .children(vec![
                Route::page(ExploreType, "/explore/type", "nav.explore.type", "TypeExplorePage").children(vec![
                    Route::page(ExploreTypeDetail, "/explore/type/detail", "nav.explore.type.detail", "TypeDetailPage")
                        .params(DetailKind::Type),
                ]),
                Route::page(ExploreFaction, "/explore/faction", "nav.explore.faction", "FactionExplorePage")
                    .children(vec![
                        Route::page(
                            ExploreFactionDetail,
                            "/explore/faction/detail",
                            "nav.explore.faction.detail",
                            "FactionDetailPage",
                        )
                        .params(DetailKind::Faction),
                    ]),
                Route::group(ExploreNpcCorporation, "/explore/npc-corporation", "nav.explore.npc_corporation")
                    .children(vec![
                        Route::page(
                            ExploreNpcCorporationDetail,
                            "/explore/npc-corporation/detail",
                            "nav.explore.npc_corporation.detail",
                            "NpcCorporationDetailPage",
                        )
                        .params(DetailKind::NpcCorporation),
                    ]),
                Route::page(ExploreUniverse, "/explore/universe", "nav.explore.universe", "UniverseExplorePage")
                    .children(vec![
                        Route::page(UniverseRegion, "/explore/universe/region", "nav.explore.universe.region", "RegionDetail")
                            .params(DetailKind::Region),
                        Route::page(
                            UniverseConstellation,
                            "/explore/universe/constellation",
                            "nav.explore.universe.constellation",
                            "ConstellationDetail",
                        )
                        .params(DetailKind::Constellation),
                        Route::page(UniverseSystem, "/explore/universe/system", "nav.explore.universe.system", "SystemDetail")
                            .params(DetailKind::System),
                        Route::page(UniversePlanet, "/explore/universe/planet", "nav.explore.universe.planet", "PlanetDetail")
                            .params(DetailKind::Planet),
                        Route::page(UniverseMoon, "/explore/universe/moon", "nav.explore.universe.moon", "MoonDetail")
                            .params(DetailKind::Moon),
                        Route::page(
                            UniverseNpcStation,
                            "/explore/universe/npc-station",
                            "nav.explore.universe.npc_station",
                            "NpcStationDetail",
                        )
                        .params(DetailKind::NpcStation),
                    ]),
                Route::page(
                    ExploreLocalization,
                    "/explore/localization",
                    "nav.explore.localization",
                    "LocalizationExplorePage",
                ),
            ]),
        Route::page(Bundle, "/bundle", "nav.bundle", "BundlePage").icon("archive"),
        Route::page(Settings, "/settings", "nav.settings", "SettingsPage").icon("settings"),
        Route::page(About, "/about", "nav.about", "AboutPage").icon("info"),
    ]
}
