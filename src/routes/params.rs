//! Typed route parameters
//!
//! Every parameterized route takes exactly one entity identifier. Instead of a
//! free-form map keyed by path strings, parameters are a closed sum type: each
//! variant belongs to one [`RouteKey`] and carries its own record.

use super::RouteKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw identifier of a browsable entity (type, faction, solar system, ...)
pub type EntityId = u64;

/// Logical kind of a "thing viewed" in a detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailKind {
    Type,
    Faction,
    NpcCorporation,
    Region,
    Constellation,
    System,
    Planet,
    Moon,
    NpcStation,
}

impl DetailKind {
    pub const ALL: [DetailKind; 9] = [
        DetailKind::Type,
        DetailKind::Faction,
        DetailKind::NpcCorporation,
        DetailKind::Region,
        DetailKind::Constellation,
        DetailKind::System,
        DetailKind::Planet,
        DetailKind::Moon,
        DetailKind::NpcStation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailKind::Type => "type",
            DetailKind::Faction => "faction",
            DetailKind::NpcCorporation => "npc-corporation",
            DetailKind::Region => "region",
            DetailKind::Constellation => "constellation",
            DetailKind::System => "system",
            DetailKind::Planet => "planet",
            DetailKind::Moon => "moon",
            DetailKind::NpcStation => "npc-station",
        }
    }

    /// Detail route that renders this kind
    pub fn route_key(&self) -> RouteKey {
        match self {
            DetailKind::Type => RouteKey::ExploreTypeDetail,
            DetailKind::Faction => RouteKey::ExploreFactionDetail,
            DetailKind::NpcCorporation => RouteKey::ExploreNpcCorporationDetail,
            DetailKind::Region => RouteKey::UniverseRegion,
            DetailKind::Constellation => RouteKey::UniverseConstellation,
            DetailKind::System => RouteKey::UniverseSystem,
            DetailKind::Planet => RouteKey::UniversePlanet,
            DetailKind::Moon => RouteKey::UniverseMoon,
            DetailKind::NpcStation => RouteKey::UniverseNpcStation,
        }
    }

    /// Localization key of the default detail page title
    pub fn title_key(&self) -> &'static str {
        match self {
            DetailKind::Type => "explore.type.detail.title",
            DetailKind::Faction => "explore.faction.detail.title",
            DetailKind::NpcCorporation => "explore.npc_corporation.detail.title",
            DetailKind::Region => "explore.universe.region.title",
            DetailKind::Constellation => "explore.universe.constellation.title",
            DetailKind::System => "explore.universe.system.title",
            DetailKind::Planet => "explore.universe.planet.title",
            DetailKind::Moon => "explore.universe.moon.title",
            DetailKind::NpcStation => "explore.universe.npc_station.title",
        }
    }

    /// Literal title used while localization is not ready yet
    pub fn fallback_title(&self) -> &'static str {
        match self {
            DetailKind::Type => "Type Detail",
            DetailKind::Faction => "Faction Detail",
            DetailKind::NpcCorporation => "NPC Corporation Detail",
            DetailKind::Region => "Region",
            DetailKind::Constellation => "Constellation",
            DetailKind::System => "Solar System",
            DetailKind::Planet => "Planet",
            DetailKind::Moon => "Moon",
            DetailKind::NpcStation => "NPC Station",
        }
    }

    /// Name of the identifier field in this kind's parameter record
    pub fn param_field(&self) -> &'static str {
        match self {
            DetailKind::Type => "typeId",
            DetailKind::Faction => "factionId",
            DetailKind::NpcCorporation => "corporationId",
            _ => "id",
        }
    }

    /// Whether this kind belongs to the generic type/faction explorers
    ///
    /// Those keep a shorter trail than the specialized detail kinds.
    pub fn is_explore_kind(&self) -> bool {
        matches!(self, DetailKind::Type | DetailKind::Faction)
    }

    /// Build the parameter record of this kind for an entity id
    pub fn params(&self, id: EntityId) -> RouteParams {
        match self {
            DetailKind::Type => RouteParams::TypeDetail(TypeDetailParams { type_id: id }),
            DetailKind::Faction => RouteParams::FactionDetail(FactionDetailParams { faction_id: id }),
            DetailKind::NpcCorporation => {
                RouteParams::NpcCorporationDetail(NpcCorporationDetailParams { corporation_id: id })
            }
            DetailKind::Region => RouteParams::Region(UniverseObjectParams { id }),
            DetailKind::Constellation => RouteParams::Constellation(UniverseObjectParams { id }),
            DetailKind::System => RouteParams::System(UniverseObjectParams { id }),
            DetailKind::Planet => RouteParams::Planet(UniverseObjectParams { id }),
            DetailKind::Moon => RouteParams::Moon(UniverseObjectParams { id }),
            DetailKind::NpcStation => RouteParams::NpcStation(UniverseObjectParams { id }),
        }
    }
}

impl fmt::Display for DetailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetailKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetailKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown detail kind '{}'", s))
    }
}

/// Shape of the parameters a route accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSchema {
    pub kind: DetailKind,
    pub field: &'static str,
}

impl ParamSchema {
    pub const fn entity(kind: DetailKind, field: &'static str) -> Self {
        Self { kind, field }
    }

    /// Check that a parameter record has this schema's shape
    pub fn accepts(&self, params: &RouteParams) -> bool {
        params.kind() == self.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDetailParams {
    pub type_id: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionDetailParams {
    pub faction_id: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcCorporationDetailParams {
    pub corporation_id: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniverseObjectParams {
    pub id: EntityId,
}

/// Last-seen parameters of one parameterized route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "route", content = "params", rename_all = "kebab-case")]
pub enum RouteParams {
    TypeDetail(TypeDetailParams),
    FactionDetail(FactionDetailParams),
    NpcCorporationDetail(NpcCorporationDetailParams),
    Region(UniverseObjectParams),
    Constellation(UniverseObjectParams),
    System(UniverseObjectParams),
    Planet(UniverseObjectParams),
    Moon(UniverseObjectParams),
    NpcStation(UniverseObjectParams),
}

impl RouteParams {
    pub fn kind(&self) -> DetailKind {
        match self {
            RouteParams::TypeDetail(_) => DetailKind::Type,
            RouteParams::FactionDetail(_) => DetailKind::Faction,
            RouteParams::NpcCorporationDetail(_) => DetailKind::NpcCorporation,
            RouteParams::Region(_) => DetailKind::Region,
            RouteParams::Constellation(_) => DetailKind::Constellation,
            RouteParams::System(_) => DetailKind::System,
            RouteParams::Planet(_) => DetailKind::Planet,
            RouteParams::Moon(_) => DetailKind::Moon,
            RouteParams::NpcStation(_) => DetailKind::NpcStation,
        }
    }

    /// Route these parameters belong to
    pub fn route_key(&self) -> RouteKey {
        self.kind().route_key()
    }

    pub fn entity_id(&self) -> EntityId {
        match self {
            RouteParams::TypeDetail(p) => p.type_id,
            RouteParams::FactionDetail(p) => p.faction_id,
            RouteParams::NpcCorporationDetail(p) => p.corporation_id,
            RouteParams::Region(p)
            | RouteParams::Constellation(p)
            | RouteParams::System(p)
            | RouteParams::Planet(p)
            | RouteParams::Moon(p)
            | RouteParams::NpcStation(p) => p.id,
        }
    }
}

impl From<TypeDetailParams> for RouteParams {
    fn from(params: TypeDetailParams) -> Self {
        RouteParams::TypeDetail(params)
    }
}

impl From<FactionDetailParams> for RouteParams {
    fn from(params: FactionDetailParams) -> Self {
        RouteParams::FactionDetail(params)
    }
}

impl From<NpcCorporationDetailParams> for RouteParams {
    fn from(params: NpcCorporationDetailParams) -> Self {
        RouteParams::NpcCorporationDetail(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_params() {
        for kind in DetailKind::ALL {
            let params = kind.params(42);
            assert_eq!(params.kind(), kind);
            assert_eq!(params.entity_id(), 42);
            assert_eq!(params.route_key(), kind.route_key());
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("npc-station".parse::<DetailKind>().unwrap(), DetailKind::NpcStation);
        assert!("galaxy".parse::<DetailKind>().is_err());
    }

    #[test]
    fn test_params_json_shape() {
        let params = RouteParams::from(TypeDetailParams { type_id: 587 });
        let json = serde_json::to_value(params).unwrap();
        assert_eq!(json["route"], "type-detail");
        assert_eq!(json["params"]["typeId"], 587);
    }

    #[test]
    fn test_schema_accepts_matching_kind_only() {
        let schema = ParamSchema::entity(DetailKind::System, "id");
        assert!(schema.accepts(&DetailKind::System.params(30000142)));
        assert!(!schema.accepts(&DetailKind::Region.params(10000002)));
    }
}
