//! # Rules Module
//!
//! Static definitions the engine reads but never mutates: units, technologies, tile
//! improvements and city buildings, plus optional nation presets.
//!
//! A [`RuleSet`] is normally loaded by the host from JSON; [`RuleSet::default`] carries
//! the stock unit roster, tech tree, improvements and buildings.

pub mod nation;

pub use nation::*;

use crate::game::{
    Attack, CityStats, Components, Cost, Defense, Entity, Health, Movement, Terrain, Vision,
};
use crate::{config, WhiteboxError, WhiteboxResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition key every rule set must provide for cities.
pub const CITY_KEY: &str = "city";

/// Unit the scripted opponent produces.
pub const BASIC_UNIT_KEY: &str = "warrior";

/// Improvement that opens a vertical passage between layers.
pub const BEANSTALK_KEY: &str = "beanstalk";

/// Building that grants the wall defense bonus.
pub const WALL_KEY: &str = "wall";

/// Technology that lets ground units enter mountains.
pub const CLIMBING_TECH: &str = "climb";

/// Static definition of a unit type (cities included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub name: String,
    #[serde(default)]
    pub components: Components,
}

/// Static definition of a technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechDefinition {
    pub id: String,
    pub name: String,
    pub cost: u32,
    #[serde(default)]
    pub prerequisite: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Static definition of a tile improvement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementDefinition {
    pub id: String,
    pub name: String,
    pub cost: u32,
    #[serde(default)]
    pub tech_required: Option<String>,
    pub valid_terrain: Vec<Terrain>,
    #[serde(default)]
    pub population_bonus: u32,
}

/// Effects of a city building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingStats {
    /// Stars per turn
    pub income: u32,
    /// Bonus defense for the city
    pub defense: i32,
    /// One-time population boost on completion
    pub population: u32,
    /// Vision range bonus
    pub vision: u32,
}

/// Static definition of a city building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDefinition {
    pub id: String,
    pub name: String,
    pub cost: u32,
    #[serde(default)]
    pub tech_required: Option<String>,
    #[serde(default)]
    pub stats: BuildingStats,
}

/// The complete set of static definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub units: HashMap<String, UnitDefinition>,
    #[serde(default)]
    pub techs: HashMap<String, TechDefinition>,
    #[serde(default)]
    pub improvements: HashMap<String, ImprovementDefinition>,
    #[serde(default)]
    pub buildings: HashMap<String, BuildingDefinition>,
}

impl RuleSet {
    /// Parses a rule set from JSON and checks it can drive a session.
    ///
    /// # Examples
    ///
    /// ```
    /// use whitebox::RuleSet;
    ///
    /// let rules = RuleSet::from_json(r#"{ "units": { "city": { "name": "City" } } }"#).unwrap();
    /// assert!(rules.unit("city").is_some());
    /// assert!(RuleSet::from_json(r#"{ "units": {} }"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> WhiteboxResult<Self> {
        let rules: RuleSet = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> WhiteboxResult<()> {
        if !self.units.contains_key(CITY_KEY) {
            return Err(WhiteboxError::InvalidConfig(format!(
                "rule set has no '{}' unit definition",
                CITY_KEY
            )));
        }
        for tech in self.techs.values() {
            if let Some(prerequisite) = &tech.prerequisite {
                if !self.techs.contains_key(prerequisite) {
                    return Err(WhiteboxError::InvalidConfig(format!(
                        "tech '{}' requires unknown tech '{}'",
                        tech.id, prerequisite
                    )));
                }
            }
        }
        Ok(())
    }

    /// Looks up a unit definition.
    pub fn unit(&self, key: &str) -> Option<&UnitDefinition> {
        self.units.get(key)
    }

    /// Looks up a technology.
    pub fn tech(&self, id: &str) -> Option<&TechDefinition> {
        self.techs.get(id)
    }

    /// Looks up an improvement.
    pub fn improvement(&self, id: &str) -> Option<&ImprovementDefinition> {
        self.improvements.get(id)
    }

    /// Looks up a building.
    pub fn building(&self, id: &str) -> Option<&BuildingDefinition> {
        self.buildings.get(id)
    }

    /// Combined effects of every building `city` has constructed. All zero for units.
    ///
    /// Unknown building ids contribute nothing.
    pub fn building_bonus(&self, city: &Entity) -> BuildingStats {
        city.city
            .iter()
            .flat_map(|data| data.buildings.iter())
            .filter_map(|id| self.building(id))
            .fold(BuildingStats::default(), |total, def| BuildingStats {
                income: total.income + def.stats.income,
                defense: total.defense + def.stats.defense,
                population: total.population + def.stats.population,
                vision: total.vision + def.stats.vision,
            })
    }

    /// Star cost of a unit type, if it exists.
    pub fn unit_cost(&self, key: &str) -> Option<u32> {
        self.unit(key).map(|def| def.components.cost_stars())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        let units = [
            (
                CITY_KEY,
                "City",
                Components {
                    city_stats: Some(CityStats::default()),
                    vision: Some(Vision { range: 2 }),
                    defense: Some(Defense { value: 1 }),
                    ..Components::default()
                },
            ),
            ("warrior", "Warrior", soldier(10, 1, 3, 1, 2, 1, Some(2))),
            ("rider", "Rider", soldier(10, 2, 2, 1, 1, 1, Some(3))),
            ("giant", "Giant", soldier(40, 1, 5, 1, 4, 1, None)),
            (
                "dragon",
                "Dragon",
                Components {
                    flying: true,
                    ..soldier(20, 3, 6, 2, 3, 3, Some(8))
                },
            ),
        ]
        .into_iter()
        .map(|(key, name, components)| {
            (
                key.to_string(),
                UnitDefinition {
                    name: name.to_string(),
                    components,
                },
            )
        })
        .collect();

        let techs = [
            ("org", "Organization", 5, None),
            ("shields", "Shields", 7, Some("org")),
            ("farming", "Farming", 9, Some("org")),
            ("trade", "Trade", 12, Some("farming")),
            (CLIMBING_TECH, "Climbing", 5, None),
            ("mining", "Mining", 7, Some(CLIMBING_TECH)),
            ("smithery", "Smithery", 9, Some("mining")),
            ("aero", "Aeronautics", 15, Some("smithery")),
            ("hunt", "Hunting", 5, None),
            ("archery", "Archery", 7, Some("hunt")),
            ("forestry", "Forestry", 7, Some("hunt")),
            ("fish", "Fishing", 5, None),
            ("sailing", "Sailing", 7, Some("fish")),
        ]
        .into_iter()
        .map(|(id, name, cost, prerequisite)| {
            (
                id.to_string(),
                TechDefinition {
                    id: id.to_string(),
                    name: name.to_string(),
                    cost,
                    prerequisite: prerequisite.map(str::to_string),
                    description: None,
                },
            )
        })
        .collect();

        let improvements = [
            ("farm", "Farm", 5, "farming", Terrain::Ground, 2),
            ("mine", "Mine", 5, "mining", Terrain::Mountain, 2),
            ("lumber_hut", "Lumber Hut", 2, "forestry", Terrain::Ground, 1),
            (BEANSTALK_KEY, "Beanstalk", 5, "farming", Terrain::Ground, 0),
        ]
        .into_iter()
        .map(|(id, name, cost, tech, terrain, population_bonus)| {
            (
                id.to_string(),
                ImprovementDefinition {
                    id: id.to_string(),
                    name: name.to_string(),
                    cost,
                    tech_required: Some(tech.to_string()),
                    valid_terrain: vec![terrain],
                    population_bonus,
                },
            )
        })
        .collect();

        let buildings = [
            ("market", "Market", 10, "org", BuildingStats { income: 2, ..BuildingStats::default() }),
            (WALL_KEY, "City Wall", 5, "shields", BuildingStats { defense: config::WALL_DEFENSE_BONUS, ..BuildingStats::default() }),
            ("library", "Library", 15, "trade", BuildingStats { income: 3, ..BuildingStats::default() }),
            ("skyport", "Skyport", 20, "aero", BuildingStats { population: 2, ..BuildingStats::default() }),
        ]
        .into_iter()
        .map(|(id, name, cost, tech, stats)| {
            (
                id.to_string(),
                BuildingDefinition {
                    id: id.to_string(),
                    name: name.to_string(),
                    cost,
                    tech_required: Some(tech.to_string()),
                    stats,
                },
            )
        })
        .collect();

        Self {
            units,
            techs,
            improvements,
            buildings,
        }
    }
}

/// Components shared by every combat unit of the default rules.
fn soldier(
    health: i32,
    movement: u32,
    damage: i32,
    attack_range: i32,
    defense: i32,
    vision: u32,
    cost: Option<u32>,
) -> Components {
    Components {
        health: Some(Health::full(health)),
        movement: Some(Movement { range: movement }),
        attack: Some(Attack {
            damage,
            range: attack_range,
        }),
        defense: Some(Defense { value: defense }),
        vision: Some(Vision { range: vision }),
        cost: cost.map(|stars| Cost { stars }),
        ..Components::default()
    }
}
