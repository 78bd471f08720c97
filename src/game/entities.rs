//! # Entity System
//!
//! Units and cities, described by a closed set of optional capability components.
//!
//! Game logic asks an entity what it can do ("does it have Movement? is it Flying?")
//! rather than what it is. The type key only links an entity back to its static
//! definition.

use crate::config;
use crate::game::{new_entity_id, EntityId, PlayerId, Position};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    /// Full health with the given maximum.
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }
}

/// Offensive capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub damage: i32,
    pub range: i32,
}

/// Damage reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defense {
    pub value: i32,
}

/// Steps per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub range: u32,
}

/// Sight radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vision {
    pub range: u32,
}

/// Price in stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub stars: u32,
}

/// Growth counters carried by cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityStats {
    pub level: u32,
    pub population: u32,
}

impl Default for CityStats {
    fn default() -> Self {
        Self {
            level: 1,
            population: 0,
        }
    }
}

/// The capability records an entity may carry. Absent means "cannot".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Components {
    pub health: Option<Health>,
    pub attack: Option<Attack>,
    pub defense: Option<Defense>,
    pub movement: Option<Movement>,
    pub vision: Option<Vision>,
    pub cost: Option<Cost>,
    pub city_stats: Option<CityStats>,
    /// Marker: ignores Water/Mountain and may change layers anywhere
    pub flying: bool,
}

impl Components {
    /// Star cost, zero when the Cost component is absent.
    pub fn cost_stars(&self) -> u32 {
        self.cost.map(|cost| cost.stars).unwrap_or(0)
    }
}

/// Whether a production order builds a unit or a city building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionKind {
    Unit,
    Building,
}

/// One order in a city's production queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionItem {
    pub id: Uuid,
    pub key: String,
    pub kind: ProductionKind,
    pub turns_remaining: u32,
    pub total_turns: u32,
}

impl ProductionItem {
    /// Creates an order with the standard lead time.
    pub fn new(key: impl Into<String>, kind: ProductionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            kind,
            turns_remaining: config::PRODUCTION_LEAD_TURNS,
            total_turns: config::PRODUCTION_LEAD_TURNS,
        }
    }
}

/// State only cities have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityData {
    pub name: String,
    pub production_queue: Vec<ProductionItem>,
    pub buildings: Vec<String>,
}

impl CityData {
    /// A freshly founded city with nothing built or queued.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            production_queue: Vec::new(),
            buildings: Vec::new(),
        }
    }

    /// Whether `building` is already constructed or waiting in the queue.
    pub fn has_or_queued(&self, building: &str) -> bool {
        self.buildings.iter().any(|b| b == building)
            || self
                .production_queue
                .iter()
                .any(|item| item.kind == ProductionKind::Building && item.key == building)
    }
}

/// A unit or a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Key of the static definition this entity was built from
    pub type_key: String,
    pub position: Position,
    pub owner: PlayerId,
    pub components: Components,
    /// Set once the entity has moved or attacked this turn
    pub has_acted: bool,
    /// Present exactly when this entity is a city
    pub city: Option<CityData>,
}

impl Entity {
    /// Creates a unit from its components.
    pub fn unit(
        type_key: impl Into<String>,
        position: Position,
        owner: PlayerId,
        components: Components,
    ) -> Self {
        Self {
            id: new_entity_id(),
            type_key: type_key.into(),
            position,
            owner,
            components,
            has_acted: false,
            city: None,
        }
    }

    /// Creates a city from its components.
    pub fn city(
        type_key: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        owner: PlayerId,
        mut components: Components,
    ) -> Self {
        if components.city_stats.is_none() {
            components.city_stats = Some(CityStats::default());
        }
        Self {
            city: Some(CityData::new(name)),
            ..Self::unit(type_key, position, owner, components)
        }
    }

    /// Whether this entity is a city.
    pub fn is_city(&self) -> bool {
        self.city.is_some()
    }

    /// Whether this entity still has hit points. Entities without Health never die.
    pub fn is_alive(&self) -> bool {
        self.components
            .health
            .map(|health| health.current > 0)
            .unwrap_or(true)
    }

    /// Whether this entity ignores terrain and layer restrictions.
    pub fn can_fly(&self) -> bool {
        self.components.flying
    }

    /// Sight radius, falling back to the city/unit default.
    pub fn vision_range(&self) -> u32 {
        match self.components.vision {
            Some(vision) => vision.range,
            None if self.is_city() => config::DEFAULT_CITY_VISION,
            None => config::DEFAULT_UNIT_VISION,
        }
    }

    /// Raw defense value, zero without a Defense component.
    pub fn defense_value(&self) -> i32 {
        self.components
            .defense
            .map(|defense| defense.value)
            .unwrap_or(0)
    }

    /// City level, zero for units.
    pub fn level(&self) -> u32 {
        self.components
            .city_stats
            .map(|stats| stats.level)
            .unwrap_or(0)
    }

    /// Whether this city has `building` constructed.
    pub fn has_building(&self, building: &str) -> bool {
        self.city
            .as_ref()
            .map(|city| city.buildings.iter().any(|b| b == building))
            .unwrap_or(false)
    }
}
