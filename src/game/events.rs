//! # Event Channel
//!
//! Typed publish/subscribe channel between the engine and its host.
//!
//! Every mutation publishes a [`GameEvent`]. Subscribers are invoked synchronously, in
//! subscription order, with the event and an owned [`GameSnapshot`] taken after the
//! mutation, so a host never needs a live reference into engine state.

use crate::game::{Entity, EntityId, GameSnapshot, PlayerId, Position, Terrain};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an entity came to change tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// The entity changed tiles
    Move,
    /// The entity attacked the target tile and stayed put
    Combat,
}

/// Kind of combat log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatKind {
    Attack,
    Retaliation,
    Death,
    /// One side lacked the stats to fight
    NoEffect,
}

/// One line of the combat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLog {
    pub kind: CombatKind,
    /// Entity dealing the damage (or, for deaths, the killer)
    pub attacker: EntityId,
    pub attacker_type: String,
    /// Entity receiving the damage (or, for deaths, the destroyed entity)
    pub defender: EntityId,
    pub defender_type: String,
    pub damage: i32,
}

impl fmt::Display for CombatLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CombatKind::Attack => write!(
                f,
                "{} attacked {} for {} damage",
                self.attacker_type, self.defender_type, self.damage
            ),
            CombatKind::Retaliation => write!(
                f,
                "{} retaliated against {} for {} damage",
                self.attacker_type, self.defender_type, self.damage
            ),
            CombatKind::Death => write!(
                f,
                "{} was destroyed by {}",
                self.defender_type, self.attacker_type
            ),
            CombatKind::NoEffect => write!(
                f,
                "{} could not fight {}",
                self.attacker_type, self.defender_type
            ),
        }
    }
}

/// Everything the engine announces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// The map was (re)generated
    GridGenerated { width: u32, height: u32, seed: u64 },
    /// A player's balance, income or tech set changed
    EconomyUpdated {
        owner: PlayerId,
        stars: u32,
        income: u32,
        unlocked_techs: Vec<String>,
    },
    /// Control passed to `owner`
    TurnChanged { turn: u32, owner: PlayerId },
    /// At least one tile changed visibility
    FogUpdated { changed: usize },
    /// An entity moved or attacked
    EntityMoved {
        entity_id: EntityId,
        from: Position,
        to: Position,
        kind: MoveKind,
    },
    /// An entity was created
    EntitySpawned {
        entity_id: EntityId,
        type_key: String,
        position: Position,
        owner: PlayerId,
    },
    /// A city's owner, queue, buildings or stats changed
    CityUpdated { city: Entity },
    /// A tile's terrain, improvement or owner changed
    TileUpdated {
        position: Position,
        terrain: Terrain,
        improvement: Option<String>,
        owner: Option<PlayerId>,
    },
    /// A combat log line
    CombatLogged(CombatLog),
}

impl GameEvent {
    /// Topic this event is published on.
    pub fn topic(&self) -> EventTopic {
        match self {
            GameEvent::GridGenerated { .. } => EventTopic::GridGenerated,
            GameEvent::EconomyUpdated { .. } => EventTopic::EconomyUpdated,
            GameEvent::TurnChanged { .. } => EventTopic::TurnChanged,
            GameEvent::FogUpdated { .. } => EventTopic::FogUpdated,
            GameEvent::EntityMoved { .. } => EventTopic::EntityMoved,
            GameEvent::EntitySpawned { .. } => EventTopic::EntitySpawned,
            GameEvent::CityUpdated { .. } => EventTopic::CityUpdated,
            GameEvent::TileUpdated { .. } => EventTopic::TileUpdated,
            GameEvent::CombatLogged(_) => EventTopic::CombatLogged,
        }
    }
}

/// Named topics a subscriber can listen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTopic {
    GridGenerated,
    EconomyUpdated,
    TurnChanged,
    FogUpdated,
    EntityMoved,
    EntitySpawned,
    CityUpdated,
    TileUpdated,
    CombatLogged,
}

/// Handle returned by a subscription, used to unsubscribe.
pub type SubscriptionId = u64;

/// Subscriber callback.
pub type EventCallback = Box<dyn FnMut(&GameEvent, &GameSnapshot)>;

struct Subscription {
    id: SubscriptionId,
    /// `None` listens on every topic
    topic: Option<EventTopic>,
    callback: EventCallback,
}

/// Synchronous, in-order dispatcher.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: SubscriptionId,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to one topic.
    pub fn subscribe(&mut self, topic: EventTopic, callback: EventCallback) -> SubscriptionId {
        self.add(Some(topic), callback)
    }

    /// Subscribes to every topic.
    pub fn subscribe_all(&mut self, callback: EventCallback) -> SubscriptionId {
        self.add(None, callback)
    }

    fn add(&mut self, topic: Option<EventTopic>, callback: EventCallback) -> SubscriptionId {
        self.next_id += 1;
        let id = self.next_id;
        self.subscriptions.push(Subscription {
            id,
            topic,
            callback,
        });
        id
    }

    /// Removes a subscription. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    /// Whether anyone would receive an event on `topic`.
    pub fn has_subscribers(&self, topic: EventTopic) -> bool {
        self.subscriptions
            .iter()
            .any(|sub| sub.topic.map(|t| t == topic).unwrap_or(true))
    }

    /// Delivers `event` to every matching subscriber in subscription order.
    pub fn dispatch(&mut self, event: &GameEvent, snapshot: &GameSnapshot) {
        let topic = event.topic();
        for sub in self.subscriptions.iter_mut() {
            if sub.topic.map(|t| t == topic).unwrap_or(true) {
                (sub.callback)(event, snapshot);
            }
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether there are no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
