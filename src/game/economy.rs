//! # Economy & Production
//!
//! Income, city production queues, tile improvements and city growth.

use crate::config;
use crate::game::{EntityId, GameState, PlayerId, Position, ProductionItem, ProductionKind};

impl GameState {
    /// Recomputes and stores `owner`'s income: base plus city levels plus building income.
    pub fn calculate_income(&mut self, owner: PlayerId) -> u32 {
        let rules = &self.config.rules;
        let income = self
            .cities_of(owner)
            .map(|city| city.level() + rules.building_bonus(city).income)
            .sum::<u32>()
            + config::BASE_INCOME;

        self.player_state_mut(owner).income = income;
        income
    }

    /// Recomputes income and credits it to `owner`.
    pub fn process_economy(&mut self, owner: PlayerId) {
        let income = self.calculate_income(owner);
        let player = self.player_state_mut(owner);
        player.stars += income;
        log::debug!("{} earned {} stars, now {}", owner, income, player.stars);
        self.publish_economy(owner);
    }

    /// Queues a unit or building in a city, paying for it up front.
    ///
    /// Fails for unknown cities or items, a building that is already built or queued, a
    /// building whose tech is missing, an unaffordable cost, or a human city outside the
    /// human's turn.
    pub fn enqueue_production(&mut self, city_id: EntityId, key: &str, kind: ProductionKind) -> bool {
        let Some(city) = self.entity(city_id) else {
            return false;
        };
        let Some(data) = city.city.as_ref() else {
            return false;
        };
        let owner = city.owner;
        if owner.is_human() && !self.active_owner.is_human() {
            return false;
        }

        let cost = match kind {
            ProductionKind::Unit => match self.config.rules.unit(key) {
                Some(def) => def.components.cost_stars(),
                None => return false,
            },
            ProductionKind::Building => {
                let Some(def) = self.config.rules.building(key) else {
                    return false;
                };
                if data.has_or_queued(key) {
                    return false;
                }
                if let Some(tech) = &def.tech_required {
                    if !self.has_tech(owner, tech) {
                        return false;
                    }
                }
                def.cost
            }
        };

        let player = self.player_state_mut(owner);
        if player.stars < cost {
            return false;
        }
        player.stars -= cost;
        self.publish_economy(owner);

        if let Some(data) = self.city_data_mut(city_id) {
            data.production_queue.push(ProductionItem::new(key, kind));
        }
        log::debug!("{} queued {} in city {}", owner, key, city_id);
        self.publish_city(city_id);
        true
    }

    /// Advances the head of every production queue `owner` has by one turn.
    ///
    /// Finished units spawn on the city tile; if it is occupied the order is lost.
    /// Finished buildings are added to the city and apply their population bonus.
    pub fn process_queues(&mut self, owner: PlayerId) {
        let cities: Vec<(EntityId, Position)> = self
            .cities_of(owner)
            .map(|city| (city.id, city.position))
            .collect();

        for (city_id, pos) in cities {
            let finished = match self.city_data_mut(city_id) {
                Some(data) => match data.production_queue.first_mut() {
                    Some(item) => {
                        item.turns_remaining = item.turns_remaining.saturating_sub(1);
                        if item.turns_remaining == 0 {
                            Some(data.production_queue.remove(0))
                        } else {
                            None
                        }
                    }
                    None => continue,
                },
                None => continue,
            };

            if let Some(item) = finished {
                self.complete_production(city_id, pos, owner, item);
            }
            self.publish_city(city_id);
        }
    }

    fn complete_production(
        &mut self,
        city_id: EntityId,
        pos: Position,
        owner: PlayerId,
        item: ProductionItem,
    ) {
        match item.kind {
            ProductionKind::Unit => {
                if self.create_entity(&item.key, pos, owner, true).is_none() {
                    log::debug!("Spawn tile {} blocked, {} order lost", pos, item.key);
                }
            }
            ProductionKind::Building => {
                if let Some(data) = self.city_data_mut(city_id) {
                    data.buildings.push(item.key.clone());
                }
                let population = self
                    .config
                    .rules
                    .building(&item.key)
                    .map(|def| def.stats.population)
                    .unwrap_or(0);
                if population > 0 {
                    self.add_city_population(city_id, population);
                }
                self.calculate_income(owner);
                log::debug!("City {} completed {}", city_id, item.key);
            }
        }
    }

    /// Builds a tile improvement in `owner`'s territory.
    ///
    /// Checks ownership, that the tile is free of improvements, the tech requirement,
    /// terrain compatibility and cost. The population bonus goes to the managing city.
    pub fn construct_improvement(&mut self, owner: PlayerId, pos: Position, improvement_id: &str) -> bool {
        let Some(tile) = self.grid.get(pos) else {
            return false;
        };
        if tile.owner != Some(owner) || tile.improvement.is_some() {
            return false;
        }
        let terrain = tile.terrain;
        let managing_city = tile.city;

        let Some(def) = self.config.rules.improvement(improvement_id) else {
            return false;
        };
        if let Some(tech) = &def.tech_required {
            if !self.has_tech(owner, tech) {
                return false;
            }
        }
        if !def.valid_terrain.contains(&terrain) {
            return false;
        }
        let cost = def.cost;
        let population_bonus = def.population_bonus;

        let player = self.player_state_mut(owner);
        if player.stars < cost {
            return false;
        }
        player.stars -= cost;

        if let Some(tile) = self.grid.get_mut(pos) {
            tile.improvement = Some(improvement_id.to_string());
        }
        log::debug!("{} built {} at {}", owner, improvement_id, pos);

        if population_bonus > 0 {
            if let Some(city_id) = managing_city {
                self.add_city_population(city_id, population_bonus);
            }
        }

        self.publish_economy(owner);
        self.publish_tile(pos);
        true
    }

    /// Grows a city, levelling it up for as long as the threshold (level + 1) is met.
    ///
    /// Returns false if `city_id` is not a city.
    pub fn add_city_population(&mut self, city_id: EntityId, amount: u32) -> bool {
        let Some(city) = self.entity_mut(city_id) else {
            return false;
        };
        let owner = city.owner;
        let Some(stats) = city.components.city_stats.as_mut() else {
            return false;
        };

        stats.population += amount;
        let mut levelled = false;
        while stats.population >= stats.level + 1 {
            stats.population -= stats.level + 1;
            stats.level += 1;
            levelled = true;
        }
        let level = stats.level;

        if levelled {
            log::info!("City {} reached level {}", city_id, level);
            self.calculate_income(owner);
            self.publish_economy(owner);
        }
        self.publish_city(city_id);
        true
    }
}
