//! # Research
//!
//! Technology unlocking and tech gates.

use crate::game::{GameState, PlayerId};

impl GameState {
    /// Whether `owner` has researched `tech`.
    pub fn has_tech(&self, owner: PlayerId, tech: &str) -> bool {
        self.player_state(owner).unlocked_techs.contains(tech)
    }

    /// Researches a technology for `owner`.
    ///
    /// Fails if the tech is unknown, already unlocked, missing its prerequisite, or
    /// unaffordable.
    pub fn research_tech(&mut self, owner: PlayerId, tech_id: &str) -> bool {
        let Some(tech) = self.config.rules.tech(tech_id) else {
            return false;
        };
        let cost = tech.cost;
        if self.has_tech(owner, tech_id) {
            return false;
        }
        if let Some(prerequisite) = &tech.prerequisite {
            if !self.has_tech(owner, prerequisite) {
                return false;
            }
        }

        let player = self.player_state_mut(owner);
        if player.stars < cost {
            return false;
        }
        player.stars -= cost;
        player.unlocked_techs.insert(tech_id.to_string());

        log::info!("{} researched {}", owner, tech_id);
        self.publish_economy(owner);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::game::test_support::flat_state;
    use crate::game::PlayerId;

    #[test]
    fn test_research_debits_and_unlocks() {
        let mut state = flat_state();
        assert!(state.research_tech(PlayerId::Player, "org"));
        assert!(state.has_tech(PlayerId::Player, "org"));
        assert_eq!(state.player_state(PlayerId::Player).stars, 5);
    }

    #[test]
    fn test_research_requires_prerequisite() {
        let mut state = flat_state();
        assert!(!state.research_tech(PlayerId::Player, "shields"));
        assert!(state.research_tech(PlayerId::Player, "org"));
        state.player_state_mut(PlayerId::Player).stars = 20;
        assert!(state.research_tech(PlayerId::Player, "shields"));
    }

    #[test]
    fn test_research_rejections_leave_state_alone() {
        let mut state = flat_state();
        assert!(!state.research_tech(PlayerId::Player, "teleportation"));
        assert!(state.research_tech(PlayerId::Player, "climb"));
        assert!(!state.research_tech(PlayerId::Player, "climb"));

        state.player_state_mut(PlayerId::Player).stars = 4;
        assert!(!state.research_tech(PlayerId::Player, "hunt"));
        assert_eq!(state.player_state(PlayerId::Player).stars, 4);
    }

    #[test]
    fn test_research_is_per_owner() {
        let mut state = flat_state();
        assert!(state.research_tech(PlayerId::EnemyAi, "hunt"));
        assert!(state.has_tech(PlayerId::EnemyAi, "hunt"));
        assert!(!state.has_tech(PlayerId::Player, "hunt"));
    }
}
