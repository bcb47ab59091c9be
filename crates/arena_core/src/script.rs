//! Scripted deploy driver for headless matches.
//!
//! Cycles through a fixed deck on a fixed cadence, alternating lanes.
//! Deterministic by construction: no randomness, and a deploy the pool
//! cannot cover is simply retried on the next cadence pulse.

use crate::battle::{Battle, MatchState};
use crate::entity::{EntityId, Lane, Side};
use crate::error::{ArenaError, Result};
use crate::math::{Fixed, Vec2Fixed};
use crate::template::TemplateRoster;

/// Drives one side of a battle from a fixed deploy script.
#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    side: Side,
    deck: Vec<String>,
    next_card: usize,
    next_lane: Lane,
    /// Ticks between deploy attempts.
    cadence: u64,
}

impl ScriptedDriver {
    /// Create a driver cycling through `deck` every `cadence` ticks.
    #[must_use]
    pub fn new(side: Side, deck: Vec<String>, cadence: u64) -> Self {
        Self {
            side,
            deck,
            next_card: 0,
            next_lane: Lane::Top,
            cadence: cadence.max(1),
        }
    }

    /// The side this driver plays.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Deploy position: mid-depth in the driver's own half, at the
    /// center of the given lane.
    fn deploy_position(&self, battle: &Battle, lane: Lane) -> Vec2Fixed {
        let bounds = battle.bounds();
        let quarter_x = bounds.width / Fixed::from_num(4);
        let x = match self.side {
            Side::Friendly => quarter_x,
            Side::Opponent => bounds.width - quarter_x,
        };
        let y = match lane {
            Lane::Top => bounds.height / Fixed::from_num(4),
            Lane::Bottom => bounds.height - bounds.height / Fixed::from_num(4),
        };
        Vec2Fixed::new(x, y)
    }

    /// Attempt one scripted deploy if the cadence allows.
    ///
    /// Returns the deployed unit's ID, or `None` when this tick is off
    /// cadence, the match is not active, or the pool cannot cover the
    /// next card yet (the card is retried on the next pulse).
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidTemplate`] when the deck names a template
    /// the roster does not contain; deploy errors other than an
    /// insufficient pool are propagated unchanged.
    pub fn act(&mut self, battle: &mut Battle, roster: &TemplateRoster) -> Result<Option<EntityId>> {
        if self.deck.is_empty() {
            return Ok(None);
        }
        match battle.state() {
            MatchState::Running | MatchState::Overtime => {}
            _ => return Ok(None),
        }
        if battle.get_tick() % self.cadence != 0 {
            return Ok(None);
        }

        let name = &self.deck[self.next_card];
        let template = roster
            .get(name)
            .ok_or_else(|| ArenaError::InvalidTemplate(name.clone()))?;
        let level = roster.level(name);
        let position = self.deploy_position(battle, self.next_lane);

        match battle.deploy(template, self.side, position, level) {
            Ok(id) => {
                self.next_card = (self.next_card + 1) % self.deck.len();
                self.next_lane = match self.next_lane {
                    Lane::Top => Lane::Bottom,
                    Lane::Bottom => Lane::Top,
                };
                Ok(Some(id))
            }
            Err(ArenaError::InsufficientResource { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{MatchConfig, StructurePlacement};

    fn started_battle() -> Battle {
        let config = MatchConfig::default();
        let mut battle = Battle::new(config);
        battle
            .start(&StructurePlacement::standard(&config.bounds))
            .unwrap();
        battle
    }

    #[test]
    fn test_driver_deploys_on_cadence() {
        let mut battle = started_battle();
        let roster = TemplateRoster::base();
        let mut driver = ScriptedDriver::new(Side::Opponent, vec!["knight".into()], 40);

        // Tick 0 is on cadence
        let deployed = driver.act(&mut battle, &roster).unwrap();
        assert!(deployed.is_some());

        battle.tick();
        assert_eq!(driver.act(&mut battle, &roster).unwrap(), None);
    }

    #[test]
    fn test_driver_alternates_lanes() {
        let mut battle = started_battle();
        let roster = TemplateRoster::base();
        let mut driver = ScriptedDriver::new(Side::Friendly, vec!["knight".into()], 1);

        let first = driver.act(&mut battle, &roster).unwrap().unwrap();
        battle.tick();
        // Pool started at 5, knight costs 3: second deploy waits for regen
        assert_eq!(driver.act(&mut battle, &roster).unwrap(), None);

        for _ in 0..40 {
            battle.tick();
        }
        let second = driver.act(&mut battle, &roster).unwrap().unwrap();
        battle.tick();

        let bounds = *battle.bounds();
        let first_lane = bounds.lane_of(battle.unit(first).unwrap().position);
        let second_lane = bounds.lane_of(battle.unit(second).unwrap().position);
        assert_ne!(first_lane, second_lane);
    }

    #[test]
    fn test_unknown_card_is_an_error() {
        let mut battle = started_battle();
        let roster = TemplateRoster::base();
        let mut driver = ScriptedDriver::new(Side::Friendly, vec!["dragon".into()], 1);

        let result = driver.act(&mut battle, &roster);
        assert!(matches!(result, Err(ArenaError::InvalidTemplate(_))));
    }

    #[test]
    fn test_driver_idle_when_match_over() {
        let mut battle = started_battle();
        battle.end_match();
        let roster = TemplateRoster::base();
        let mut driver = ScriptedDriver::new(Side::Friendly, vec!["knight".into()], 1);
        assert_eq!(driver.act(&mut battle, &roster).unwrap(), None);
    }
}
