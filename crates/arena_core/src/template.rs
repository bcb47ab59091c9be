//! Data-driven unit templates.
//!
//! The persistence layer supplies a roster of templates at match start:
//! stat blocks plus a per-template level. The core never writes the
//! roster back; it only instantiates units from it. Template files use
//! RON so balance passes do not require recompiling.
//!
//! # Example RON
//!
//! ```ron
//! (
//!     templates: [
//!         UnitTemplate(
//!             id: "knight",
//!             name: "Knight",
//!             cost: 3,
//!             health: 300,
//!             damage: 30,
//!             speed: 4294967296,      // Fixed-point for 1.0
//!             range: 85899345920,     // Fixed-point for 20.0
//!             attack_cooldown: 24,
//!             projectile_speed: 0,
//!             lane_bound: true,
//!         ),
//!     ],
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Lane, Side, Unit};
use crate::error::{ArenaError, Result};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Data-driven unit definition.
///
/// Defines the deploy cost and base stat block of one unit kind. Base
/// stats describe level 1; [`level_multiplier`] scales health and
/// damage for upgraded templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Unique string identifier for this unit kind.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Essence cost to deploy this unit.
    pub cost: u32,

    /// Maximum health points at level 1.
    pub health: u32,

    /// Damage per attack at level 1.
    pub damage: u32,

    /// Movement speed in world units per tick (fixed-point).
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,

    /// Attack range in world units (fixed-point).
    #[serde(with = "fixed_serde")]
    pub range: Fixed,

    /// Cooldown between attacks in ticks.
    pub attack_cooldown: u32,

    /// Projectile travel speed; zero means instant hits.
    #[serde(default)]
    #[serde(with = "fixed_serde")]
    pub projectile_speed: Fixed,

    /// Whether deployed units are restricted to the lane they were
    /// placed in.
    #[serde(default)]
    pub lane_bound: bool,
}

/// Upper bound on template health and damage.
///
/// Keeps level-scaled stats inside the fixed-point integer range, so
/// the scaling arithmetic cannot overflow.
pub const MAX_STAT: u32 = 1_000_000;

/// Highest template level [`UnitTemplate::instantiate`] accepts.
pub const MAX_LEVEL: u32 = 100;

impl UnitTemplate {
    /// Validate the template's stat block.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidTemplate`] for non-positive health,
    /// negative speed/range/projectile speed, or health/damage above
    /// [`MAX_STAT`].
    pub fn validate(&self) -> Result<()> {
        if self.health == 0 {
            return Err(ArenaError::InvalidTemplate(format!(
                "template '{}' has non-positive health",
                self.id
            )));
        }
        if self.health > MAX_STAT || self.damage > MAX_STAT {
            return Err(ArenaError::InvalidTemplate(format!(
                "template '{}' exceeds the stat cap of {MAX_STAT}",
                self.id
            )));
        }
        if self.speed < Fixed::ZERO
            || self.range < Fixed::ZERO
            || self.projectile_speed < Fixed::ZERO
        {
            return Err(ArenaError::InvalidTemplate(format!(
                "template '{}' has a negative stat",
                self.id
            )));
        }
        Ok(())
    }

    /// Instantiate a unit from this template.
    ///
    /// Health and damage are scaled by the template level; the lane
    /// restriction (if `lane_bound`) is taken from the deploy position.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidTemplate`] if the stat block fails
    /// validation or `level` is outside `1..=MAX_LEVEL`. The gateway
    /// relies on this check: a malformed template reaching deploy must
    /// come back as an error, never panic mid-conversion.
    pub fn instantiate(
        &self,
        id: EntityId,
        side: Side,
        position: Vec2Fixed,
        level: u32,
        lane: Option<Lane>,
    ) -> Result<Unit> {
        self.validate()?;
        if level == 0 || level > MAX_LEVEL {
            return Err(ArenaError::InvalidTemplate(format!(
                "template '{}' level {level} outside 1..={MAX_LEVEL}",
                self.id
            )));
        }

        let mult = level_multiplier(level);
        let lane = if self.lane_bound { lane } else { None };

        Unit::new(
            id,
            side,
            position,
            scale_stat(self.health, mult),
            scale_stat(self.damage, mult),
            self.speed,
            self.range,
            self.attack_cooldown,
            self.projectile_speed,
            lane,
        )
    }
}

/// Stat multiplier for a template level.
///
/// Level 1 is the base stat block; each level past it adds 10%. Levels
/// are clamped to `1..=MAX_LEVEL`.
#[must_use]
pub fn level_multiplier(level: u32) -> Fixed {
    let bonus = Fixed::from_num(level.clamp(1, MAX_LEVEL) - 1) / Fixed::from_num(10);
    Fixed::from_num(1) + bonus
}

fn scale_stat(base: u32, mult: Fixed) -> u32 {
    (Fixed::from_num(base) * mult).round().to_num::<u32>()
}

/// The roster of templates available for a match.
///
/// Supplied by the persistence layer (or the built-in base roster) at
/// match start, together with per-template levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRoster {
    /// All available templates.
    pub templates: Vec<UnitTemplate>,
    /// Per-template level, parallel keyed by template id.
    #[serde(default)]
    pub levels: Vec<(String, u32)>,
}

impl TemplateRoster {
    /// Look up a template by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&UnitTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// The level for a template id (1 when unset).
    #[must_use]
    pub fn level(&self, id: &str) -> u32 {
        self.levels
            .iter()
            .find(|(tid, _)| tid == id)
            .map_or(1, |(_, level)| *level)
    }

    /// Parse a roster from RON text and validate every template.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidTemplate`] on parse failure or when
    /// any template's stat block is malformed.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let roster: Self = ron::from_str(text)
            .map_err(|e| ArenaError::InvalidTemplate(format!("roster parse error: {e}")))?;
        for template in &roster.templates {
            template.validate()?;
        }
        Ok(roster)
    }

    /// The built-in base roster.
    ///
    /// Mirrors the four starter cards: a melee bruiser, a ranged
    /// skirmisher, a slow tank, and a ranged heavy hitter.
    #[must_use]
    pub fn base() -> Self {
        Self {
            templates: vec![
                UnitTemplate {
                    id: "knight".into(),
                    name: "Knight".into(),
                    cost: 3,
                    health: 300,
                    damage: 30,
                    speed: Fixed::from_num(1),
                    range: Fixed::from_num(20),
                    attack_cooldown: 24,
                    projectile_speed: Fixed::ZERO,
                    lane_bound: true,
                },
                UnitTemplate {
                    id: "archer".into(),
                    name: "Archer".into(),
                    cost: 3,
                    health: 120,
                    damage: 18,
                    speed: Fixed::from_num(1.2),
                    range: Fixed::from_num(120),
                    attack_cooldown: 20,
                    projectile_speed: Fixed::from_num(8),
                    lane_bound: true,
                },
                UnitTemplate {
                    id: "giant".into(),
                    name: "Giant".into(),
                    cost: 5,
                    health: 900,
                    damage: 50,
                    speed: Fixed::from_num(0.6),
                    range: Fixed::from_num(25),
                    attack_cooldown: 30,
                    projectile_speed: Fixed::ZERO,
                    lane_bound: false,
                },
                UnitTemplate {
                    id: "wizard".into(),
                    name: "Wizard".into(),
                    cost: 4,
                    health: 180,
                    damage: 45,
                    speed: Fixed::from_num(0.9),
                    range: Fixed::from_num(100),
                    attack_cooldown: 34,
                    projectile_speed: Fixed::from_num(6),
                    lane_bound: false,
                },
            ],
            levels: Vec::new(),
        }
    }
}
