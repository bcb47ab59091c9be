//! Entity data definitions.
//!
//! Units, structures, and projectiles are plain data with no behavior.
//! The [`crate::stepper`] mutates them; the [`crate::battle`] controller
//! owns them. Constructors validate stats so that malformed templates
//! never enter the roster.

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Unique identifier for entities.
///
/// Units, structures, and projectiles share one identifier space so a
/// target reference is always a single [`EntityId`].
pub type EntityId = u64;

/// The two sides of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The local player's side (left baseline).
    Friendly,
    /// The scripted opponent's side (right baseline).
    Opponent,
}

impl Side {
    /// The opposing side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Friendly => Side::Opponent,
            Side::Opponent => Side::Friendly,
        }
    }
}

/// One value per side.
///
/// Used for essence pools and destroyed-structure tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SidePair<T> {
    /// Value for [`Side::Friendly`].
    pub friendly: T,
    /// Value for [`Side::Opponent`].
    pub opponent: T,
}

impl<T> SidePair<T> {
    /// Create a pair with the same value cloned for both sides.
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            friendly: value.clone(),
            opponent: value,
        }
    }

    /// Borrow the value for a side.
    pub const fn get(&self, side: Side) -> &T {
        match side {
            Side::Friendly => &self.friendly,
            Side::Opponent => &self.opponent,
        }
    }

    /// Mutably borrow the value for a side.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Friendly => &mut self.friendly,
            Side::Opponent => &mut self.opponent,
        }
    }
}

/// Lane constraint for lane-restricted units and lane structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    /// Upper lane of the arena.
    Top,
    /// Lower lane of the arena.
    Bottom,
}

/// Arena geometry.
///
/// The friendly baseline is the `x = 0` edge, the opponent baseline the
/// `x = width` edge, and the river splits the halves at `x = width / 2`.
/// Lanes split the field horizontally at `y = height / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaBounds {
    /// Arena width in world units.
    #[serde(with = "fixed_serde")]
    pub width: Fixed,
    /// Arena height in world units.
    #[serde(with = "fixed_serde")]
    pub height: Fixed,
}

impl ArenaBounds {
    /// Create arena bounds.
    #[must_use]
    pub const fn new(width: Fixed, height: Fixed) -> Self {
        Self { width, height }
    }

    /// Check that a position lies inside the arena.
    #[must_use]
    pub fn contains(&self, position: Vec2Fixed) -> bool {
        position.x >= Fixed::ZERO
            && position.x <= self.width
            && position.y >= Fixed::ZERO
            && position.y <= self.height
    }

    /// The midline x coordinate separating the two halves.
    #[must_use]
    pub fn mid_x(&self) -> Fixed {
        self.width / Fixed::from_num(2)
    }

    /// Check that a position lies in a side's own half (baseline side of
    /// the midline, midline inclusive).
    #[must_use]
    pub fn in_own_half(&self, side: Side, position: Vec2Fixed) -> bool {
        match side {
            Side::Friendly => position.x <= self.mid_x(),
            Side::Opponent => position.x >= self.mid_x(),
        }
    }

    /// The lane a position currently occupies.
    #[must_use]
    pub fn lane_of(&self, position: Vec2Fixed) -> Lane {
        if position.y < self.height / Fixed::from_num(2) {
            Lane::Top
        } else {
            Lane::Bottom
        }
    }

    /// X coordinate of a side's baseline.
    #[must_use]
    pub fn baseline_x(&self, side: Side) -> Fixed {
        match side {
            Side::Friendly => Fixed::ZERO,
            Side::Opponent => self.width,
        }
    }
}

/// Health component for damageable entities.
///
/// Damage application saturates at zero, which is the clamp the cleanup
/// pass relies on: no entity ever carries negative health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    /// Current health points.
    pub current: u32,
    /// Maximum health points.
    pub max: u32,
}

impl Health {
    /// Create new health component at full health.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Check if entity is dead (health == 0).
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Apply damage, returning actual damage dealt.
    /// Uses saturating subtraction so health never underflows.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current);
        self.current = self.current.saturating_sub(actual);
        actual
    }
}

/// A deployed combat unit.
///
/// Created by the spawn gateway or the scripted-opponent driver from a
/// [`crate::template::UnitTemplate`]; mutated by the stepper; removed by
/// the cleanup pass once health reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier.
    pub id: EntityId,
    /// Owning side.
    pub side: Side,
    /// World position.
    pub position: Vec2Fixed,
    /// Current and maximum health.
    pub health: Health,
    /// Damage per attack.
    pub damage: u32,
    /// Movement speed in world units per tick.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Attack range in world units (inclusive).
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Cooldown between attacks in ticks.
    pub attack_cooldown: u32,
    /// Ticks until the next attack is ready. Starts at 0 (ready).
    pub cooldown_remaining: u32,
    /// Projectile travel speed; zero means instant (melee/hitscan) hits.
    #[serde(with = "fixed_serde")]
    pub projectile_speed: Fixed,
    /// Lane restriction, if any.
    pub lane: Option<Lane>,
}

impl Unit {
    /// Construct a validated unit.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidTemplate`] for non-positive health or
    /// negative speed/range/projectile speed.
    pub fn new(
        id: EntityId,
        side: Side,
        position: Vec2Fixed,
        max_health: u32,
        damage: u32,
        speed: Fixed,
        range: Fixed,
        attack_cooldown: u32,
        projectile_speed: Fixed,
        lane: Option<Lane>,
    ) -> Result<Self> {
        if max_health == 0 {
            return Err(ArenaError::InvalidTemplate(
                "unit health must be positive".into(),
            ));
        }
        if speed < Fixed::ZERO {
            return Err(ArenaError::InvalidTemplate(
                "unit speed must not be negative".into(),
            ));
        }
        if range < Fixed::ZERO {
            return Err(ArenaError::InvalidTemplate(
                "unit range must not be negative".into(),
            ));
        }
        if projectile_speed < Fixed::ZERO {
            return Err(ArenaError::InvalidTemplate(
                "projectile speed must not be negative".into(),
            ));
        }

        Ok(Self {
            id,
            side,
            position,
            health: Health::new(max_health),
            damage,
            speed,
            range,
            attack_cooldown,
            cooldown_remaining: 0,
            projectile_speed,
            lane,
        })
    }

    /// Check if this unit fires projectiles rather than hitting instantly.
    #[must_use]
    pub fn uses_projectiles(&self) -> bool {
        self.projectile_speed > Fixed::ZERO
    }

    /// Check if ready to attack.
    #[must_use]
    pub const fn can_attack(&self) -> bool {
        self.cooldown_remaining == 0
    }

    /// Reset cooldown after attacking.
    pub fn reset_cooldown(&mut self) {
        self.cooldown_remaining = self.attack_cooldown;
    }

    /// Tick down the cooldown by one.
    pub fn tick_cooldown(&mut self) {
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
        }
    }
}

/// A defensive structure.
///
/// Created once at match start and never respawned. Structures with a
/// nonzero `damage` counter-attack units that come within range; they
/// never move. Destroying the core structure ends the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// Unique identifier.
    pub id: EntityId,
    /// Owning side.
    pub side: Side,
    /// World position (fixed for the whole match).
    pub position: Vec2Fixed,
    /// Current and maximum health.
    pub health: Health,
    /// Whether this is the core structure whose loss ends the match.
    pub is_core: bool,
    /// Lane this structure guards; the core guards neither.
    pub lane: Option<Lane>,
    /// Counter-attack damage (0 = does not attack).
    pub damage: u32,
    /// Counter-attack range in world units.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Cooldown between counter-attacks in ticks.
    pub attack_cooldown: u32,
    /// Ticks until the next counter-attack is ready.
    pub cooldown_remaining: u32,
}

impl Structure {
    /// Construct a validated structure.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidTemplate`] for non-positive health or
    /// negative range.
    pub fn new(
        id: EntityId,
        side: Side,
        position: Vec2Fixed,
        max_health: u32,
        is_core: bool,
        lane: Option<Lane>,
        damage: u32,
        range: Fixed,
        attack_cooldown: u32,
    ) -> Result<Self> {
        if max_health == 0 {
            return Err(ArenaError::InvalidTemplate(
                "structure health must be positive".into(),
            ));
        }
        if range < Fixed::ZERO {
            return Err(ArenaError::InvalidTemplate(
                "structure range must not be negative".into(),
            ));
        }

        Ok(Self {
            id,
            side,
            position,
            health: Health::new(max_health),
            is_core,
            lane,
            damage,
            range,
            attack_cooldown,
            cooldown_remaining: 0,
        })
    }

    /// Check if ready to counter-attack.
    #[must_use]
    pub const fn can_attack(&self) -> bool {
        self.cooldown_remaining == 0
    }

    /// Reset cooldown after a counter-attack.
    pub fn reset_cooldown(&mut self) {
        self.cooldown_remaining = self.attack_cooldown;
    }

    /// Tick down the cooldown by one.
    pub fn tick_cooldown(&mut self) {
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
        }
    }
}

/// A projectile in flight between a ranged attack and its impact.
///
/// Exists only while its target is alive; the cleanup pass drops
/// projectiles whose target died before impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    /// Unique identifier.
    pub id: EntityId,
    /// Side that fired the projectile.
    pub side: Side,
    /// Entity that fired the projectile.
    pub source: EntityId,
    /// Entity the projectile is homing toward.
    pub target: EntityId,
    /// Current world position.
    pub position: Vec2Fixed,
    /// Travel speed in world units per tick.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Damage applied on impact.
    pub damage: u32,
}
