//! Per-entity move-or-attack advance.
//!
//! One call advances one entity by one tick against its resolved
//! target. All per-unit differences (range, speed, damage, cooldown)
//! are data on the entity; the stepper itself is a single parameterized
//! path with no per-kind branches.
//!
//! Semantics:
//! - distance ≤ range (inclusive): hold position; attack when the
//!   cooldown is ready, otherwise count it down
//! - distance > range: straight-line move toward the target at fixed
//!   speed (cooldown counts down while walking)
//! - no target: advance toward the opposing baseline

use crate::entity::{ArenaBounds, EntityId, Projectile, Structure, Unit};
use crate::math::{Fixed, Vec2Fixed};
use crate::targeting::TargetCandidate;

/// Combat effect produced by stepping an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// No combat effect this tick (moved, held, or cooling down).
    None,
    /// Instant hit on the target for the entity's damage.
    Strike {
        /// The struck entity.
        target: EntityId,
        /// Damage to apply.
        damage: u32,
    },
    /// A projectile should be launched at the target.
    Launch {
        /// The targeted entity.
        target: EntityId,
    },
}

/// Outcome of advancing a projectile one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileStep {
    /// Still traveling toward the target.
    InFlight,
    /// Reached the target this tick; apply damage and despawn.
    Hit,
}

/// Move `position` toward `goal` by up to `speed`, landing exactly on
/// the goal when it is within reach.
fn advance_toward(position: &mut Vec2Fixed, goal: Vec2Fixed, speed: Fixed) {
    let diff = goal - *position;
    let dist_sq = diff.dot(diff);
    if dist_sq <= speed * speed {
        *position = goal;
    } else {
        *position = *position + diff.normalize().scale(speed);
    }
}

/// Advance one unit by one tick against its resolved target.
///
/// Mutates position and cooldown; damage application is returned as a
/// [`StepAction`] for the controller to apply, so a unit acting on a
/// target that died earlier this tick never dereferences a stale
/// entity - the controller drops actions aimed at missing ids.
pub fn step_unit(
    unit: &mut Unit,
    target: Option<&TargetCandidate>,
    bounds: &ArenaBounds,
) -> StepAction {
    let Some(target) = target else {
        // Default advance: straight toward the opposing baseline
        unit.tick_cooldown();
        let goal = Vec2Fixed::new(bounds.baseline_x(unit.side.opposite()), unit.position.y);
        advance_toward(&mut unit.position, goal, unit.speed);
        return StepAction::None;
    };

    let dist_sq = unit.position.distance_squared(target.position);
    let range_sq = unit.range * unit.range;

    if dist_sq <= range_sq {
        // In range: hold position, attack when ready
        if unit.can_attack() {
            unit.reset_cooldown();
            if unit.uses_projectiles() {
                StepAction::Launch { target: target.id }
            } else {
                StepAction::Strike {
                    target: target.id,
                    damage: unit.damage,
                }
            }
        } else {
            unit.tick_cooldown();
            StepAction::None
        }
    } else {
        unit.tick_cooldown();
        advance_toward(&mut unit.position, target.position, unit.speed);
        StepAction::None
    }
}

/// Advance one structure's counter-attack by one tick.
///
/// Structures never move; the resolver already filtered the target to
/// be within range.
pub fn step_structure(structure: &mut Structure, target: Option<&TargetCandidate>) -> StepAction {
    if structure.damage == 0 {
        return StepAction::None;
    }

    match target {
        Some(target) if structure.can_attack() => {
            structure.reset_cooldown();
            StepAction::Strike {
                target: target.id,
                damage: structure.damage,
            }
        }
        _ => {
            structure.tick_cooldown();
            StepAction::None
        }
    }
}

/// Advance one projectile toward its target's current position.
///
/// The caller resolves `target_position` each tick, so projectiles home
/// on moving targets. Target death is handled by the caller (the
/// projectile is despawned before stepping).
pub fn step_projectile(projectile: &mut Projectile, target_position: Vec2Fixed) -> ProjectileStep {
    let dist_sq = projectile.position.distance_squared(target_position);
    if dist_sq <= projectile.speed * projectile.speed {
        projectile.position = target_position;
        ProjectileStep::Hit
    } else {
        advance_toward(&mut projectile.position, target_position, projectile.speed);
        ProjectileStep::InFlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, Lane, Side};

    fn bounds() -> ArenaBounds {
        ArenaBounds::new(Fixed::from_num(900), Fixed::from_num(600))
    }

    fn melee_unit(range: i32, speed: i32) -> Unit {
        Unit::new(
            1,
            Side::Friendly,
            Vec2Fixed::new(Fixed::from_num(100), Fixed::from_num(300)),
            100,
            25,
            Fixed::from_num(speed),
            Fixed::from_num(range),
            20,
            Fixed::ZERO,
            None,
        )
        .unwrap()
    }

    fn candidate_at(id: EntityId, x: i32, y: i32) -> TargetCandidate {
        TargetCandidate {
            id,
            position: Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y)),
            lane: Lane::Top,
            is_structure: false,
        }
    }

    #[test]
    fn test_out_of_range_moves_not_attacks() {
        // Range 30, speed 1, target at distance 50
        let mut unit = melee_unit(30, 1);
        let target = candidate_at(2, 150, 300);

        let action = step_unit(&mut unit, Some(&target), &bounds());

        assert_eq!(action, StepAction::None);
        let moved = unit.position.x - Fixed::from_num(100);
        let epsilon = Fixed::from_num(1) / Fixed::from_num(1000);
        assert!((moved - Fixed::from_num(1)).abs() < epsilon);
    }

    #[test]
    fn test_in_range_ready_strikes_once() {
        // Range 30, target at distance 20, cooldown ready
        let mut unit = melee_unit(30, 1);
        let target = candidate_at(2, 120, 300);

        let action = step_unit(&mut unit, Some(&target), &bounds());

        assert_eq!(
            action,
            StepAction::Strike {
                target: 2,
                damage: 25
            }
        );
        assert_eq!(unit.cooldown_remaining, 20);
        // Holds position while in range
        assert_eq!(unit.position.x, Fixed::from_num(100));
    }

    #[test]
    fn test_in_range_cooling_holds_position() {
        let mut unit = melee_unit(30, 1);
        unit.cooldown_remaining = 5;
        let target = candidate_at(2, 120, 300);

        let action = step_unit(&mut unit, Some(&target), &bounds());

        assert_eq!(action, StepAction::None);
        assert_eq!(unit.cooldown_remaining, 4);
        assert_eq!(unit.position.x, Fixed::from_num(100));
    }

    #[test]
    fn test_range_is_inclusive() {
        // Target exactly at range
        let mut unit = melee_unit(30, 1);
        let target = candidate_at(2, 130, 300);

        let action = step_unit(&mut unit, Some(&target), &bounds());
        assert!(matches!(action, StepAction::Strike { .. }));
    }

    #[test]
    fn test_no_target_advances_to_baseline() {
        let mut unit = melee_unit(30, 3);
        let action = step_unit(&mut unit, None, &bounds());

        assert_eq!(action, StepAction::None);
        // Friendly units advance toward the opponent baseline (+x);
        // normalize carries fixed-point sqrt error, so compare loosely
        let epsilon = Fixed::from_num(1) / Fixed::from_num(1000);
        assert!((unit.position.x - Fixed::from_num(103)).abs() < epsilon);
        assert_eq!(unit.position.y, Fixed::from_num(300));
    }

    #[test]
    fn test_ranged_unit_launches_projectile() {
        let mut unit = melee_unit(100, 1);
        unit.projectile_speed = Fixed::from_num(8);
        let target = candidate_at(2, 150, 300);

        let action = step_unit(&mut unit, Some(&target), &bounds());
        assert_eq!(action, StepAction::Launch { target: 2 });
    }

    #[test]
    fn test_structure_strikes_in_range_target() {
        let mut tower = Structure::new(
            9,
            Side::Opponent,
            Vec2Fixed::new(Fixed::from_num(800), Fixed::from_num(300)),
            1000,
            false,
            Some(Lane::Top),
            40,
            Fixed::from_num(150),
            30,
        )
        .unwrap();

        let target = candidate_at(2, 700, 300);
        let action = step_structure(&mut tower, Some(&target));
        assert_eq!(
            action,
            StepAction::Strike {
                target: 2,
                damage: 40
            }
        );

        // Cooling down: no second strike
        let action = step_structure(&mut tower, Some(&target));
        assert_eq!(action, StepAction::None);
        assert_eq!(tower.cooldown_remaining, 29);
    }

    #[test]
    fn test_projectile_hits_within_reach() {
        let mut projectile = Projectile {
            id: 5,
            side: Side::Friendly,
            source: 1,
            target: 2,
            position: Vec2Fixed::new(Fixed::from_num(0), Fixed::from_num(0)),
            speed: Fixed::from_num(10),
            damage: 18,
        };

        let far = Vec2Fixed::new(Fixed::from_num(25), Fixed::from_num(0));
        assert_eq!(step_projectile(&mut projectile, far), ProjectileStep::InFlight);
        let epsilon = Fixed::from_num(1) / Fixed::from_num(1000);
        assert!((projectile.position.x - Fixed::from_num(10)).abs() < epsilon);

        assert_eq!(step_projectile(&mut projectile, far), ProjectileStep::InFlight);
        assert_eq!(step_projectile(&mut projectile, far), ProjectileStep::Hit);
        assert_eq!(projectile.position, far);
    }
}
