//! Match controller and tick loop.
//!
//! [`Battle`] exclusively owns all live entities and both essence pools
//! for the duration of a match. External layers reach it through three
//! entry points: [`Battle::start`], [`Battle::deploy`] (the spawn
//! gateway), and [`Battle::tick`]; everything else is read-only.
//!
//! # Determinism
//!
//! One tick advances the whole world in a fixed order:
//!
//! 1. Apply deploys queued since the last tick
//! 2. Structure counter-attacks
//! 3. Units: targeting then stepping, in sorted-ID order
//! 4. Projectiles advance or impact
//! 5. Essence clock
//! 6. Cleanup: purge dead entities, credit tallies, detect core loss
//! 7. Match timer (duration expiry, overtime entry and expiry)
//!
//! All state mutation for a tick completes before the call returns; a
//! deploy request never interleaves mid-iteration because inserts are
//! queued and applied only at step 1.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::entity::{ArenaBounds, EntityId, Lane, Projectile, Side, SidePair, Structure, Unit};
use crate::error::{ArenaError, Result};
use crate::essence::{EssenceClock, EssenceConfig, EssencePool};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::snapshot::BattleSnapshot;
use crate::stepper::{self, ProjectileStep, StepAction};
use crate::targeting::{self, TargetCandidate};
use crate::template::UnitTemplate;

/// Ticks per second for the simulation.
pub const TICK_RATE: u32 = 20;

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchState {
    /// Created but not yet started.
    #[default]
    NotStarted,
    /// The main match clock is running.
    Running,
    /// Sudden death after a tied regulation period.
    Overtime,
    /// Terminal. Further ticks are no-ops.
    Ended,
}

/// Final outcome of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The winning side, or `None` for a draw.
    pub winner: Option<Side>,
    /// Destroyed-structure tallies at the end of the match.
    pub tallies: SidePair<u32>,
}

/// Match configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Regulation duration in ticks.
    pub duration_ticks: u64,
    /// Maximum overtime duration in ticks.
    pub overtime_ticks: u64,
    /// Essence pool and regeneration settings.
    pub essence: EssenceConfig,
    /// Arena geometry.
    pub bounds: ArenaBounds,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            // Three minutes of regulation, one of overtime
            duration_ticks: 180 * u64::from(TICK_RATE),
            overtime_ticks: 60 * u64::from(TICK_RATE),
            essence: EssenceConfig::default(),
            bounds: ArenaBounds::new(Fixed::from_num(900), Fixed::from_num(600)),
        }
    }
}

/// Initial placement of one structure, supplied to [`Battle::start`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructurePlacement {
    /// Owning side.
    pub side: Side,
    /// World position.
    pub position: Vec2Fixed,
    /// Maximum health.
    pub health: u32,
    /// Whether this is the side's core structure.
    pub is_core: bool,
    /// Lane this structure guards.
    pub lane: Option<Lane>,
    /// Counter-attack damage (0 = passive).
    pub damage: u32,
    /// Counter-attack range.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Counter-attack cooldown in ticks.
    pub attack_cooldown: u32,
}

impl StructurePlacement {
    /// The standard arena layout: per side, one core structure on the
    /// baseline and one tower guarding each lane.
    #[must_use]
    pub fn standard(bounds: &ArenaBounds) -> Vec<Self> {
        let mut placements = Vec::with_capacity(6);
        for side in [Side::Friendly, Side::Opponent] {
            let (core_x, tower_x) = match side {
                Side::Friendly => (
                    bounds.width / Fixed::from_num(12),
                    bounds.width / Fixed::from_num(5),
                ),
                Side::Opponent => (
                    bounds.width - bounds.width / Fixed::from_num(12),
                    bounds.width - bounds.width / Fixed::from_num(5),
                ),
            };
            placements.push(Self {
                side,
                position: Vec2Fixed::new(core_x, bounds.height / Fixed::from_num(2)),
                health: 2400,
                is_core: true,
                lane: None,
                damage: 50,
                range: Fixed::from_num(140),
                attack_cooldown: 20,
            });
            for lane in [Lane::Top, Lane::Bottom] {
                let y = match lane {
                    Lane::Top => bounds.height / Fixed::from_num(4),
                    Lane::Bottom => bounds.height - bounds.height / Fixed::from_num(4),
                };
                placements.push(Self {
                    side,
                    position: Vec2Fixed::new(tower_x, y),
                    health: 1400,
                    is_core: false,
                    lane: Some(lane),
                    damage: 40,
                    range: Fixed::from_num(120),
                    attack_cooldown: 16,
                });
            }
        }
        placements
    }
}

/// Damage dealt during a tick, for the render/audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    /// Entity that dealt the damage.
    pub attacker: EntityId,
    /// Entity that took the damage.
    pub target: EntityId,
    /// Damage actually applied.
    pub damage: u32,
}

/// A structure destroyed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureFell {
    /// The destroyed structure.
    pub id: EntityId,
    /// The side that lost it.
    pub side: Side,
    /// Whether it was the core structure.
    pub is_core: bool,
}

/// Events generated during one simulation tick.
///
/// Consumed by external layers to trigger effects and sounds; the
/// simulation itself never reads them back.
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    /// Damage applications from combat.
    pub damage_events: Vec<DamageEvent>,
    /// Units that died this tick.
    pub deaths: Vec<EntityId>,
    /// Units inserted from the deploy queue this tick.
    pub spawned: Vec<EntityId>,
    /// Structures destroyed this tick.
    pub structures_destroyed: Vec<StructureFell>,
}

/// Storage for all live entities, keyed by stable identifiers.
///
/// A `HashMap` per entity kind with sorted-key iteration when order
/// matters. Stable IDs (never reused within a match) make
/// removal-during-cleanup safe: a stale reference simply fails lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Roster {
    units: HashMap<EntityId, Unit>,
    structures: HashMap<EntityId, Structure>,
    projectiles: HashMap<EntityId, Projectile>,
    next_id: EntityId,
}

impl Roster {
    fn new() -> Self {
        Self {
            units: HashMap::new(),
            structures: HashMap::new(),
            projectiles: HashMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn sorted_unit_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.units.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn sorted_structure_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.structures.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn sorted_projectile_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.projectiles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Position of a unit or structure (projectiles are not targets).
    fn position_of(&self, id: EntityId) -> Option<Vec2Fixed> {
        self.units
            .get(&id)
            .map(|u| u.position)
            .or_else(|| self.structures.get(&id).map(|s| s.position))
    }

    /// Apply damage to a unit or structure, returning damage dealt.
    ///
    /// Returns `None` when the target no longer exists; the caller
    /// drops the action rather than acting on a stale reference.
    fn apply_damage(&mut self, id: EntityId, amount: u32) -> Option<u32> {
        if let Some(unit) = self.units.get_mut(&id) {
            return Some(unit.health.apply_damage(amount));
        }
        if let Some(structure) = self.structures.get_mut(&id) {
            return Some(structure.health.apply_damage(amount));
        }
        None
    }
}

/// The match controller.
///
/// Owns all live entities, both essence pools, the tallies, and the
/// match clock. See the module docs for the per-tick phase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battle {
    config: MatchConfig,
    state: MatchState,
    tick: u64,
    roster: Roster,
    pools: SidePair<EssencePool>,
    clock: EssenceClock,
    tallies: SidePair<u32>,
    /// Structures each side started with; the winner on a core kill is
    /// credited with the loser's full count (maximum win margin).
    structure_totals: SidePair<u32>,
    pending_spawns: Vec<Unit>,
    verdict: Option<Verdict>,
}

impl Battle {
    /// Create a battle in `NotStarted` state.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let pools = SidePair::splat(EssencePool::new(config.essence.initial, config.essence.max));
        let clock = EssenceClock::new(config.essence);
        Self {
            config,
            state: MatchState::NotStarted,
            tick: 0,
            roster: Roster::new(),
            pools,
            clock,
            tallies: SidePair::default(),
            structure_totals: SidePair::default(),
            pending_spawns: Vec::new(),
            verdict: None,
        }
    }

    /// Start the match with the given structure placement.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidState`] if the match already
    /// started or the placement does not put exactly one core structure
    /// on each side, and [`ArenaError::InvalidTemplate`] if a placement
    /// has a malformed stat block.
    pub fn start(&mut self, placements: &[StructurePlacement]) -> Result<()> {
        if self.state != MatchState::NotStarted {
            return Err(ArenaError::InvalidState(format!(
                "cannot start a match in state {:?}",
                self.state
            )));
        }

        let mut cores = SidePair::<u32>::default();
        let mut totals = SidePair::<u32>::default();
        let mut structures = Vec::with_capacity(placements.len());
        for placement in placements {
            let id = self.roster.allocate_id();
            let structure = Structure::new(
                id,
                placement.side,
                placement.position,
                placement.health,
                placement.is_core,
                placement.lane,
                placement.damage,
                placement.range,
                placement.attack_cooldown,
            )?;
            if structure.is_core {
                *cores.get_mut(structure.side) += 1;
            }
            *totals.get_mut(structure.side) += 1;
            structures.push(structure);
        }

        if cores.friendly != 1 || cores.opponent != 1 {
            return Err(ArenaError::InvalidState(format!(
                "placement must contain exactly one core structure per side \
                 (friendly: {}, opponent: {})",
                cores.friendly, cores.opponent
            )));
        }

        for structure in structures {
            self.roster.structures.insert(structure.id, structure);
        }
        self.structure_totals = totals;
        self.state = MatchState::Running;
        tracing::info!(
            duration_ticks = self.config.duration_ticks,
            structures = placements.len(),
            "match started"
        );
        Ok(())
    }

    /// Current match state.
    #[must_use]
    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// Current tick number.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Arena geometry.
    #[must_use]
    pub const fn bounds(&self) -> &ArenaBounds {
        &self.config.bounds
    }

    /// A side's essence pool.
    #[must_use]
    pub const fn pool(&self, side: Side) -> &EssencePool {
        self.pools.get(side)
    }

    /// Destroyed-structure tallies.
    #[must_use]
    pub const fn tallies(&self) -> SidePair<u32> {
        self.tallies
    }

    /// The final verdict, once the match has ended.
    #[must_use]
    pub const fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Look up a live unit.
    #[must_use]
    pub fn unit(&self, id: EntityId) -> Option<&Unit> {
        self.roster.units.get(&id)
    }

    /// Look up a live structure.
    #[must_use]
    pub fn structure(&self, id: EntityId) -> Option<&Structure> {
        self.roster.structures.get(&id)
    }

    /// Number of live units on a side.
    #[must_use]
    pub fn unit_count(&self, side: Side) -> usize {
        self.roster.units.values().filter(|u| u.side == side).count()
    }

    /// Deploy a unit from a template - the spawn gateway.
    ///
    /// Validates match state, placement legality (the requesting side's
    /// own half), and the essence cost; on success debits the pool,
    /// instantiates the unit, and queues it for insertion at the next
    /// tick boundary. Rejections mutate nothing.
    ///
    /// # Errors
    ///
    /// [`ArenaError::MatchNotActive`], [`ArenaError::IllegalPlacement`],
    /// [`ArenaError::InvalidTemplate`], or
    /// [`ArenaError::InsufficientResource`].
    pub fn deploy(
        &mut self,
        template: &UnitTemplate,
        side: Side,
        position: Vec2Fixed,
        level: u32,
    ) -> Result<EntityId> {
        match self.state {
            MatchState::Running | MatchState::Overtime => {}
            state => return Err(ArenaError::MatchNotActive(state)),
        }

        let bounds = self.config.bounds;
        if !bounds.contains(position) || !bounds.in_own_half(side, position) {
            return Err(ArenaError::IllegalPlacement {
                x: position.x.to_num(),
                y: position.y.to_num(),
                side,
            });
        }

        let lane = bounds.lane_of(position);
        let mut unit = template.instantiate(0, side, position, level, Some(lane))?;

        let pool = self.pools.get_mut(side);
        if !pool.spend(template.cost) {
            return Err(ArenaError::InsufficientResource {
                required: template.cost,
                available: pool.current(),
            });
        }

        let id = self.roster.allocate_id();
        unit.id = id;
        tracing::debug!(template = %template.id, ?side, id, cost = template.cost, "unit deployed");
        self.pending_spawns.push(unit);
        Ok(id)
    }

    /// Force the match to end at the current tick boundary.
    ///
    /// Decides by tally (draw on a tie). Idempotent: calling this on an
    /// ended match has no further effect.
    pub fn end_match(&mut self) {
        if self.state == MatchState::Ended {
            return;
        }
        tracing::info!(tick = self.tick, "match force-ended");
        self.decide_by_tally();
    }

    /// Advance the simulation by one tick.
    ///
    /// No-op unless the match is `Running` or in `Overtime`. Returns the
    /// events generated during this tick for the external layers.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();
        match self.state {
            MatchState::Running | MatchState::Overtime => {}
            _ => return events,
        }

        self.apply_pending_spawns(&mut events);
        self.run_structure_phase(&mut events);
        self.run_unit_phase(&mut events);
        self.run_projectile_phase(&mut events);

        let overtime = self.state == MatchState::Overtime;
        self.clock.tick(&mut self.pools, overtime);

        self.run_cleanup(&mut events);

        self.tick += 1;
        if matches!(self.state, MatchState::Running | MatchState::Overtime) {
            self.check_timer();
        }

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "battle state hash");
        }

        events
    }

    /// Insert deploys queued since the last tick.
    fn apply_pending_spawns(&mut self, events: &mut TickEvents) {
        for unit in self.pending_spawns.drain(..) {
            events.spawned.push(unit.id);
            self.roster.units.insert(unit.id, unit);
        }
    }

    /// Opposing-side target candidates in sorted-ID order, units first.
    fn opposing_candidates(&self, side: Side) -> Vec<TargetCandidate> {
        let enemy = side.opposite();
        let bounds = &self.config.bounds;
        let mut candidates = Vec::new();
        for id in self.roster.sorted_unit_ids() {
            let unit = &self.roster.units[&id];
            if unit.side == enemy {
                candidates.push(TargetCandidate {
                    id,
                    position: unit.position,
                    lane: bounds.lane_of(unit.position),
                    is_structure: false,
                });
            }
        }
        for id in self.roster.sorted_structure_ids() {
            let structure = &self.roster.structures[&id];
            if structure.side == enemy {
                candidates.push(TargetCandidate {
                    id,
                    position: structure.position,
                    lane: bounds.lane_of(structure.position),
                    is_structure: true,
                });
            }
        }
        candidates
    }

    /// Structure counter-attacks.
    fn run_structure_phase(&mut self, events: &mut TickEvents) {
        for id in self.roster.sorted_structure_ids() {
            let Some(mut structure) = self.roster.structures.get(&id).cloned() else {
                continue;
            };
            let candidates = self.opposing_candidates(structure.side);
            let target = targeting::resolve_structure_target(
                structure.position,
                structure.range,
                &candidates,
            )
            .copied();
            let action = stepper::step_structure(&mut structure, target.as_ref());
            self.roster.structures.insert(id, structure);
            self.apply_strike(id, action, events);
        }
    }

    /// Unit targeting and stepping.
    fn run_unit_phase(&mut self, events: &mut TickEvents) {
        for id in self.roster.sorted_unit_ids() {
            let Some(mut unit) = self.roster.units.get(&id).cloned() else {
                continue;
            };
            let candidates = self.opposing_candidates(unit.side);
            let target =
                targeting::resolve_unit_target(unit.position, unit.lane, &candidates).copied();
            let action = stepper::step_unit(&mut unit, target.as_ref(), &self.config.bounds);

            let launch_data = (unit.position, unit.projectile_speed, unit.damage, unit.side);
            self.roster.units.insert(id, unit);

            match action {
                StepAction::Launch { target } => {
                    let (position, speed, damage, side) = launch_data;
                    let projectile_id = self.roster.allocate_id();
                    self.roster.projectiles.insert(
                        projectile_id,
                        Projectile {
                            id: projectile_id,
                            side,
                            source: id,
                            target,
                            position,
                            speed,
                            damage,
                        },
                    );
                }
                action => self.apply_strike(id, action, events),
            }
        }
    }

    /// Projectile travel and impacts.
    fn run_projectile_phase(&mut self, events: &mut TickEvents) {
        for id in self.roster.sorted_projectile_ids() {
            let Some(mut projectile) = self.roster.projectiles.get(&id).cloned() else {
                continue;
            };
            let Some(target_position) = self.roster.position_of(projectile.target) else {
                // Target gone before impact
                self.roster.projectiles.remove(&id);
                continue;
            };

            match stepper::step_projectile(&mut projectile, target_position) {
                ProjectileStep::InFlight => {
                    self.roster.projectiles.insert(id, projectile);
                }
                ProjectileStep::Hit => {
                    let (source, target, damage) =
                        (projectile.source, projectile.target, projectile.damage);
                    self.roster.projectiles.remove(&id);
                    if let Some(dealt) = self.roster.apply_damage(target, damage) {
                        events.damage_events.push(DamageEvent {
                            attacker: source,
                            target,
                            damage: dealt,
                        });
                    }
                }
            }
        }
    }

    /// Apply an instant strike, dropping actions on missing targets.
    fn apply_strike(&mut self, attacker: EntityId, action: StepAction, events: &mut TickEvents) {
        if let StepAction::Strike { target, damage } = action {
            if let Some(dealt) = self.roster.apply_damage(target, damage) {
                events.damage_events.push(DamageEvent {
                    attacker,
                    target,
                    damage: dealt,
                });
            }
        }
    }

    /// Purge dead entities, credit tallies, detect core loss.
    ///
    /// Health is clamped at zero by `Health::apply_damage`, so the purge
    /// never observes negative health.
    fn run_cleanup(&mut self, events: &mut TickEvents) {
        for id in self.roster.sorted_unit_ids() {
            if self.roster.units[&id].health.is_dead() {
                self.roster.units.remove(&id);
                events.deaths.push(id);
                tracing::debug!(id, "unit destroyed");
            }
        }

        let mut fallen_cores: Vec<Side> = Vec::new();
        for id in self.roster.sorted_structure_ids() {
            if !self.roster.structures[&id].health.is_dead() {
                continue;
            }
            let structure = self
                .roster
                .structures
                .remove(&id)
                .unwrap_or_else(|| unreachable!("id taken from live key set"));
            events.structures_destroyed.push(StructureFell {
                id,
                side: structure.side,
                is_core: structure.is_core,
            });
            if structure.is_core {
                fallen_cores.push(structure.side);
            } else {
                *self.tallies.get_mut(structure.side.opposite()) += 1;
                tracing::info!(id, side = ?structure.side, "tower destroyed");
            }
        }

        // Projectiles die with their target
        for id in self.roster.sorted_projectile_ids() {
            let target = self.roster.projectiles[&id].target;
            if self.roster.position_of(target).is_none() {
                self.roster.projectiles.remove(&id);
            }
        }

        match fallen_cores.as_slice() {
            [] => {}
            [loser] => {
                let winner = loser.opposite();
                // Maximum win margin: credit every structure the loser had
                *self.tallies.get_mut(winner) = *self.structure_totals.get(*loser);
                tracing::info!(?winner, tick = self.tick, "core structure destroyed");
                self.finish(Some(winner));
            }
            _ => {
                // Both cores fell in the same tick
                tracing::info!(tick = self.tick, "both core structures destroyed");
                self.finish(None);
            }
        }
    }

    /// Regulation and overtime expiry checks.
    fn check_timer(&mut self) {
        match self.state {
            MatchState::Running if self.tick >= self.config.duration_ticks => {
                if self.tallies.friendly == self.tallies.opponent {
                    self.state = MatchState::Overtime;
                    tracing::info!(tick = self.tick, "regulation tied, entering overtime");
                } else {
                    self.decide_by_tally();
                }
            }
            MatchState::Overtime
                if self.tick >= self.config.duration_ticks + self.config.overtime_ticks =>
            {
                tracing::info!(tick = self.tick, "overtime expired");
                self.decide_by_tally();
            }
            _ => {}
        }
    }

    /// End the match on the current tallies (draw on a tie).
    fn decide_by_tally(&mut self) {
        let winner = match self.tallies.friendly.cmp(&self.tallies.opponent) {
            std::cmp::Ordering::Greater => Some(Side::Friendly),
            std::cmp::Ordering::Less => Some(Side::Opponent),
            std::cmp::Ordering::Equal => None,
        };
        self.finish(winner);
    }

    fn finish(&mut self, winner: Option<Side>) {
        self.state = MatchState::Ended;
        self.verdict = Some(Verdict {
            winner,
            tallies: self.tallies,
        });
        tracing::info!(
            ?winner,
            friendly_tally = self.tallies.friendly,
            opponent_tally = self.tallies.opponent,
            "match ended"
        );
    }

    /// Take a read-only snapshot for the render layer.
    ///
    /// Entities are listed in sorted-ID order. Call only between ticks;
    /// the snapshot is a clone and never exposes partial-tick state.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        let units = self
            .roster
            .sorted_unit_ids()
            .into_iter()
            .map(|id| self.roster.units[&id].clone())
            .collect();
        let structures = self
            .roster
            .sorted_structure_ids()
            .into_iter()
            .map(|id| self.roster.structures[&id].clone())
            .collect();
        let projectiles = self
            .roster
            .sorted_projectile_ids()
            .into_iter()
            .map(|id| self.roster.projectiles[&id].clone())
            .collect();

        let ticks_remaining = match self.state {
            MatchState::Running => self.config.duration_ticks.saturating_sub(self.tick),
            MatchState::Overtime => (self.config.duration_ticks + self.config.overtime_ticks)
                .saturating_sub(self.tick),
            _ => 0,
        };

        BattleSnapshot {
            tick: self.tick,
            state: self.state,
            units,
            structures,
            projectiles,
            essence: SidePair {
                friendly: self.pools.friendly.current(),
                opponent: self.pools.opponent.current(),
            },
            tallies: self.tallies,
            ticks_remaining,
        }
    }

    /// Calculate a hash of the current battle state.
    ///
    /// Two battles fed identical inputs produce identical hashes; used
    /// for desync detection and determinism tests.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);
        self.state.hash(&mut hasher);
        self.pools.friendly.current().hash(&mut hasher);
        self.pools.opponent.current().hash(&mut hasher);
        self.tallies.friendly.hash(&mut hasher);
        self.tallies.opponent.hash(&mut hasher);

        for id in self.roster.sorted_unit_ids() {
            let unit = &self.roster.units[&id];
            id.hash(&mut hasher);
            unit.position.x.to_bits().hash(&mut hasher);
            unit.position.y.to_bits().hash(&mut hasher);
            unit.health.hash(&mut hasher);
            unit.cooldown_remaining.hash(&mut hasher);
        }
        for id in self.roster.sorted_structure_ids() {
            let structure = &self.roster.structures[&id];
            id.hash(&mut hasher);
            structure.health.hash(&mut hasher);
            structure.cooldown_remaining.hash(&mut hasher);
        }
        for id in self.roster.sorted_projectile_ids() {
            let projectile = &self.roster.projectiles[&id];
            id.hash(&mut hasher);
            projectile.target.hash(&mut hasher);
            projectile.position.x.to_bits().hash(&mut hasher);
            projectile.position.y.to_bits().hash(&mut hasher);
        }

        hasher.finish()
    }

    /// Serialize the battle state for save/restore or desync checks.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| ArenaError::InvalidState(format!("failed to serialize battle: {e}")))
    }

    /// Deserialize battle state from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| ArenaError::InvalidState(format!("failed to deserialize battle: {e}")))
    }
}

impl Default for Battle {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
