//! Read-only battle snapshots for external layers.

use serde::{Deserialize, Serialize};

use crate::battle::MatchState;
use crate::entity::{Projectile, SidePair, Structure, Unit};

/// A consistent view of the battle between two ticks.
///
/// Entity lists are in sorted-ID order, so two snapshots of equal
/// battles compare equal field for field. The render layer reads this;
/// it never holds references into the live [`crate::battle::Battle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    /// Tick the snapshot was taken at.
    pub tick: u64,
    /// Match lifecycle state.
    pub state: MatchState,
    /// Live units, sorted by ID.
    pub units: Vec<Unit>,
    /// Live structures, sorted by ID.
    pub structures: Vec<Structure>,
    /// Projectiles in flight, sorted by ID.
    pub projectiles: Vec<Projectile>,
    /// Current essence per side.
    pub essence: SidePair<u32>,
    /// Destroyed-structure tallies per side.
    pub tallies: SidePair<u32>,
    /// Ticks until the current period (regulation or overtime) expires.
    pub ticks_remaining: u64,
}

impl BattleSnapshot {
    /// Seconds until the current period expires, rounded down.
    #[must_use]
    pub fn seconds_remaining(&self) -> u64 {
        self.ticks_remaining / u64::from(crate::battle::TICK_RATE)
    }
}
