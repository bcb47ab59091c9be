//! Essence pools and the regeneration clock.
//!
//! Each side holds a bounded essence pool spent on deploys. The clock
//! regenerates both pools on a fixed cadence; entering overtime applies
//! a rate multiplier. Spends are atomic: a request either debits in
//! full or leaves the pool untouched.

use serde::{Deserialize, Serialize};

use crate::entity::SidePair;

/// A bounded essence pool for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssencePool {
    current: u32,
    max: u32,
}

impl EssencePool {
    /// Create a pool starting at `current`, capped at `max`.
    #[must_use]
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    /// Current essence.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Pool cap.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Check if the pool can cover a cost.
    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Spend essence if available.
    ///
    /// Returns true if the full amount was debited. A pool below the
    /// requested cost is left unchanged - no partial spends.
    pub fn spend(&mut self, cost: u32) -> bool {
        if self.current >= cost {
            self.current -= cost;
            true
        } else {
            false
        }
    }

    /// Deposit essence, saturating at the cap.
    ///
    /// Returns the actual amount deposited.
    pub fn deposit(&mut self, amount: u32) -> u32 {
        let space = self.max - self.current;
        let deposited = amount.min(space);
        self.current += deposited;
        deposited
    }
}

/// Configuration for the essence clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssenceConfig {
    /// Pool cap per side.
    pub max: u32,
    /// Essence both pools start the match with.
    pub initial: u32,
    /// Ticks between regeneration pulses.
    pub interval: u32,
    /// Essence added per pulse.
    pub amount: u32,
    /// Regeneration multiplier once the match enters overtime.
    pub overtime_multiplier: u32,
}

impl Default for EssenceConfig {
    fn default() -> Self {
        Self {
            max: 10,
            initial: 5,
            interval: 20,
            amount: 1,
            overtime_multiplier: 2,
        }
    }
}

/// Fixed-cadence regeneration clock for both pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssenceClock {
    config: EssenceConfig,
    ticks_until_pulse: u32,
}

impl EssenceClock {
    /// Create a clock from its configuration.
    #[must_use]
    pub const fn new(config: EssenceConfig) -> Self {
        Self {
            config,
            ticks_until_pulse: config.interval,
        }
    }

    /// The clock's configuration.
    #[must_use]
    pub const fn config(&self) -> &EssenceConfig {
        &self.config
    }

    /// Advance the clock one tick, regenerating both pools on a pulse.
    ///
    /// `overtime` applies the configured rate multiplier for the pulse.
    pub fn tick(&mut self, pools: &mut SidePair<EssencePool>, overtime: bool) {
        if self.config.interval == 0 {
            return;
        }

        self.ticks_until_pulse -= 1;
        if self.ticks_until_pulse > 0 {
            return;
        }
        self.ticks_until_pulse = self.config.interval;

        let amount = if overtime {
            self.config.amount * self.config.overtime_multiplier
        } else {
            self.config.amount
        };
        pools.friendly.deposit(amount);
        pools.opponent.deposit(amount);
    }
}
