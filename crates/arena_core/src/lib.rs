//! # Arena Core
//!
//! Deterministic battle simulation core for the two-sided arena battler.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! Two sides deploy units that march toward the opposing side's
//! structures. A match ends when a core structure falls, or when the
//! clock runs out and the destroyed-structure tallies are compared
//! (with a sudden-death overtime on a tie).
//!
//! External layers (rendering, deck UI, persistence) interact through a
//! narrow surface: [`Battle::deploy`](battle::Battle::deploy) to spend
//! essence on a unit, [`Battle::tick`](battle::Battle::tick) to advance
//! one frame, and [`Battle::snapshot`](battle::Battle::snapshot) for a
//! read-only view. Nothing outside this crate mutates live state.
//!
//! ## Crate Structure
//!
//! - [`entity`] - Unit, structure, and projectile data definitions
//! - [`template`] - Data-driven unit templates with level scaling
//! - [`targeting`] - Target resolution (nearest enemy, lane-collapse)
//! - [`stepper`] - Per-entity move-or-attack advance
//! - [`essence`] - Regenerating deploy-resource pools
//! - [`battle`] - Match controller and tick loop
//! - [`snapshot`] - Read-only state views for external layers
//! - [`script`] - Deterministic scripted-opponent driver
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod entity;
pub mod error;
pub mod essence;
pub mod math;
pub mod script;
pub mod snapshot;
pub mod stepper;
pub mod targeting;
pub mod template;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle::{
        Battle, MatchConfig, MatchState, StructurePlacement, TickEvents, Verdict, TICK_RATE,
    };
    pub use crate::entity::{EntityId, Lane, Side, SidePair};
    pub use crate::error::{ArenaError, Result};
    pub use crate::essence::EssencePool;
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::script::ScriptedDriver;
    pub use crate::snapshot::BattleSnapshot;
    pub use crate::template::{TemplateRoster, UnitTemplate};
}
