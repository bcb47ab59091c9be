//! Target resolution.
//!
//! Given an acting entity and the opposing roster, picks the single
//! combat target for this tick. Resolution is pure and deterministic:
//! candidates arrive in sorted-ID order (units first, then structures)
//! and exact distance ties keep the first candidate encountered.
//!
//! Lane rule: a lane-restricted unit only sees opposing units currently
//! in its lane; once none remain, any opposing structure becomes
//! eligible (lane-collapse). Unrestricted units see everything.

use crate::entity::{EntityId, Lane};
use crate::math::{Fixed, Vec2Fixed};

/// A potential target, flattened from a unit or structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCandidate {
    /// Identity of the candidate entity.
    pub id: EntityId,
    /// Candidate's current position.
    pub position: Vec2Fixed,
    /// Lane the candidate currently occupies (by position).
    pub lane: Lane,
    /// Whether the candidate is a structure.
    pub is_structure: bool,
}

/// Pick the nearest candidate by squared Euclidean distance.
///
/// Strict comparison keeps the first candidate on an exact tie, so the
/// caller's iteration order decides - which is sorted entity IDs.
fn nearest<'a, I>(from: Vec2Fixed, candidates: I) -> Option<&'a TargetCandidate>
where
    I: Iterator<Item = &'a TargetCandidate>,
{
    let mut best: Option<(&TargetCandidate, Fixed)> = None;
    for candidate in candidates {
        let dist_sq = from.distance_squared(candidate.position);
        match best {
            Some((_, best_dist)) if dist_sq >= best_dist => {}
            _ => best = Some((candidate, dist_sq)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Resolve the combat target for a unit.
///
/// `candidates` must hold the opposing side's live units and structures
/// in sorted-ID order, units before structures. Returns `None` when no
/// eligible target exists; the stepper then advances toward the
/// opposing baseline instead of idling.
#[must_use]
pub fn resolve_unit_target<'a>(
    from: Vec2Fixed,
    lane: Option<Lane>,
    candidates: &'a [TargetCandidate],
) -> Option<&'a TargetCandidate> {
    match lane {
        None => nearest(from, candidates.iter()),
        Some(lane) => {
            let mut same_lane_units = candidates
                .iter()
                .filter(|c| !c.is_structure && c.lane == lane)
                .peekable();
            if same_lane_units.peek().is_some() {
                nearest(from, same_lane_units)
            } else {
                // Lane-collapse: no unit left to fight in this lane
                nearest(from, candidates.iter().filter(|c| c.is_structure))
            }
        }
    }
}

/// Resolve the counter-attack target for a structure.
///
/// Structures never move, so only opposing units already within range
/// are eligible. `candidates` must hold opposing units in sorted-ID
/// order.
#[must_use]
pub fn resolve_structure_target<'a>(
    from: Vec2Fixed,
    range: Fixed,
    candidates: &'a [TargetCandidate],
) -> Option<&'a TargetCandidate> {
    let range_sq = range * range;
    nearest(
        from,
        candidates
            .iter()
            .filter(|c| !c.is_structure && from.distance_squared(c.position) <= range_sq),
    )
}
