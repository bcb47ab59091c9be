//! Scripted match execution and result reporting.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use arena_core::prelude::*;

/// Errors from the headless runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Failed to read a roster file.
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    /// The simulation rejected an operation.
    #[error("simulation error: {0}")]
    Sim(#[from] ArenaError),

    /// A match exceeded the tick guard without ending.
    #[error("match did not end within {0} ticks")]
    Unfinished(u64),
}

/// Configuration for one headless match.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Template roster RON file; `None` uses the built-in base roster.
    pub roster_path: Option<PathBuf>,
    /// Deck the friendly driver cycles through.
    pub left_deck: Vec<String>,
    /// Deck the opponent driver cycles through.
    pub right_deck: Vec<String>,
    /// Ticks between deploy attempts for both drivers.
    pub cadence: u64,
    /// Match settings.
    pub match_config: MatchConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            roster_path: None,
            left_deck: vec!["knight".into(), "archer".into(), "giant".into()],
            right_deck: vec!["archer".into(), "knight".into(), "wizard".into()],
            cadence: 20,
            match_config: MatchConfig::default(),
        }
    }
}

/// Outcome of one headless match, serialized as JSON on stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Winning side, or `None` for a draw.
    pub winner: Option<Side>,
    /// Destroyed-structure tally for the friendly side.
    pub friendly_tally: u32,
    /// Destroyed-structure tally for the opponent side.
    pub opponent_tally: u32,
    /// Tick the match ended at.
    pub final_tick: u64,
    /// Whether the match went to overtime.
    pub went_to_overtime: bool,
    /// Units deployed per side over the whole match.
    pub deploys: SidePair<u32>,
    /// Units still alive per side when the match ended.
    pub units_alive: SidePair<usize>,
    /// Final state hash, for determinism verification.
    pub state_hash: u64,
}

/// Load a roster from a RON file, or the built-in base roster.
///
/// # Errors
///
/// Returns [`RunnerError::Io`] if the file cannot be read and
/// [`RunnerError::Sim`] if it does not parse as a valid roster.
pub fn load_roster(path: Option<&Path>) -> std::result::Result<TemplateRoster, RunnerError> {
    match path {
        None => Ok(TemplateRoster::base()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(TemplateRoster::from_ron_str(&text)?)
        }
    }
}

/// Run one scripted-vs-scripted match to completion.
///
/// # Errors
///
/// Propagates roster and deploy errors; returns
/// [`RunnerError::Unfinished`] if the match somehow outlives regulation
/// plus overtime (a simulation bug, since the timer force-ends it).
pub fn run_match(config: &RunConfig) -> std::result::Result<MatchSummary, RunnerError> {
    let roster = load_roster(config.roster_path.as_deref())?;

    let mut battle = Battle::new(config.match_config);
    battle.start(&StructurePlacement::standard(&config.match_config.bounds))?;

    let mut left = ScriptedDriver::new(Side::Friendly, config.left_deck.clone(), config.cadence);
    let mut right = ScriptedDriver::new(Side::Opponent, config.right_deck.clone(), config.cadence);

    let tick_guard =
        config.match_config.duration_ticks + config.match_config.overtime_ticks + 1;
    let mut deploys = SidePair::<u32>::default();
    let mut went_to_overtime = false;

    while battle.state() != MatchState::Ended {
        if battle.get_tick() > tick_guard {
            return Err(RunnerError::Unfinished(tick_guard));
        }

        if left.act(&mut battle, &roster)?.is_some() {
            deploys.friendly += 1;
        }
        if right.act(&mut battle, &roster)?.is_some() {
            deploys.opponent += 1;
        }
        battle.tick();

        if battle.state() == MatchState::Overtime {
            went_to_overtime = true;
        }
    }

    let verdict = battle
        .verdict()
        .copied()
        .unwrap_or_else(|| unreachable!("ended match always carries a verdict"));

    tracing::info!(
        winner = ?verdict.winner,
        final_tick = battle.get_tick(),
        went_to_overtime,
        "match finished"
    );

    Ok(MatchSummary {
        winner: verdict.winner,
        friendly_tally: verdict.tallies.friendly,
        opponent_tally: verdict.tallies.opponent,
        final_tick: battle.get_tick(),
        went_to_overtime,
        deploys,
        units_alive: SidePair {
            friendly: battle.unit_count(Side::Friendly),
            opponent: battle.unit_count(Side::Opponent),
        },
        state_hash: battle.state_hash(),
    })
}

/// Run the same match `runs` times and check every hash agrees.
///
/// # Errors
///
/// Propagates [`run_match`] errors from any run.
pub fn verify_determinism(
    config: &RunConfig,
    runs: u32,
) -> std::result::Result<bool, RunnerError> {
    let reference = run_match(config)?;
    for run in 1..runs {
        let summary = run_match(config)?;
        if summary.state_hash != reference.state_hash {
            tracing::error!(
                run,
                expected = reference.state_hash,
                actual = summary.state_hash,
                "determinism check failed"
            );
            return Ok(false);
        }
    }
    Ok(true)
}
