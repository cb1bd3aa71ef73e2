//! The slip model for stochastic drops: an intended column lands where
//! intended with probability 0.6, otherwise in a neighbouring column.

use rand::Rng;

use crate::game::{Board, Player, COLS};

/// Probability of landing in the intended column.
pub const HIT_PROBABILITY: f64 = 0.6;
/// Probability mass spilled to the neighbours.
pub const SPILL_PROBABILITY: f64 = 1.0 - HIT_PROBABILITY;

/// One entry of the landing distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub probability: f64,
    pub column: usize,
}

/// Landing outcomes for `intended`, in ascending column order.
///
/// Edge columns spill everything to their single neighbour; interior
/// columns split the spill evenly left and right.
pub fn landing_distribution(intended: usize) -> Vec<Landing> {
    debug_assert!(intended < COLS, "column {intended} out of range");
    if intended == 0 {
        vec![
            Landing { probability: HIT_PROBABILITY, column: 0 },
            Landing { probability: SPILL_PROBABILITY, column: 1 },
        ]
    } else if intended == COLS - 1 {
        vec![
            Landing { probability: SPILL_PROBABILITY, column: intended - 1 },
            Landing { probability: HIT_PROBABILITY, column: intended },
        ]
    } else {
        let side = SPILL_PROBABILITY / 2.0;
        vec![
            Landing { probability: side, column: intended - 1 },
            Landing { probability: HIT_PROBABILITY, column: intended },
            Landing { probability: side, column: intended + 1 },
        ]
    }
}

/// Draw a landing column for `intended`.
pub fn sample_landing<R: Rng + ?Sized>(intended: usize, rng: &mut R) -> usize {
    let roll: f64 = rng.random();
    let distribution = landing_distribution(intended);
    let mut cumulative = 0.0;
    for landing in &distribution {
        cumulative += landing.probability;
        if roll < cumulative {
            return landing.column;
        }
    }
    // Rounding can leave the cumulative sum a hair under 1.0.
    distribution.last().map_or(intended, |landing| landing.column)
}

/// Result of applying a stochastic drop to a live board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropResolution {
    Landed { intended: usize, column: usize, board: Board },
    /// The sampled column was full; nothing was placed.
    Skipped { intended: usize, column: usize },
}

impl DropResolution {
    pub fn landed_board(&self) -> Option<&Board> {
        match self {
            DropResolution::Landed { board, .. } => Some(board),
            DropResolution::Skipped { .. } => None,
        }
    }
}

/// Sample where `player`'s piece aimed at `intended` actually lands and
/// build the resulting board. `board` itself is never modified.
pub fn resolve_drop<R: Rng + ?Sized>(
    board: &Board,
    intended: usize,
    player: Player,
    rng: &mut R,
) -> DropResolution {
    let column = sample_landing(intended, rng);
    match board.with_piece(column, player.to_cell()) {
        Ok(next) => {
            log::debug!("intended column {intended}, landed in column {column}");
            DropResolution::Landed {
                intended,
                column,
                board: next,
            }
        }
        Err(err) => {
            log::warn!("piece aimed at column {intended} slipped into column {column}: {err}");
            DropResolution::Skipped { intended, column }
        }
    }
}
