//! Static board evaluation from the AI's point of view.
//!
//! Two cost modes share the positional term:
//!
//! - [`ScoringMode::Lite`]: one cheap pass that only looks for completed
//!   lines and the opponent's open threes.
//! - [`ScoringMode::Full`]: threat analysis with per-cell threat maps, fork
//!   (double threat) detection and a row parity bonus.
//!
//! A window completely owned by one side short-circuits either mode with
//! [`EVAL_WIN`].

use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{Board, Cell, Window, WindowSet, COLS, POSITIONAL_WEIGHTS, ROWS};

/// Saturating evaluation of a completed line.
pub const EVAL_WIN: f64 = 1_000_000.0;
/// LITE: each opponent window with three pieces and one gap.
pub const LITE_BLOCK_PENALTY: f64 = 5_000.0;
/// FULL: three pieces and one gap.
pub const THREAT_SCORE: f64 = 100.0;
/// FULL: two pieces and two gaps.
pub const SETUP_SCORE: f64 = 5.0;
/// FULL: an empty cell completing two or more windows.
pub const FORK_BONUS: f64 = 5_000.0;
/// FULL: AI threat cell on an odd row index.
pub const PARITY_BONUS: f64 = 50.0;

/// Evaluation cost mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScoringMode {
    Lite,
    Full,
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Lite => f.write_str("LITE"),
            ScoringMode::Full => f.write_str("FULL"),
        }
    }
}

impl FromStr for ScoringMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LITE" => Ok(ScoringMode::Lite),
            "FULL" => Ok(ScoringMode::Full),
            _ => Err(ConfigError::UnknownScoringMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for ScoringMode {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScoringMode> for String {
    fn from(mode: ScoringMode) -> String {
        mode.to_string()
    }
}

/// Trait for evaluating a board position. Positive values favour the AI.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, mode: ScoringMode) -> f64;
}

/// Default evaluator over the shared window table.
#[derive(Debug, Clone, Copy)]
pub struct BoardEvaluator {
    windows: &'static WindowSet,
}

impl BoardEvaluator {
    pub fn new() -> Self {
        BoardEvaluator {
            windows: WindowSet::standard(),
        }
    }

    /// Largest magnitude any non-terminal position can reach in `mode`.
    pub fn max_non_terminal_score(mode: ScoringMode) -> f64 {
        let positional: i32 = POSITIONAL_WEIGHTS.iter().flatten().sum();
        let windows = WindowSet::standard().len() as f64;
        let cells = (ROWS * COLS) as f64;
        match mode {
            ScoringMode::Lite => positional as f64 + windows * LITE_BLOCK_PENALTY,
            ScoringMode::Full => {
                positional as f64
                    + windows * THREAT_SCORE.max(SETUP_SCORE)
                    + cells * (FORK_BONUS + PARITY_BONUS)
            }
        }
    }

    fn positional(board: &Board) -> f64 {
        let mut score = 0;
        for (row, weights) in POSITIONAL_WEIGHTS.iter().enumerate() {
            for (col, &weight) in weights.iter().enumerate() {
                match board.get(row, col) {
                    Cell::Ai => score += weight,
                    Cell::Human => score -= weight,
                    Cell::Empty => {}
                }
            }
        }
        score as f64
    }

    fn scan_lite(&self, board: &Board) -> ControlFlow<f64, f64> {
        let mut score = 0.0;
        for window in self.windows {
            let tally = Tally::of(board, window);
            tally.completed()?;
            if tally.human == 3 && tally.empty == 1 {
                score -= LITE_BLOCK_PENALTY;
            }
        }
        ControlFlow::Continue(score)
    }

    fn scan_full(&self, board: &Board) -> ControlFlow<f64, f64> {
        let mut score = 0.0;
        let mut ai_threats = ThreatMap::default();
        let mut human_threats = ThreatMap::default();

        for window in self.windows {
            let tally = Tally::of(board, window);
            tally.completed()?;

            if tally.ai == 3 && tally.empty == 1 {
                score += THREAT_SCORE;
                ai_threats.record(board, window);
            } else if tally.human == 3 && tally.empty == 1 {
                score -= THREAT_SCORE;
                human_threats.record(board, window);
            } else if tally.ai == 2 && tally.empty == 2 {
                score += SETUP_SCORE;
            } else if tally.human == 2 && tally.empty == 2 {
                score -= SETUP_SCORE;
            }
        }

        for (row, _col, count) in ai_threats.cells() {
            if count >= 2 {
                score += FORK_BONUS;
            }
            if row % 2 != 0 {
                score += PARITY_BONUS;
            }
        }
        for (_row, _col, count) in human_threats.cells() {
            if count >= 2 {
                score -= FORK_BONUS;
            }
        }

        ControlFlow::Continue(score)
    }
}

impl Default for BoardEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Heuristic for BoardEvaluator {
    fn evaluate(&self, board: &Board, mode: ScoringMode) -> f64 {
        let scan = match mode {
            ScoringMode::Lite => self.scan_lite(board),
            ScoringMode::Full => self.scan_full(board),
        };
        match scan {
            ControlFlow::Break(decided) => decided,
            ControlFlow::Continue(windows) => Self::positional(board) + windows,
        }
    }
}

/// Piece counts inside one window.
struct Tally {
    ai: u8,
    human: u8,
    empty: u8,
}

impl Tally {
    fn of(board: &Board, window: &Window) -> Self {
        let mut tally = Tally {
            ai: 0,
            human: 0,
            empty: 0,
        };
        for &(r, c) in window {
            match board.get(r, c) {
                Cell::Ai => tally.ai += 1,
                Cell::Human => tally.human += 1,
                Cell::Empty => tally.empty += 1,
            }
        }
        tally
    }

    fn completed(&self) -> ControlFlow<f64> {
        if self.ai == 4 {
            ControlFlow::Break(EVAL_WIN)
        } else if self.human == 4 {
            ControlFlow::Break(-EVAL_WIN)
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Per-evaluation count of windows each empty cell would complete.
#[derive(Default)]
struct ThreatMap {
    counts: [[u8; COLS]; ROWS],
}

impl ThreatMap {
    fn record(&mut self, board: &Board, window: &Window) {
        for &(r, c) in window {
            if board.get(r, c) == Cell::Empty {
                self.counts[r][c] += 1;
            }
        }
    }

    fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.counts.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &count)| count > 0)
                .map(move |(c, &count)| (r, c, count))
        })
    }
}
