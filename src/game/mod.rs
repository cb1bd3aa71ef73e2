//! Core game model: the gravity board, players, window geometry, and the
//! game state with its end-of-game scoring.

mod board;
mod player;
mod state;
pub mod windows;

pub use board::{Board, Cell, COLS, ROWS};
pub use player::Player;
pub use state::{FinalScores, GameOutcome, GameState};
pub use windows::{window_count, Window, WindowSet, POSITIONAL_WEIGHTS};
