//! # Connect Four Search
//!
//! A decision engine for Connect Four played to a full board: the side with
//! more four-in-a-rows wins. The AI picks its column with plain minimax,
//! alpha-beta minimax, or expectiminimax over a slip model where a piece may
//! land one column off.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, players, window geometry, game state
//! - [`ai`]: Heuristic evaluator, search algorithms, chance model, observers, agents
//! - [`play`]: Whole games between two agents
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod play;
