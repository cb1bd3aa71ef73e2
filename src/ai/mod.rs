mod agent;
pub mod chance;
pub mod heuristic;
pub mod observer;
mod random;
pub mod search;

pub use agent::{Agent, SearchAgent};
pub use heuristic::{BoardEvaluator, Heuristic, ScoringMode};
pub use random::RandomAgent;
pub use search::{find_best_move, find_best_move_with, Algorithm, SearchConfig, SearchOutcome};
